//! Session orchestration: the ~60Hz tick loop that pulls frames, runs the
//! detector, feeds the correlator and sample buffer, and publishes the typed
//! event stream. `EngineController` owns start/stop; everything downstream of
//! a completed session (aggregation, narrative) runs once at shutdown.

pub mod controller;
pub mod events;
mod loop_worker;

pub use controller::EngineController;
pub use events::{EngineEvent, FrameUpdate, SessionOutcome};
