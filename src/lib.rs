//! emotrace: emotion signal stabilization and aggregation over a noisy
//! per-frame face detector.
//!
//! The pipeline runs in stages. A detector produces raw per-frame detections;
//! the correlator ties them to persistent subject tracks; per-track presence
//! stabilizers debounce the flickery detected/not-detected signal; accepted
//! emotion samples accumulate in per-subject buffers; and when the session
//! ends, the buffered sequences are folded into fixed-width time buckets,
//! classified against intensity thresholds, and rendered into a timeline and
//! overall narrative. `engine::EngineController` drives the whole thing on a
//! ~60Hz tick loop.

pub mod aggregation;
pub mod buffer;
pub mod classifier;
pub mod config;
pub mod correlator;
pub mod detector;
pub mod engine;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod stabilizer;
pub mod utils;

pub use config::EngineConfig;
pub use engine::{EngineController, EngineEvent, FrameUpdate, SessionOutcome};
