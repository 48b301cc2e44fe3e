//! Time-bucketed aggregation of emotion sample sequences. Bucket boundaries
//! are fixed multiples of the bucket width from session start, not sliding
//! windows, so repeated runs over the same snapshot are deterministic and
//! idempotent. Averaging across heterogeneous viewer sequences within the
//! same wall-clock-relative bucket is what lets single-viewer and
//! multi-viewer analysis share one algorithm: the single-viewer case is just
//! the one-sequence input.

pub mod buckets;

pub use buckets::{aggregate, TimeBucket};
