use serde::{Deserialize, Serialize};

use crate::config::StabilizerConfig;
use crate::models::BoundingBox;
use crate::stabilizer::{PresenceStabilizer, PresenceState};

/// Opaque, process-local track identity. Not stable across sessions.
pub type TrackId = u64;

/// Debounced lifecycle state of a track, derived from its stabilizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackState {
    /// Created but not yet stabilized either way.
    Pending,
    Present,
    Absent,
}

/// A persistent identity for one physically distinct subject across frames.
/// Exactly one track owns a subject's sample sequence; tracks never merge or
/// split.
#[derive(Debug)]
pub struct Track {
    pub id: TrackId,
    pub last_box: BoundingBox,
    pub consecutive_detected: u32,
    pub consecutive_missed: u32,
    stabilizer: PresenceStabilizer,
}

impl Track {
    pub fn new(id: TrackId, bounding_box: BoundingBox, config: StabilizerConfig) -> Self {
        Self {
            id,
            last_box: bounding_box,
            consecutive_detected: 0,
            consecutive_missed: 0,
            stabilizer: PresenceStabilizer::new(config),
        }
    }

    /// Record a matched detection this frame. Returns a stable-state
    /// transition when the detection run qualifies.
    pub fn mark_detected(&mut self, bounding_box: BoundingBox) -> Option<PresenceState> {
        self.last_box = bounding_box;
        self.consecutive_detected += 1;
        self.consecutive_missed = 0;
        self.stabilizer.update(true)
    }

    /// Record a missed frame. Returns a stable-state transition when the miss
    /// run qualifies.
    pub fn mark_missed(&mut self) -> Option<PresenceState> {
        self.consecutive_missed += 1;
        self.consecutive_detected = 0;
        self.stabilizer.update(false)
    }

    pub fn state(&self) -> TrackState {
        match self.stabilizer.stable_state() {
            None => TrackState::Pending,
            Some(PresenceState::Present) => TrackState::Present,
            Some(PresenceState::Absent) => TrackState::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(
            1,
            BoundingBox::new(0.0, 0.0, 50.0, 50.0),
            StabilizerConfig::default(),
        )
    }

    #[test]
    fn new_track_is_pending() {
        assert_eq!(track().state(), TrackState::Pending);
    }

    #[test]
    fn detection_updates_box_and_state() {
        let mut t = track();
        let moved = BoundingBox::new(10.0, 5.0, 50.0, 50.0);
        let transition = t.mark_detected(moved);
        assert_eq!(transition, Some(PresenceState::Present));
        assert_eq!(t.state(), TrackState::Present);
        assert_eq!(t.last_box, moved);
        assert_eq!(t.consecutive_detected, 1);
    }

    #[test]
    fn miss_run_flips_to_absent_at_lost_threshold() {
        let mut t = track();
        t.mark_detected(t.last_box);
        for _ in 0..14 {
            assert_eq!(t.mark_missed(), None);
        }
        assert_eq!(t.mark_missed(), Some(PresenceState::Absent));
        assert_eq!(t.consecutive_missed, 15);
    }
}
