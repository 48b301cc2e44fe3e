//! Presence hysteresis: converts the raw per-frame detected/not-detected
//! boolean into a debounced stable signal. A transition is emitted only after
//! a run of consistent raw outcomes reaches the relevant threshold, and only
//! when it actually changes the stable state; everything between the
//! hysteresis bands is suppressed.

use serde::{Deserialize, Serialize};

use crate::config::StabilizerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresenceState {
    Present,
    Absent,
}

#[derive(Debug)]
pub struct PresenceStabilizer {
    config: StabilizerConfig,
    consecutive_detections: u32,
    consecutive_non_detections: u32,
    /// `None` until the first transition: the subject is still pending.
    last_stable: Option<PresenceState>,
}

impl PresenceStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            consecutive_detections: 0,
            consecutive_non_detections: 0,
            last_stable: None,
        }
    }

    /// Feed one raw frame outcome. Returns the new stable state when this
    /// frame completes a qualifying run, `None` otherwise. A single
    /// contradicting frame fully resets the opposing counter.
    pub fn update(&mut self, raw_detected: bool) -> Option<PresenceState> {
        if raw_detected {
            self.consecutive_detections += 1;
            self.consecutive_non_detections = 0;

            if self.consecutive_detections >= self.config.found_threshold
                && self.last_stable != Some(PresenceState::Present)
            {
                self.last_stable = Some(PresenceState::Present);
                return Some(PresenceState::Present);
            }
        } else {
            self.consecutive_non_detections += 1;
            self.consecutive_detections = 0;

            if self.consecutive_non_detections >= self.config.lost_threshold
                && self.last_stable != Some(PresenceState::Absent)
            {
                self.last_stable = Some(PresenceState::Absent);
                return Some(PresenceState::Absent);
            }
        }

        None
    }

    /// Current stable state, `None` while still pending.
    pub fn stable_state(&self) -> Option<PresenceState> {
        self.last_stable
    }

    /// Clear counters and the stable-state memory back to the initial unset
    /// state.
    pub fn reset(&mut self) {
        self.consecutive_detections = 0;
        self.consecutive_non_detections = 0;
        self.last_stable = None;
    }
}
