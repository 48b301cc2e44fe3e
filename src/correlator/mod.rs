//! Cross-frame subject correlation: assigns this frame's raw detections to
//! persistent tracks by spatial continuity alone. The question answered here
//! is "is this the same blob as last frame", not re-identification: there
//! are no appearance features, and a track id never comes back once its
//! track is gone.

pub mod track;

pub use track::{Track, TrackId, TrackState};

use std::cmp::Ordering;

use crate::config::{CorrelatorConfig, StabilizerConfig};
use crate::models::{BoundingBox, RawDetection};
use crate::stabilizer::PresenceState;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_info;

/// Per-frame correlation outcome, consumed by the engine loop.
#[derive(Debug, Default)]
pub struct FrameObservation {
    /// Live-track count after this frame (the "faces detected" signal).
    pub face_count: usize,
    /// Last-known boxes of the live tracks, for the presentation layer.
    pub boxes: Vec<BoundingBox>,
    /// `(track id, index into this frame's detections)` for matched pairs
    /// and freshly spawned tracks.
    pub assignments: Vec<(TrackId, usize)>,
    /// Stable-state transitions emitted by per-track stabilizers this frame.
    pub transitions: Vec<(TrackId, PresenceState)>,
    /// Tracks evicted this frame after exceeding the miss threshold.
    pub evicted: Vec<TrackId>,
}

pub struct SubjectCorrelator {
    config: CorrelatorConfig,
    stabilizer_config: StabilizerConfig,
    tracks: Vec<Track>,
    next_id: TrackId,
}

impl SubjectCorrelator {
    pub fn new(config: CorrelatorConfig, stabilizer_config: StabilizerConfig) -> Self {
        Self {
            config,
            stabilizer_config,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// Process one frame's detections: greedy nearest-neighbour matching by
    /// box-center distance, then spawn/miss/evict bookkeeping. The assignment
    /// is computed over an immutable view and applied afterwards, so the
    /// track set is never mutated mid-match.
    pub fn observe(&mut self, detections: &[RawDetection]) -> FrameObservation {
        let mut observation = FrameObservation::default();

        // Candidate pairs within matching range, closest first.
        let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
        for (t_idx, track) in self.tracks.iter().enumerate() {
            for (d_idx, detection) in detections.iter().enumerate() {
                let distance = track.last_box.center_distance(&detection.bounding_box);
                if distance <= self.config.max_match_distance {
                    candidates.push((t_idx, d_idx, distance));
                }
            }
        }
        candidates.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

        let mut track_matched = vec![false; self.tracks.len()];
        let mut detection_matched = vec![false; detections.len()];
        let mut matches: Vec<(usize, usize)> = Vec::new();
        for (t_idx, d_idx, _) in candidates {
            if track_matched[t_idx] || detection_matched[d_idx] {
                continue;
            }
            track_matched[t_idx] = true;
            detection_matched[d_idx] = true;
            matches.push((t_idx, d_idx));
        }

        // Apply matches and misses.
        for (t_idx, track) in self.tracks.iter_mut().enumerate() {
            if let Some(&(_, d_idx)) = matches.iter().find(|(m_t, _)| *m_t == t_idx) {
                if let Some(state) = track.mark_detected(detections[d_idx].bounding_box) {
                    observation.transitions.push((track.id, state));
                }
                observation.assignments.push((track.id, d_idx));
            } else if let Some(state) = track.mark_missed() {
                observation.transitions.push((track.id, state));
            }
        }

        // Unmatched detections become new pending tracks.
        for (d_idx, detection) in detections.iter().enumerate() {
            if detection_matched[d_idx] {
                continue;
            }
            let id = self.next_id;
            self.next_id += 1;
            let mut spawned = Track::new(id, detection.bounding_box, self.stabilizer_config);
            if let Some(state) = spawned.mark_detected(detection.bounding_box) {
                observation.transitions.push((id, state));
            }
            observation.assignments.push((id, d_idx));
            self.tracks.push(spawned);
            log_info!("spawned track {} for unmatched detection", id);
        }

        // Evict tracks whose miss streak exceeded the threshold. The
        // threshold is normalized to be >= the lost threshold, so an evicted
        // track has always been confirmed absent first.
        let eviction_threshold = self.config.eviction_threshold;
        self.tracks.retain(|track| {
            if track.consecutive_missed > eviction_threshold {
                observation.evicted.push(track.id);
                false
            } else {
                true
            }
        });
        if !observation.evicted.is_empty() {
            log_info!("evicted tracks: {:?}", observation.evicted);
        }

        observation.face_count = self.tracks.len();
        observation.boxes = self.tracks.iter().map(|t| t.last_box).collect();
        observation
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Whether any live track has a stabilized `Present` state.
    pub fn any_present(&self) -> bool {
        self.tracks
            .iter()
            .any(|track| track.state() == TrackState::Present)
    }

    /// Drop all tracks. Used when a session starts or the caller's subject
    /// context changes entirely; track ids are never reused for
    /// re-identification.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlator(max_distance: f64, lost: u32, eviction: u32) -> SubjectCorrelator {
        SubjectCorrelator::new(
            CorrelatorConfig {
                max_match_distance: max_distance,
                eviction_threshold: eviction,
            },
            StabilizerConfig {
                found_threshold: 1,
                lost_threshold: lost,
            },
        )
    }

    fn detection(x: f64, y: f64) -> RawDetection {
        RawDetection {
            bounding_box: BoundingBox::new(x, y, 60.0, 60.0),
            emotions: None,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn unmatched_detection_spawns_track() {
        let mut c = correlator(150.0, 15, 30);
        let obs = c.observe(&[detection(100.0, 100.0)]);
        assert_eq!(obs.face_count, 1);
        assert_eq!(obs.assignments.len(), 1);
        assert_eq!(obs.transitions, vec![(1, PresenceState::Present)]);
    }

    #[test]
    fn nearby_detection_keeps_track_identity() {
        let mut c = correlator(150.0, 15, 30);
        c.observe(&[detection(100.0, 100.0)]);
        let obs = c.observe(&[detection(110.0, 95.0)]);
        assert_eq!(obs.face_count, 1);
        assert_eq!(obs.assignments, vec![(1, 0)]);
        assert!(obs.transitions.is_empty());
    }

    #[test]
    fn distant_detection_spawns_second_track() {
        let mut c = correlator(50.0, 15, 30);
        c.observe(&[detection(100.0, 100.0)]);
        let obs = c.observe(&[detection(400.0, 400.0)]);
        assert_eq!(obs.face_count, 2);
        assert!(obs.assignments.contains(&(2, 0)));
    }

    #[test]
    fn greedy_matching_assigns_each_detection_to_nearest_track() {
        let mut c = correlator(200.0, 15, 30);
        c.observe(&[detection(0.0, 0.0), detection(300.0, 0.0)]);
        // Both subjects move slightly; detection order is shuffled relative
        // to track order and each track must still claim its nearest box.
        let obs = c.observe(&[detection(310.0, 0.0), detection(10.0, 0.0)]);
        assert_eq!(obs.face_count, 2);
        assert!(obs.assignments.contains(&(1, 1)));
        assert!(obs.assignments.contains(&(2, 0)));
    }

    #[test]
    fn eviction_happens_only_after_confirmed_absence() {
        let mut c = correlator(150.0, 3, 5);
        c.observe(&[detection(100.0, 100.0)]);

        let mut absent_at = None;
        let mut evicted_at = None;
        for frame in 0..10 {
            let obs = c.observe(&[]);
            if obs
                .transitions
                .iter()
                .any(|&(_, s)| s == PresenceState::Absent)
            {
                absent_at = Some(frame);
            }
            if !obs.evicted.is_empty() {
                evicted_at = Some(frame);
            }
        }

        let absent_at = absent_at.expect("track should stabilize absent");
        let evicted_at = evicted_at.expect("track should be evicted");
        assert!(absent_at < evicted_at);
        assert_eq!(c.tracks().len(), 0);
    }

    #[test]
    fn reset_drops_all_tracks_and_does_not_reuse_positions() {
        let mut c = correlator(150.0, 15, 30);
        c.observe(&[detection(100.0, 100.0)]);
        c.reset();
        assert_eq!(c.tracks().len(), 0);
        // Same position after reset is a brand new track id.
        let obs = c.observe(&[detection(100.0, 100.0)]);
        assert_eq!(obs.assignments, vec![(2, 0)]);
    }
}
