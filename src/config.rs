/// Hysteresis thresholds for the presence stabilizer.
///
/// Asymmetric on purpose: presence is claimed after a single detection so the
/// start of attention is not missed, while absence requires a sustained run of
/// misses so transient occlusion does not flicker the signal.
#[derive(Debug, Clone, Copy)]
pub struct StabilizerConfig {
    /// Consecutive detections required before emitting `Present`.
    pub found_threshold: u32,

    /// Consecutive non-detections required before emitting `Absent`
    /// (15 frames ≈ 250ms at 60Hz sampling).
    pub lost_threshold: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            found_threshold: 1,
            lost_threshold: 15,
        }
    }
}

/// Tunables for detection-to-track assignment.
#[derive(Debug, Clone, Copy)]
pub struct CorrelatorConfig {
    /// Maximum bounding-box center distance (pixels) for a detection to match
    /// an existing track. Beyond this a new track is spawned.
    pub max_match_distance: f64,

    /// Consecutive missed frames before a track is evicted from the live set.
    /// Must be >= the stabilizer's lost threshold so a track is never evicted
    /// before its absence has been confirmed; `EngineConfig::normalized`
    /// enforces this.
    pub eviction_threshold: u32,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            max_match_distance: 150.0,
            eviction_threshold: 30,
        }
    }
}

/// Tunables for time-bucketed aggregation.
#[derive(Debug, Clone, Copy)]
pub struct AggregationConfig {
    /// Fixed bucket width. Boundaries are multiples of this from session
    /// start, so repeated aggregation runs are deterministic.
    pub bucket_width_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            bucket_width_ms: 1000,
        }
    }
}

/// Tunables for narrative generation.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeConfig {
    /// How many dominant emotion labels to surface per timeline entry and in
    /// the overall analysis.
    pub top_n: usize,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

/// Top-level engine configuration with per-component sections.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Capture tick interval (16ms ≈ 60Hz). Late ticks are dropped, not
    /// queued.
    pub tick_interval_ms: u64,

    /// Soft per-frame budget for detect + classify. Overruns are logged and
    /// counted, never aborted.
    pub frame_budget_ms: u64,

    pub stabilizer: StabilizerConfig,
    pub correlator: CorrelatorConfig,
    pub aggregation: AggregationConfig,
    pub narrative: NarrativeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            frame_budget_ms: 60,
            stabilizer: StabilizerConfig::default(),
            correlator: CorrelatorConfig::default(),
            aggregation: AggregationConfig::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Clamp inconsistent settings into a usable configuration: eviction must
    /// not fire before the stabilizer can confirm absence, and zero-width
    /// intervals are lifted to 1.
    pub fn normalized(mut self) -> Self {
        if self.correlator.eviction_threshold < self.stabilizer.lost_threshold {
            self.correlator.eviction_threshold = self.stabilizer.lost_threshold;
        }
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self.aggregation.bucket_width_ms = self.aggregation.bucket_width_ms.max(1);
        self.narrative.top_n = self.narrative.top_n.max(1);
        self
    }
}
