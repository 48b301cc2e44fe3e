use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::classifier::ClassifierRules;
use crate::config::EngineConfig;
use crate::detector::{FaceDetector, FrameSource};
use crate::metrics::MetricsCollector;
use crate::models::{SessionStatus, TrackingSession};

use super::events::{EngineEvent, SessionOutcome};
use super::loop_worker::{tracking_loop, SessionArtifacts};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Owns the session lifecycle: one tracking loop at a time, started with a
/// detector and a frame source, stopped into a `SessionOutcome`. Subscribers
/// get the live event stream through `subscribe`.
pub struct EngineController {
    config: EngineConfig,
    rules: ClassifierRules,
    metrics: MetricsCollector,
    events: broadcast::Sender<EngineEvent>,
    handle: Option<JoinHandle<SessionArtifacts>>,
    cancel_token: Option<CancellationToken>,
    session: Option<TrackingSession>,
}

impl EngineController {
    pub fn new(config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: config.normalized(),
            rules: ClassifierRules::default(),
            metrics: MetricsCollector::new(),
            events,
            handle: None,
            cancel_token: None,
            session: None,
        }
    }

    /// Swap in a custom classification rule set. Takes effect on the next
    /// session start.
    pub fn with_rules(mut self, rules: ClassifierRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn current_session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    /// Start a tracking session. Fails if one is already running, or if the
    /// detector cannot come up; a detector that fails here never starts a
    /// session that would produce nothing but empty frames.
    pub fn start_session(
        &mut self,
        detector: Box<dyn FaceDetector>,
        source: Box<dyn FrameSource>,
    ) -> Result<String> {
        if self.handle.is_some() {
            bail!("tracking session already active");
        }

        detector
            .ensure_ready()
            .context("face detector failed to initialize")?;

        let session_id = Uuid::new_v4().to_string();
        let session = TrackingSession::begin(session_id.clone(), Utc::now());
        log_info!("starting tracking session {}", session_id);

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(tracking_loop(
            session_id.clone(),
            self.config,
            self.rules.clone(),
            detector,
            source,
            self.metrics.clone(),
            self.events.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.session = Some(session);
        Ok(session_id)
    }

    /// Stop the running session and wait for its final analysis. The loop
    /// closes every sample sequence, aggregates, and builds the narrative
    /// before returning, so the outcome here is complete and read-only.
    pub async fn stop_session(&mut self) -> Result<SessionOutcome> {
        let (Some(handle), Some(mut session)) = (self.handle.take(), self.session.take()) else {
            bail!("no tracking session active");
        };

        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        let artifacts = handle
            .await
            .context("tracking loop task failed to join")?;

        session.close(SessionStatus::Completed, Utc::now());
        log_info!("stopped tracking session {}", session.id);

        let outcome = SessionOutcome {
            session,
            sequences: artifacts.sequences,
            rejected_samples: artifacts.rejected_samples,
            buckets: artifacts.buckets,
            timeline: artifacts.timeline,
            overall: artifacts.overall,
        };

        let _ = self
            .events
            .send(EngineEvent::SessionClosed(Arc::new(outcome.clone())));
        Ok(outcome)
    }
}
