use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::aggregation::{aggregate, TimeBucket};
use crate::buffer::SampleBuffer;
use crate::classifier::ClassifierRules;
use crate::config::EngineConfig;
use crate::correlator::SubjectCorrelator;
use crate::detector::{FaceDetector, FrameSource};
use crate::metrics::{FrameMetrics, MetricsCollector};
use crate::models::{EmotionSample, VideoFrame};
use crate::narrative::{build_overall, build_timeline, OverallAnalysis, TimelineEntry};

use super::events::{EngineEvent, FrameUpdate};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Raw output of one tracking loop run, folded into a `SessionOutcome` by
/// the controller.
pub(crate) struct SessionArtifacts {
    pub sequences: Vec<Vec<EmotionSample>>,
    pub rejected_samples: u64,
    pub buckets: Vec<TimeBucket>,
    pub timeline: Vec<TimelineEntry>,
    pub overall: OverallAnalysis,
}

/// The per-session capture loop. Runs until cancelled, then closes the
/// sample buffer and computes the aggregation + narrative over the final
/// snapshot before returning. The ticker skips (never queues) ticks that
/// arrive while a frame is still being processed, so staleness stays
/// bounded.
pub(crate) async fn tracking_loop(
    session_id: String,
    config: EngineConfig,
    rules: ClassifierRules,
    mut detector: Box<dyn FaceDetector>,
    mut source: Box<dyn FrameSource>,
    metrics: MetricsCollector,
    events: broadcast::Sender<EngineEvent>,
    cancel_token: CancellationToken,
) -> SessionArtifacts {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Fresh correlator per session: tracks never survive across sessions and
    // ids are never re-identified.
    let mut correlator = SubjectCorrelator::new(config.correlator, config.stabilizer);
    let mut buffer = SampleBuffer::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(frame) = source.next_frame() else {
                    // No frame available this tick; the capture source owes
                    // us nothing at any fixed rate.
                    continue;
                };

                process_frame(
                    &frame,
                    &config,
                    detector.as_mut(),
                    &mut correlator,
                    &mut buffer,
                    &metrics,
                    &events,
                )
                .await;
            }
            _ = cancel_token.cancelled() => {
                log_info!("tracking loop for session {} shutting down", session_id);
                break;
            }
        }
    }

    // Flush: the sequences become read-only before the snapshot is taken, so
    // this aggregation run can never race a live append.
    buffer.close_all();
    metrics.set_rejected_samples(buffer.rejected_count()).await;
    let sequences = buffer.snapshot();
    let buckets = aggregate(&sequences, &config.aggregation);
    let timeline = build_timeline(&buckets, &rules, &config.narrative);
    let overall = build_overall(&buckets, &rules, &config.narrative);

    log_info!(
        "session {} closed with {} sequences, {} buckets, {} timeline entries",
        session_id,
        sequences.len(),
        buckets.len(),
        timeline.len()
    );

    SessionArtifacts {
        sequences,
        rejected_samples: buffer.rejected_count(),
        buckets,
        timeline,
        overall,
    }
}

async fn process_frame(
    frame: &VideoFrame,
    config: &EngineConfig,
    detector: &mut dyn FaceDetector,
    correlator: &mut SubjectCorrelator,
    buffer: &mut SampleBuffer,
    metrics: &MetricsCollector,
    events: &broadcast::Sender<EngineEvent>,
) {
    let tick_start = Instant::now();

    let detect_start = Instant::now();
    let detections = match detector.detect(frame) {
        Ok(detections) => detections,
        Err(err) => {
            // Detector trouble mid-session reads as "no detection this
            // frame" and decrements toward absence instead of raising.
            log_warn!("detector failed at frame {}ms: {err}", frame.timestamp_ms);
            metrics.record_detector_failure().await;
            Vec::new()
        }
    };
    let detect_ms = detect_start.elapsed().as_millis() as u64;

    let observation = correlator.observe(&detections);

    let mut current_sample: Option<EmotionSample> = None;
    for (track_id, detection_index) in &observation.assignments {
        let Some(scores) = detections[*detection_index].emotions.clone() else {
            continue;
        };
        if scores.is_empty() {
            continue;
        }
        let sample = EmotionSample::from_scores(frame.timestamp_ms, scores);
        let accepted = buffer.append(&track_id.to_string(), sample.clone());
        if accepted && current_sample.is_none() {
            current_sample = Some(sample);
        }
    }

    for (track_id, state) in &observation.transitions {
        log_info!(
            "track {} stabilized {:?} at frame {}ms",
            track_id,
            state,
            frame.timestamp_ms
        );
    }

    let (cpu_percent, memory_mb) = metrics.sample_system_metrics().await;
    let total_ms = tick_start.elapsed().as_millis() as u64;
    let over_budget = total_ms > config.frame_budget_ms;
    if over_budget {
        log_warn!(
            "frame {}ms took {}ms (> {}ms budget); later ticks will be dropped, not queued",
            frame.timestamp_ms,
            total_ms,
            config.frame_budget_ms
        );
    }

    metrics
        .record_frame(
            FrameMetrics {
                timestamp: Utc::now(),
                frame_timestamp_ms: frame.timestamp_ms,
                detect_ms,
                faces_detected: observation.face_count,
                total_ms,
                cpu_percent,
                memory_mb,
            },
            over_budget,
        )
        .await;

    // Single publish; subscribers fan out from the broadcast channel. A
    // send error only means nobody is listening right now.
    let _ = events.send(EngineEvent::Frame(FrameUpdate {
        timestamp_ms: frame.timestamp_ms,
        face_count: observation.face_count,
        stable_face_detected: correlator.any_present(),
        boxes: observation.boxes,
        current_sample,
    }));
}
