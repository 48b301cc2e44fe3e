mod types;

pub use types::{FrameMetrics, MetricsSnapshot, SystemMetrics};

use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

const MAX_RECENT_FRAMES: usize = 20;

pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    recent_frames: Vec<FrameMetrics>,
    frame_count: u64,
    detector_failure_count: u64,
    budget_overrun_count: u64,
    rejected_sample_count: u64,
    system: System,
    pid: Pid,
}

impl MetricsCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // Initial refresh to establish baseline for CPU calculation
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                recent_frames: Vec::with_capacity(MAX_RECENT_FRAMES),
                frame_count: 0,
                detector_failure_count: 0,
                budget_overrun_count: 0,
                rejected_sample_count: 0,
                system,
                pid,
            })),
        }
    }

    /// Sample current CPU and memory usage for the engine process. CPU usage
    /// requires multiple refreshes over time to calculate a delta.
    pub async fn sample_system_metrics(&self) -> (f32, f64) {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        if let Some(process) = state.system.process(pid) {
            (
                process.cpu_usage(),
                process.memory() as f64 / 1024.0 / 1024.0,
            )
        } else {
            (0.0, 0.0)
        }
    }

    pub async fn record_frame(&self, metrics: FrameMetrics, over_budget: bool) {
        let mut state = self.inner.lock().await;

        state.frame_count += 1;
        if over_budget {
            state.budget_overrun_count += 1;
        }

        state.recent_frames.push(metrics);
        if state.recent_frames.len() > MAX_RECENT_FRAMES {
            state.recent_frames.remove(0);
        }
    }

    pub async fn record_detector_failure(&self) {
        self.inner.lock().await.detector_failure_count += 1;
    }

    pub async fn set_rejected_samples(&self, count: u64) {
        self.inner.lock().await.rejected_sample_count = count;
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let mut state = self.inner.lock().await;
        let pid = state.pid;

        // Refresh to get current CPU/RAM
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        let system = if let Some(process) = state.system.process(pid) {
            SystemMetrics {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            }
        } else {
            SystemMetrics {
                cpu_percent: 0.0,
                memory_mb: 0.0,
            }
        };

        MetricsSnapshot {
            system,
            recent_frames: state.recent_frames.clone(),
            frame_count: state.frame_count,
            detector_failure_count: state.detector_failure_count,
            budget_overrun_count: state.budget_overrun_count,
            rejected_sample_count: state.rejected_sample_count,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
