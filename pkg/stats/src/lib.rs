//! Recent CPU/RAM history for the dashboard's cluster-stats panel:
//! a background sampler feeding a bounded, mutex-guarded ring buffer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Samples retained; memory stays bounded regardless of uptime.
pub const HISTORY_CAP: usize = 30;

/// Default sampling period.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSample {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f32,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
}

/// Ring buffer of the most recent samples. Single lock, writes and
/// reads both serialize under it.
#[derive(Clone, Default)]
pub struct StatsHistory {
    samples: Arc<Mutex<VecDeque<ClusterSample>>>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: ClusterSample) {
        let mut samples = self.samples.lock().unwrap();
        if samples.len() == HISTORY_CAP {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    /// Oldest-first copy of the retained history.
    pub fn snapshot(&self) -> Vec<ClusterSample> {
        self.samples.lock().unwrap().iter().cloned().collect()
    }

    /// Spawn the background sampling task. Two refresh cycles per poll,
    /// since CPU usage is a delta between refreshes.
    pub fn start_sampler(&self, interval: Duration) {
        let history = self.clone();
        tokio::spawn(async move {
            info!("Starting stats sampler (every {:?})", interval);
            let mut sys = sysinfo::System::new();
            loop {
                sys.refresh_cpu_usage();
                tokio::time::sleep(Duration::from_millis(250)).await;
                sys.refresh_cpu_usage();
                sys.refresh_memory();

                let sample = ClusterSample {
                    timestamp: Utc::now(),
                    cpu_percent: sys.global_cpu_usage(),
                    memory_used_bytes: sys.used_memory(),
                    memory_total_bytes: sys.total_memory(),
                };
                debug!(
                    "Sampled cpu={:.1}% mem={}/{}",
                    sample.cpu_percent, sample.memory_used_bytes, sample.memory_total_bytes
                );
                history.push(sample);
                tokio::time::sleep(interval).await;
            }
        });
    }
}
