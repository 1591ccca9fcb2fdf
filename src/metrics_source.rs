// System-wide CPU and memory utilization, behind a capability trait so the sampler can be
// driven by sysinfo in production and by fakes in tests.

use crate::error::EcoError;
use crate::models::Utilization;
use crate::power_model::clamp_percent;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysinfo::System;
use tracing::instrument;

/// Anything that can report current CPU and memory utilization.
///
/// `sample` may take a while (e.g. averaging CPU usage over a window); that time counts
/// toward the sampling period. Failures must be reported, not masked as zero usage.
pub trait MetricsSource: Send + Sync + 'static {
    fn sample(&self) -> impl Future<Output = Result<Utilization, EcoError>> + Send;
}

/// [`MetricsSource`] backed by the `sysinfo` crate.
pub struct SysinfoSource {
    sys: Arc<Mutex<System>>,
    cpu_window: Duration,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl SysinfoSource {
    /// `cpu_window` is how long CPU usage is averaged over per sample; it is raised to
    /// sysinfo's minimum update interval when shorter.
    pub fn new(cpu_window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            cpu_window: cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl MetricsSource for SysinfoSource {
    #[instrument(skip(self), fields(source = "sysinfo", operation = "sample"))]
    async fn sample(&self) -> Result<Utilization, EcoError> {
        let sys = self.sys.clone();
        let window = self.cpu_window;
        tokio::task::spawn_blocking(move || {
            let mut sys = sys.lock().map_err(|e| {
                EcoError::MetricsSourceUnavailable(format!("sysinfo lock poisoned: {}", e))
            })?;
            sys.refresh_cpu_all();
            std::thread::sleep(window);
            sys.refresh_cpu_all();
            let cpu_percent = sys.global_cpu_usage() as f64;

            sys.refresh_memory();
            let total = sys.total_memory();
            if total == 0 {
                return Err(EcoError::MetricsSourceUnavailable(
                    "sysinfo reported zero total memory".into(),
                ));
            }
            let used = total.saturating_sub(sys.available_memory());
            let mem_percent = (used as f64 / total as f64) * 100.0;

            Ok(Utilization {
                cpu_percent: clamp_percent(cpu_percent),
                mem_percent: clamp_percent(mem_percent),
            })
        })
        .await
        .map_err(|e| EcoError::MetricsSourceUnavailable(format!("sysinfo task join: {}", e)))?
    }
}
