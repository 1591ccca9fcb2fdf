// Shared test helpers: metrics-source doubles and config builders

#![allow(dead_code)]

use ecotrace::config::EcoConfig;
use ecotrace::{EcoError, MetricsSource, Sample, SampleLog, Utilization};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Always reports the same utilization, instantly.
pub struct ConstantSource {
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

impl MetricsSource for ConstantSource {
    async fn sample(&self) -> Result<Utilization, EcoError> {
        Ok(Utilization {
            cpu_percent: self.cpu_percent,
            mem_percent: self.mem_percent,
        })
    }
}

/// Takes `delay` per read (like an averaging window) and counts reads.
pub struct SlowSource {
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl SlowSource {
    pub fn new(delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                delay,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl MetricsSource for SlowSource {
    async fn sample(&self) -> Result<Utilization, EcoError> {
        tokio::time::sleep(self.delay).await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Utilization {
            cpu_percent: 10.0,
            mem_percent: 10.0,
        })
    }
}

/// Plays back scripted results, then keeps reporting `fallback`.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Utilization, EcoError>>>,
    fallback: Result<Utilization, EcoError>,
}

impl ScriptedSource {
    pub fn new(
        script: Vec<Result<Utilization, EcoError>>,
        fallback: Result<Utilization, EcoError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
        }
    }

    pub fn always_failing() -> Self {
        Self::new(vec![], Err(unavailable()))
    }
}

impl MetricsSource for ScriptedSource {
    async fn sample(&self) -> Result<Utilization, EcoError> {
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn unavailable() -> EcoError {
    EcoError::MetricsSourceUnavailable("sensor offline".into())
}

pub fn utilization(cpu_percent: f64, mem_percent: f64) -> Utilization {
    Utilization {
        cpu_percent,
        mem_percent,
    }
}

pub fn config_with_period(period_secs: f64) -> EcoConfig {
    let mut config = EcoConfig::default();
    config.sampling.sampling_period_seconds = period_secs;
    config
}

pub fn log_of_watts(watts: &[f64], period_secs: f64) -> SampleLog {
    let samples = watts
        .iter()
        .enumerate()
        .map(|(i, &w)| Sample {
            timestamp: 1_700_000_000.0 + i as f64 * period_secs,
            watts: w,
            cpu_percent: 0.0,
            mem_percent: 0.0,
        })
        .collect();
    SampleLog::new(samples, period_secs)
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}
