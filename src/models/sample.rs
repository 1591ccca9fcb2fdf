// Point-in-time observations and the frozen log a session produces

use serde::{Deserialize, Serialize};

/// CPU and memory utilization as reported by a metrics source, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utilization {
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// One observation taken by the background sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Unix time in seconds, sub-second precision.
    pub timestamp: f64,
    pub watts: f64,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// Samples of one finished session, in the order they were taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleLog {
    pub samples: Vec<Sample>,
    pub sampling_period_seconds: f64,
    /// Metric reads that failed and were skipped during the session.
    pub skipped_samples: u32,
}

impl SampleLog {
    pub fn new(samples: Vec<Sample>, sampling_period_seconds: f64) -> Self {
        Self {
            samples,
            sampling_period_seconds,
            skipped_samples: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
