// Linear utilization -> watts estimator

use crate::config::PowerConfig;

/// Stateless linear model: `base + cpu_max * cpu/100 + mem_max * mem/100`.
///
/// Meant for comparing runs on the same machine, not for absolute measurement.
/// Constants are taken from [`PowerConfig`] so they can be recalibrated per hardware profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    base_power_watts: f64,
    cpu_max_watts: f64,
    mem_max_watts: f64,
}

impl Default for PowerModel {
    fn default() -> Self {
        Self::new(PowerConfig::default())
    }
}

impl PowerModel {
    pub fn new(config: PowerConfig) -> Self {
        Self {
            base_power_watts: config.base_power_watts,
            cpu_max_watts: config.cpu_max_watts,
            mem_max_watts: config.mem_max_watts,
        }
    }

    /// Estimated draw in watts. Percentages outside [0, 100] are clamped; NaN counts as 0.
    pub fn estimate_watts(&self, cpu_percent: f64, mem_percent: f64) -> f64 {
        self.base_power_watts
            + self.cpu_max_watts * (clamp_percent(cpu_percent) / 100.0)
            + self.mem_max_watts * (clamp_percent(mem_percent) / 100.0)
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
