// Integrates a finished sample log into energy and CO2 figures.
//
// Duration is sample_count * sampling_period rather than the span between the first and
// last timestamps: each sample stands for one period, so a one-sample run still reports a
// non-zero duration. This is an approximation and drifts from wall time when reads are slow.

use crate::config::EcoConfig;
use crate::error::EcoError;
use crate::models::{FootprintReport, SampleLog};

/// Approximate CO2 (grams) one tree absorbs per year. Illustrative, not a scientific ratio.
pub const TREE_CO2_GRAMS_PER_YEAR: f64 = 21_000.0;

const SECONDS_PER_HOUR: f64 = 3600.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;
const GRAMS_PER_KG: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintCalculator {
    carbon_intensity_kg_per_kwh: f64,
}

impl Default for FootprintCalculator {
    fn default() -> Self {
        Self::new(0.4)
    }
}

impl FootprintCalculator {
    pub fn new(carbon_intensity_kg_per_kwh: f64) -> Self {
        Self {
            carbon_intensity_kg_per_kwh,
        }
    }

    pub fn from_config(config: &EcoConfig) -> Self {
        Self::new(config.carbon.carbon_intensity_kg_per_kwh)
    }

    /// Fails with [`EcoError::InsufficientData`] on an empty log; never fabricates a report.
    pub fn calculate(&self, log: &SampleLog) -> Result<FootprintReport, EcoError> {
        if log.is_empty() {
            return Err(EcoError::InsufficientData);
        }
        self.check_inputs(log)?;

        let count = log.len();
        let total_watts: f64 = log.samples.iter().map(|s| s.watts).sum();
        let average_watts = total_watts / count as f64;
        let duration_seconds = count as f64 * log.sampling_period_seconds;
        let energy_kwh = average_watts * (duration_seconds / SECONDS_PER_HOUR) / WATTS_PER_KILOWATT;
        let co2_grams = energy_kwh * self.carbon_intensity_kg_per_kwh * GRAMS_PER_KG;
        let equivalent_tree_units = co2_grams / TREE_CO2_GRAMS_PER_YEAR;

        Ok(FootprintReport {
            duration_seconds,
            average_watts: round_to(average_watts, 2),
            energy_kwh: round_to(energy_kwh, 6),
            co2_grams: round_to(co2_grams, 3),
            equivalent_tree_units: round_to(equivalent_tree_units, 4),
            sample_count: count,
        })
    }

    /// Hand-built calculators and logs are not validated on construction; reject anything
    /// that would turn into a negative or NaN report.
    fn check_inputs(&self, log: &SampleLog) -> Result<(), EcoError> {
        let intensity = self.carbon_intensity_kg_per_kwh;
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(EcoError::InvalidConfig(format!(
                "carbon.carbon_intensity_kg_per_kwh must be >= 0, got {}",
                intensity
            )));
        }
        let period = log.sampling_period_seconds;
        if !period.is_finite() || period <= 0.0 {
            return Err(EcoError::InvalidConfig(format!(
                "sampling.sampling_period_seconds must be > 0, got {}",
                period
            )));
        }
        if let Some((i, s)) = log
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| !s.watts.is_finite() || s.watts < 0.0)
        {
            return Err(EcoError::InvalidSample(format!("sample {} has {} watts", i, s.watts)));
        }
        Ok(())
    }
}

/// Shorthand for `FootprintCalculator::new(carbon_intensity).calculate(log)`.
pub fn calculate(
    log: &SampleLog,
    carbon_intensity_kg_per_kwh: f64,
) -> Result<FootprintReport, EcoError> {
    FootprintCalculator::new(carbon_intensity_kg_per_kwh).calculate(log)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
