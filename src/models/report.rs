// Aggregate footprint of one monitored session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of integrating a session's samples. Values are rounded for presentation:
/// watts to 2 places, kWh to 6, CO2 grams to 3, tree units to 4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintReport {
    pub duration_seconds: f64,
    pub average_watts: f64,
    pub energy_kwh: f64,
    pub co2_grams: f64,
    /// Illustrative only: CO2 grams over the yearly absorption of one tree.
    pub equivalent_tree_units: f64,
    pub sample_count: usize,
}

impl FootprintReport {
    /// True when emissions exceed `threshold_grams`, the point past which the
    /// monitored work is worth optimizing.
    pub fn is_high_impact(&self, threshold_grams: f64) -> bool {
        self.co2_grams > threshold_grams
    }
}

impl fmt::Display for FootprintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Duration:          {:.1} seconds", self.duration_seconds)?;
        writeln!(f, "Average power:     {} watts", self.average_watts)?;
        writeln!(f, "Energy used:       {} kWh", self.energy_kwh)?;
        writeln!(f, "CO2 emitted:       {} grams", self.co2_grams)?;
        writeln!(f, "Tree equivalents:  {}", self.equivalent_tree_units)?;
        write!(f, "Samples:           {}", self.sample_count)
    }
}
