use serde::Deserialize;

/// Default config file looked up in the working directory when `ECOTRACE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "ecotrace.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EcoConfig {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub power: PowerConfig,
    #[serde(default)]
    pub carbon: CarbonConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_sampling_period_seconds")]
    pub sampling_period_seconds: f64,
    /// Window over which CPU usage is averaged for one sample. Counts toward the period.
    #[serde(default = "default_cpu_averaging_window_ms")]
    pub cpu_averaging_window_ms: u64,
    /// Consecutive failed metric reads after which the session is terminated.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

fn default_sampling_period_seconds() -> f64 {
    0.5
}

fn default_cpu_averaging_window_ms() -> u64 {
    100
}

fn default_max_consecutive_failures() -> u32 {
    5
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sampling_period_seconds: default_sampling_period_seconds(),
            cpu_averaging_window_ms: default_cpu_averaging_window_ms(),
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

/// Linear power model constants, in watts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PowerConfig {
    #[serde(default = "default_base_power_watts")]
    pub base_power_watts: f64,
    #[serde(default = "default_cpu_max_watts")]
    pub cpu_max_watts: f64,
    #[serde(default = "default_mem_max_watts")]
    pub mem_max_watts: f64,
}

fn default_base_power_watts() -> f64 {
    15.0
}

fn default_cpu_max_watts() -> f64 {
    65.0
}

fn default_mem_max_watts() -> f64 {
    10.0
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            base_power_watts: default_base_power_watts(),
            cpu_max_watts: default_cpu_max_watts(),
            mem_max_watts: default_mem_max_watts(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarbonConfig {
    /// Grid carbon intensity (kg CO2 per kWh). 0.4 is roughly the EU average.
    #[serde(default = "default_carbon_intensity_kg_per_kwh")]
    pub carbon_intensity_kg_per_kwh: f64,
    #[serde(default = "default_high_emissions_threshold_grams")]
    pub high_emissions_threshold_grams: f64,
}

fn default_carbon_intensity_kg_per_kwh() -> f64 {
    0.4
}

fn default_high_emissions_threshold_grams() -> f64 {
    10.0
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            carbon_intensity_kg_per_kwh: default_carbon_intensity_kg_per_kwh(),
            high_emissions_threshold_grams: default_high_emissions_threshold_grams(),
        }
    }
}

impl EcoConfig {
    /// Loads from `ECOTRACE_CONFIG`, else `ecotrace.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var("ECOTRACE_CONFIG") {
            Ok(p) => p,
            Err(_) if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                DEFAULT_CONFIG_FILE.into()
            }
            Err(_) => {
                tracing::debug!("no config file found; using defaults");
                return Ok(Self::default());
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: EcoConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let period = self.sampling.sampling_period_seconds;
        anyhow::ensure!(
            period.is_finite() && period > 0.0,
            "sampling.sampling_period_seconds must be > 0, got {}",
            period
        );
        anyhow::ensure!(
            self.sampling.max_consecutive_failures > 0,
            "sampling.max_consecutive_failures must be > 0, got {}",
            self.sampling.max_consecutive_failures
        );
        for (key, value) in [
            ("power.base_power_watts", self.power.base_power_watts),
            ("power.cpu_max_watts", self.power.cpu_max_watts),
            ("power.mem_max_watts", self.power.mem_max_watts),
            (
                "carbon.carbon_intensity_kg_per_kwh",
                self.carbon.carbon_intensity_kg_per_kwh,
            ),
            (
                "carbon.high_emissions_threshold_grams",
                self.carbon.high_emissions_threshold_grams,
            ),
        ] {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "{} must be >= 0, got {}",
                key,
                value
            );
        }
        Ok(())
    }
}
