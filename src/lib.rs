// Library for the binary and tests

pub mod config;
pub mod error;
pub mod footprint;
pub mod metrics_source;
pub mod models;
pub mod power_model;
pub mod sampler;
pub mod tracker;
pub mod version;

pub use config::EcoConfig;
pub use error::EcoError;
pub use footprint::{FootprintCalculator, calculate};
pub use metrics_source::{MetricsSource, SysinfoSource};
pub use models::{FootprintReport, Sample, SampleLog, SessionState, Utilization};
pub use power_model::PowerModel;
pub use sampler::Sampler;
pub use tracker::{Tracked, track, track_blocking};
