// Typed failures surfaced by the sampling and estimation engine

use crate::models::SessionState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcoError {
    /// `start` on a session that is not idle, or `stop` on one that is not running.
    #[error("cannot {action} a session that is {state}")]
    InvalidStateTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("metrics source unavailable: {0}")]
    MetricsSourceUnavailable(String),

    /// No samples were collected, so there is nothing to report.
    #[error("insufficient data: no samples were collected")]
    InsufficientData,

    /// A setting or log parameter that would make the figures meaningless.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sample whose wattage is negative or not finite.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("background task failed: {0}")]
    TaskFailed(String),
}
