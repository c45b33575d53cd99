//! CLI error types.

use pricer_core::types::{DateError, PricingError};
use pricer_models::analytical::AnalyticalError;
use pricer_models::instruments::InstrumentError;
use pricer_models::market::MarketError;
use pricer_pricing::analysis::AnalysisError;
use pricer_pricing::greeks::GreeksError;
use pricer_pricing::lattice::LatticeError;
use thiserror::Error;

/// Errors raised by the `trinomial` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration sources could not be merged or deserialised.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A command-line or configuration value is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// ISO date parsing failed.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Market parameters rejected.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// Option parameters rejected.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Closed-form reference rejected its inputs.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Lattice valuation failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// Sensitivity computation failed.
    #[error(transparent)]
    Greeks(#[from] GreeksError),

    /// Study failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// File output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML output failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

impl From<CliError> for PricingError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Date(e) => e.into(),
            CliError::Market(e) => e.into(),
            CliError::Instrument(e) => e.into(),
            CliError::Analytical(e) => e.into(),
            CliError::Lattice(e) => e.into(),
            CliError::Greeks(e) => e.into(),
            CliError::Analysis(e) => e.into(),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_mapping() {
        let err: PricingError = CliError::Lattice(LatticeError::InvalidStepCount(0)).into();
        let direct: PricingError = LatticeError::InvalidStepCount(0).into();
        assert_eq!(err, direct);
    }

    #[test]
    fn test_service_errors_become_invalid_input() {
        let err: PricingError = CliError::InvalidArgument("format".into()).into();
        assert!(matches!(err, PricingError::InvalidInput(msg) if msg.contains("format")));
    }
}
