//! Error types for sensitivity calculation.

use pricer_core::types::PricingError;
use pricer_models::market::MarketError;
use thiserror::Error;

use crate::lattice::LatticeError;

/// Sensitivity engine errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GreeksError {
    /// A bump size is not positive and finite, or out of range.
    #[error("Invalid Greeks configuration: {name} = {value}")]
    InvalidConfig {
        /// Offending field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A bumped market failed validation.
    #[error("Bumped market rejected: {0}")]
    Market(#[from] MarketError),

    /// A scenario revaluation failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

impl From<GreeksError> for PricingError {
    fn from(err: GreeksError) -> Self {
        match err {
            GreeksError::Lattice(e) => e.into(),
            GreeksError::Market(e) => PricingError::ModelFailure(e.to_string()),
            GreeksError::InvalidConfig { .. } => PricingError::InvalidInput(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GreeksError::InvalidConfig {
            name: "spot_bump_relative",
            value: -0.01,
        };
        assert_eq!(
            err.to_string(),
            "Invalid Greeks configuration: spot_bump_relative = -0.01"
        );
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = GreeksError::Lattice(LatticeError::InvalidStepCount(0)).into();
        assert!(matches!(err, PricingError::InvalidInput(_)));

        let err: PricingError = GreeksError::Market(MarketError::InvalidSpot { spot: -1.0 }).into();
        assert!(matches!(err, PricingError::ModelFailure(_)));
    }
}
