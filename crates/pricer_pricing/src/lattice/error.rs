//! Error types for lattice construction and pricing.

use pricer_core::types::PricingError;
use pricer_models::instruments::InstrumentError;
use pricer_models::market::MarketError;
use thiserror::Error;

use super::request::MAX_STEPS;

/// Lattice pricing errors.
///
/// Numerical degeneracies inside the lattice are resolved locally and never
/// surface here; these variants cover invalid requests only.
///
/// # Examples
/// ```
/// use pricer_pricing::lattice::LatticeError;
///
/// let err = LatticeError::InvalidStepCount(0);
/// assert!(err.to_string().contains("Invalid step count 0"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Step count outside `[1, MAX_STEPS]`.
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = MAX_STEPS)]
    InvalidStepCount(usize),

    /// Pruning threshold outside `[0, 1)`.
    #[error("Invalid pruning threshold {0}: must be finite and in [0, 1)")]
    InvalidPruningThreshold(f64),

    /// A required request field was never set.
    #[error("Missing request parameter: {0}")]
    MissingParameter(&'static str),

    /// Pricing produced a non-finite value.
    #[error("Non-finite lattice price: {0}")]
    NonFinitePrice(f64),

    /// Invalid market input.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// Invalid option input.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}

impl From<LatticeError> for PricingError {
    fn from(err: LatticeError) -> Self {
        match err {
            LatticeError::Market(e) => e.into(),
            LatticeError::Instrument(e) => e.into(),
            LatticeError::NonFinitePrice(_) => PricingError::NumericalInstability(err.to_string()),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LatticeError::InvalidStepCount(25_000).to_string(),
            "Invalid step count 25000: must be in range [1, 4000]"
        );
        assert!(LatticeError::InvalidPruningThreshold(1.0)
            .to_string()
            .contains("[0, 1)"));
    }

    #[test]
    fn test_transparent_sources() {
        let err: LatticeError = MarketError::InvalidVolatility { volatility: 0.0 }.into();
        assert_eq!(
            err.to_string(),
            MarketError::InvalidVolatility { volatility: 0.0 }.to_string()
        );
    }

    #[test]
    fn test_into_pricing_error() {
        let nan: PricingError = LatticeError::NonFinitePrice(f64::NAN).into();
        assert!(matches!(nan, PricingError::NumericalInstability(_)));

        let steps: PricingError = LatticeError::InvalidStepCount(0).into();
        assert!(matches!(steps, PricingError::InvalidInput(_)));
    }
}
