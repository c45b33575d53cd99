//! Market construction errors.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Errors raised while validating market inputs.
///
/// Every variant names the offending parameter and carries its value so the
/// caller can report exactly what was rejected.
///
/// # Examples
/// ```
/// use pricer_models::market::MarketError;
///
/// let err = MarketError::InvalidMaturity { maturity: 0.0 };
/// assert_eq!(format!("{}", err), "Invalid maturity: T = 0 (must be positive and finite)");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Spot price is not strictly positive and finite.
    #[error("Invalid spot: S0 = {spot} (must be positive and finite)")]
    InvalidSpot {
        /// The rejected spot
        spot: f64,
    },

    /// Interest rate is not finite.
    #[error("Invalid rate: r = {rate} (must be finite)")]
    InvalidRate {
        /// The rejected rate
        rate: f64,
    },

    /// Volatility is not strictly positive and finite.
    #[error("Invalid volatility: sigma = {volatility} (must be positive and finite)")]
    InvalidVolatility {
        /// The rejected volatility
        volatility: f64,
    },

    /// Maturity is not strictly positive and finite.
    #[error("Invalid maturity: T = {maturity} (must be positive and finite)")]
    InvalidMaturity {
        /// The rejected maturity
        maturity: f64,
    },

    /// A dividend policy parameter is out of range.
    #[error("Invalid dividend policy: {name} = {value}")]
    InvalidDividendPolicy {
        /// Parameter name (`rho`, `lam` or `t0`)
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Dividend time lies outside the open interval (0, T).
    #[error("Dividend at t = {time} lies outside (0, {maturity})")]
    DividendOutsideHorizon {
        /// Dividend time in years
        time: f64,
        /// Market maturity in years
        maturity: f64,
    },

    /// Two dividends share the same time.
    #[error("Duplicate dividend at t = {time}")]
    DuplicateDividend {
        /// The repeated time
        time: f64,
    },

    /// A required builder field was never set.
    #[error("Missing market parameter: {0}")]
    MissingParameter(&'static str),
}

impl From<MarketError> for PricingError {
    fn from(err: MarketError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
