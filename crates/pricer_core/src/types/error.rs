//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Common denominator for every pricing failure in the workspace
//! - `DateError`: Errors from date construction and parsing
//!
//! Layer-specific errors (market, instrument, lattice) convert into
//! [`PricingError`] so callers that do not care about the origin can use a
//! single error type.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidInput`: Invalid market data or parameters
/// - `NumericalInstability`: Computation produced a non-finite value
/// - `ModelFailure`: Model assumptions violated
/// - `UnsupportedInstrument`: Instrument or configuration not supported by the engine
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical instability during computation
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Model failed to produce valid result
    #[error("Model failure: {0}")]
    ModelFailure(String),

    /// Instrument type not supported
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),
}

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

impl From<DateError> for PricingError {
    fn from(err: DateError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::NumericalInstability("NaN price".to_string());
        assert_eq!(err.to_string(), "Numerical instability: NaN price");

        let err = PricingError::ModelFailure("negative probability".to_string());
        assert_eq!(err.to_string(), "Model failure: negative probability");

        let err = PricingError::UnsupportedInstrument("digital".to_string());
        assert_eq!(err.to_string(), "Unsupported instrument: digital");
    }

    #[test]
    fn test_date_error_display() {
        let err = DateError::ParseError("2024-13-01".to_string());
        assert_eq!(err.to_string(), "Date parse error: 2024-13-01");
    }

    #[test]
    fn test_date_error_into_pricing_error() {
        let err: PricingError = DateError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        }
        .into();
        match err {
            PricingError::InvalidInput(msg) => assert!(msg.contains("2023-2-29")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::InvalidInput("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
