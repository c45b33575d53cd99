//! Error types for the analysis tools.

use pricer_core::types::PricingError;
use pricer_models::analytical::AnalyticalError;
use pricer_models::instruments::InstrumentError;
use pricer_models::market::MarketError;
use thiserror::Error;

use crate::greeks::GreeksError;
use crate::lattice::LatticeError;

/// Analysis errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The study does not apply to this request.
    #[error("Unsupported analysis: {0}")]
    Unsupported(String),

    /// Black-Scholes reference rejected its inputs.
    #[error("Reference price failed: {0}")]
    Reference(#[from] AnalyticalError),

    /// A swept parameter produced an invalid market.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// A swept strike is invalid.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// A lattice valuation failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// A sensitivity calculation failed.
    #[error(transparent)]
    Greeks(#[from] GreeksError),
}

impl From<AnalysisError> for PricingError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Unsupported(msg) => PricingError::UnsupportedInstrument(msg),
            AnalysisError::Lattice(e) => e.into(),
            AnalysisError::Greeks(e) => e.into(),
            AnalysisError::Market(e) => e.into(),
            AnalysisError::Instrument(e) => e.into(),
            AnalysisError::Reference(e) => PricingError::ModelFailure(e.to_string()),
        }
    }
}
