//! Convergence of lattice prices to Black-Scholes.

use pricer_models::analytical::bs_price;
use tracing::debug;

use super::error::AnalysisError;
use crate::lattice::{LatticeEngine, PricingRequest};

/// One row of a convergence table.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvergencePoint {
    /// Number of steps.
    pub steps: usize,
    /// Lattice price.
    pub tree: f64,
    /// Black-Scholes price.
    pub black_scholes: f64,
    /// `(tree - black_scholes) * steps`, roughly constant once converged.
    pub scaled_error: f64,
}

impl ConvergencePoint {
    /// `tree - black_scholes`.
    #[inline]
    pub fn error(&self) -> f64 {
        self.tree - self.black_scholes
    }
}

/// Black-Scholes price for the request's contract.
///
/// # Errors
/// `AnalysisError::Unsupported` unless the option is European and the
/// market pays no dividends.
pub fn black_scholes_reference(request: &PricingRequest) -> Result<f64, AnalysisError> {
    ensure_closed_form(request)?;
    let market = request.market();
    let option = request.option();
    Ok(bs_price(
        market.spot(),
        option.strike(),
        market.rate(),
        market.volatility(),
        market.maturity(),
        option.is_call(),
    )?)
}

fn ensure_closed_form(request: &PricingRequest) -> Result<(), AnalysisError> {
    if request.option().is_american() {
        return Err(AnalysisError::Unsupported(
            "Black-Scholes reference requires European exercise".to_string(),
        ));
    }
    if !request.market().is_dividend_free() {
        return Err(AnalysisError::Unsupported(
            "Black-Scholes reference requires a dividend-free market".to_string(),
        ));
    }
    Ok(())
}

/// `1, 1 + stride, 1 + 2 stride, ...` up to and including `max_steps`.
///
/// `max_steps` itself is always the last entry. A zero stride is treated
/// as 1.
pub fn step_schedule(max_steps: usize, stride: usize) -> Vec<usize> {
    if max_steps == 0 {
        return Vec::new();
    }
    let mut steps: Vec<usize> = (1..=max_steps).step_by(stride.max(1)).collect();
    if steps.last() != Some(&max_steps) {
        steps.push(max_steps);
    }
    steps
}

/// Prices `request` at each step count and compares with Black-Scholes.
///
/// # Errors
/// - `AnalysisError::Unsupported` for American options or dividend-paying markets
/// - `AnalysisError::Lattice` for invalid step counts
///
/// # Examples
/// ```
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::analysis::convergence_study;
/// use pricer_pricing::lattice::PricingRequest;
///
/// let request = PricingRequest::builder()
///     .market(Market::new(100.0, 0.05, 0.2, 1.0).unwrap())
///     .option(VanillaOption::european_call(100.0).unwrap())
///     .steps(1)
///     .build()
///     .unwrap();
///
/// let table = convergence_study(&request, &[25, 100, 500]).unwrap();
/// assert!(table[2].error().abs() < table[0].error().abs());
/// ```
pub fn convergence_study(
    request: &PricingRequest,
    steps: &[usize],
) -> Result<Vec<ConvergencePoint>, AnalysisError> {
    let black_scholes = black_scholes_reference(request)?;
    steps
        .iter()
        .map(|&n| -> Result<ConvergencePoint, AnalysisError> {
            let tree = LatticeEngine::price_value(&request.with_steps(n)?)?;
            debug!(steps = n, tree, black_scholes, "convergence point");
            Ok(ConvergencePoint {
                steps: n,
                tree,
                black_scholes,
                scaled_error: (tree - black_scholes) * n as f64,
            })
        })
        .collect()
}
