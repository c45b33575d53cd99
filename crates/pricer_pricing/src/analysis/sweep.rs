//! Parameter sweeps against Black-Scholes.
//!
//! The Black-Scholes column ignores dividends and early exercise, so for
//! such contracts the difference column measures those effects rather than
//! discretisation error.

use pricer_models::analytical::{bs_greeks, bs_price, Greeks};

use super::error::AnalysisError;
use crate::greeks::{GreeksConfig, GreeksResult, SensitivityEngine};
use crate::lattice::{LatticeEngine, PricingRequest};

/// One row of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SweepPoint {
    /// Swept parameter value (strike or volatility).
    pub parameter: f64,
    /// Black-Scholes price.
    pub black_scholes: f64,
    /// Lattice price.
    pub tree: f64,
    /// `tree - black_scholes`.
    pub difference: f64,
}

/// Tree and Black-Scholes Greeks at one strike.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StrikeGreeks {
    /// Strike.
    pub strike: f64,
    /// Finite-difference lattice Greeks.
    pub tree: GreeksResult<f64>,
    /// Closed-form Greeks.
    pub black_scholes: Greeks<f64>,
}

/// `n` evenly spaced points from `start` to `end` inclusive.
///
/// # Examples
/// ```
/// use pricer_pricing::analysis::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Default strike grid: 20 strikes from 90% to 110% of spot.
pub fn default_strikes(spot: f64) -> Vec<f64> {
    linspace(0.9 * spot, 1.1 * spot, 20)
}

/// Default volatility grid: 30 points from 5% to 50%.
pub fn default_volatilities() -> Vec<f64> {
    linspace(0.05, 0.5, 30)
}

fn reference(request: &PricingRequest) -> Result<f64, AnalysisError> {
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

fn point(parameter: f64, request: &PricingRequest) -> Result<SweepPoint, AnalysisError> {
    let black_scholes = reference(request)?;
    let tree = LatticeEngine::price_value(request)?;
    Ok(SweepPoint {
        parameter,
        black_scholes,
        tree,
        difference: tree - black_scholes,
    })
}

/// Reprices `request` at each strike.
///
/// # Errors
/// `AnalysisError::Instrument` for a non-positive strike, or any pricing error.
pub fn strike_sweep(
    request: &PricingRequest,
    strikes: &[f64],
) -> Result<Vec<SweepPoint>, AnalysisError> {
    strikes
        .iter()
        .map(|&k| -> Result<SweepPoint, AnalysisError> {
            let option = request.option().with_strike(k)?;
            point(k, &request.with_option(option))
        })
        .collect()
}

/// Reprices `request` at each volatility.
///
/// # Errors
/// `AnalysisError::Market` for a non-positive volatility, or any pricing error.
pub fn volatility_sweep(
    request: &PricingRequest,
    volatilities: &[f64],
) -> Result<Vec<SweepPoint>, AnalysisError> {
    volatilities
        .iter()
        .map(|&sigma| -> Result<SweepPoint, AnalysisError> {
            let market = request.market().with_volatility(sigma)?;
            point(sigma, &request.with_market(market))
        })
        .collect()
}

/// Lattice and Black-Scholes Greeks at each strike.
///
/// # Errors
/// `AnalysisError::Instrument` for a non-positive strike, or any
/// sensitivity error.
pub fn greeks_by_strike(
    request: &PricingRequest,
    strikes: &[f64],
    config: &GreeksConfig,
) -> Result<Vec<StrikeGreeks>, AnalysisError> {
    let engine = SensitivityEngine::new(config.clone());
    let market = request.market();
    strikes
        .iter()
        .map(|&k| -> Result<StrikeGreeks, AnalysisError> {
            let option = request.option().with_strike(k)?;
            let tree = engine.compute(&request.with_option(option))?;
            let black_scholes = bs_greeks(
                market.spot(),
                k,
                market.rate(),
                market.volatility(),
                market.maturity(),
                option.is_call(),
            )?;
            Ok(StrikeGreeks {
                strike: k,
                tree,
                black_scholes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_models::instruments::VanillaOption;
    use pricer_models::market::Market;

    fn request() -> PricingRequest {
        PricingRequest::builder()
            .market(Market::new(100.0, 0.05, 0.2, 1.0).unwrap())
            .option(VanillaOption::european_call(100.0).unwrap())
            .steps(150)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_grids() {
        let strikes = default_strikes(100.0);
        assert_eq!(strikes.len(), 20);
        assert!((strikes[0] - 90.0).abs() < 1e-12);
        assert!((strikes[19] - 110.0).abs() < 1e-12);

        let vols = default_volatilities();
        assert_eq!(vols.len(), 30);
        assert!((vols[29] - 0.5).abs() < 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_strike_sweep_close_and_monotone() {
        let rows = strike_sweep(&request(), &[90.0, 100.0, 110.0]).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.difference.abs() < 0.05, "K={} diff={}", row.parameter, row.difference);
        }
        assert!(rows[0].tree > rows[1].tree && rows[1].tree > rows[2].tree);
    }

    #[test]
    fn test_volatility_sweep_increasing() {
        let rows = volatility_sweep(&request(), &[0.1, 0.3, 0.5]).unwrap();
        assert!(rows.windows(2).all(|w| w[1].tree > w[0].tree));
        assert!(rows.iter().all(|r| r.difference.abs() < 0.1));
    }

    #[test]
    fn test_invalid_sweep_values() {
        assert!(matches!(
            strike_sweep(&request(), &[-1.0]),
            Err(AnalysisError::Instrument(_))
        ));
        assert!(matches!(
            volatility_sweep(&request(), &[0.0]),
            Err(AnalysisError::Market(_))
        ));
    }

    #[test]
    fn test_greeks_by_strike() {
        let config = GreeksConfig::builder().second_order(false).build().unwrap();
        let rows = greeks_by_strike(&request().with_steps(80).unwrap(), &[95.0, 105.0], &config)
            .unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            let delta = row.tree.delta.unwrap();
            assert!((delta - row.black_scholes.delta).abs() < 0.03);
        }
        assert!(rows[0].tree.delta > rows[1].tree.delta);
    }
}
