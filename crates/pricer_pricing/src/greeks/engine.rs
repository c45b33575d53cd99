//! Bump-and-revalue sensitivity engine.
//!
//! Every Greek is a central difference of lattice prices on perturbed
//! markets. The distinct perturbations ("scenarios") are collected first
//! and each is priced once on a fresh lattice, in parallel when enabled.

use std::collections::HashMap;

use pricer_models::market::{Market, MarketError};
use rayon::prelude::*;
use tracing::debug;

use super::config::GreeksConfig;
use super::error::GreeksError;
use super::finite_difference::{
    central_difference, cross_difference, finite_or_zero, second_difference,
};
use super::result::GreeksResult;
use crate::lattice::{LatticeEngine, PricingRequest};

/// Absolute bump sizes actually applied to one market.
///
/// Bumps that would leave the valid domain are shrunk to half the base
/// value: `spot <= S0/2`, `volatility <= σ/2`, `time <= T/2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BumpSizes {
    /// Absolute spot bump.
    pub spot: f64,
    /// Absolute volatility bump.
    pub volatility: f64,
    /// Absolute rate bump.
    pub rate: f64,
    /// Maturity bump in years.
    pub time: f64,
}

impl BumpSizes {
    /// Bump sizes for `market` under `config`.
    pub fn for_market(config: &GreeksConfig, market: &Market) -> Self {
        Self {
            spot: (config.spot_bump_relative * market.spot()).min(0.5 * market.spot()),
            volatility: config.vol_bump_absolute.min(0.5 * market.volatility()),
            rate: config.rate_bump_absolute,
            time: config.time_bump_years.min(0.5 * market.maturity()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Scenario {
    Base,
    SpotUp,
    SpotDown,
    VolUp,
    VolDown,
    RateUp,
    RateDown,
    TimeUp,
    TimeDown,
    SpotUpVolUp,
    SpotUpVolDown,
    SpotDownVolUp,
    SpotDownVolDown,
}

impl Scenario {
    const FIRST_ORDER: [Scenario; 8] = [
        Scenario::SpotUp,
        Scenario::SpotDown,
        Scenario::VolUp,
        Scenario::VolDown,
        Scenario::RateUp,
        Scenario::RateDown,
        Scenario::TimeUp,
        Scenario::TimeDown,
    ];

    const SECOND_ORDER: [Scenario; 8] = [
        Scenario::SpotUp,
        Scenario::SpotDown,
        Scenario::VolUp,
        Scenario::VolDown,
        Scenario::SpotUpVolUp,
        Scenario::SpotUpVolDown,
        Scenario::SpotDownVolUp,
        Scenario::SpotDownVolDown,
    ];

    /// Signed (spot, vol, rate, time) bump multipliers.
    fn shifts(self) -> (f64, f64, f64, f64) {
        match self {
            Scenario::Base => (0.0, 0.0, 0.0, 0.0),
            Scenario::SpotUp => (1.0, 0.0, 0.0, 0.0),
            Scenario::SpotDown => (-1.0, 0.0, 0.0, 0.0),
            Scenario::VolUp => (0.0, 1.0, 0.0, 0.0),
            Scenario::VolDown => (0.0, -1.0, 0.0, 0.0),
            Scenario::RateUp => (0.0, 0.0, 1.0, 0.0),
            Scenario::RateDown => (0.0, 0.0, -1.0, 0.0),
            Scenario::TimeUp => (0.0, 0.0, 0.0, 1.0),
            Scenario::TimeDown => (0.0, 0.0, 0.0, -1.0),
            Scenario::SpotUpVolUp => (1.0, 1.0, 0.0, 0.0),
            Scenario::SpotUpVolDown => (1.0, -1.0, 0.0, 0.0),
            Scenario::SpotDownVolUp => (-1.0, 1.0, 0.0, 0.0),
            Scenario::SpotDownVolDown => (-1.0, -1.0, 0.0, 0.0),
        }
    }

    /// The bumped market. Shortening the maturity drops dividends that no
    /// longer fall strictly before it.
    fn apply(self, market: &Market, bumps: &BumpSizes) -> Result<Market, MarketError> {
        let (ds, dv, dr, dt) = self.shifts();
        let mut bumped = market.clone();
        if ds != 0.0 {
            bumped = bumped.with_spot(market.spot() + ds * bumps.spot)?;
        }
        if dv != 0.0 {
            bumped = bumped.with_volatility(market.volatility() + dv * bumps.volatility)?;
        }
        if dr != 0.0 {
            bumped = bumped.with_rate(market.rate() + dr * bumps.rate)?;
        }
        if dt != 0.0 {
            bumped = bumped.with_maturity(market.maturity() + dt * bumps.time)?;
        }
        Ok(bumped)
    }
}

/// Finite-difference Greeks on the lattice.
///
/// Each scenario reuses the request's steps, method and pruning threshold.
///
/// # Examples
/// ```
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::greeks::{GreeksConfig, SensitivityEngine};
/// use pricer_pricing::lattice::PricingRequest;
///
/// let request = PricingRequest::builder()
///     .market(Market::new(100.0, 0.05, 0.2, 1.0).unwrap())
///     .option(VanillaOption::european_call(100.0).unwrap())
///     .steps(100)
///     .build()
///     .unwrap();
///
/// let engine = SensitivityEngine::new(GreeksConfig::default());
/// let greeks = engine.compute(&request).unwrap();
/// let delta = greeks.delta.unwrap();
/// assert!(delta > 0.6 && delta < 0.7);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SensitivityEngine {
    config: GreeksConfig,
}

impl SensitivityEngine {
    /// Creates an engine.
    pub fn new(config: GreeksConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &GreeksConfig {
        &self.config
    }

    /// Price and the configured Greeks for `request`.
    ///
    /// # Errors
    /// - `GreeksError::InvalidConfig` if the configuration is invalid
    /// - `GreeksError::Market` if a bumped market is rejected
    /// - `GreeksError::Lattice` if a revaluation fails
    pub fn compute(&self, request: &PricingRequest) -> Result<GreeksResult<f64>, GreeksError> {
        self.config.validate()?;
        let bumps = BumpSizes::for_market(&self.config, request.market());
        let scenarios = self.scenarios();

        let revalue = |scenario: &Scenario| -> Result<(Scenario, f64), GreeksError> {
            let market = scenario.apply(request.market(), &bumps)?;
            let price = LatticeEngine::price_value(&request.with_market(market))?;
            Ok((*scenario, price))
        };
        let prices: HashMap<Scenario, f64> = if self.config.parallel {
            scenarios
                .par_iter()
                .map(revalue)
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .collect()
        } else {
            scenarios
                .iter()
                .map(revalue)
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .collect()
        };
        debug!(scenarios = prices.len(), parallel = self.config.parallel, "scenarios revalued");

        let p = |s: Scenario| prices.get(&s).copied().unwrap_or(f64::NAN);
        let base = p(Scenario::Base);
        let mut result = GreeksResult::new(base);

        if self.config.first_order {
            result = result
                .with_delta(finite_or_zero(
                    "delta",
                    central_difference(p(Scenario::SpotUp), p(Scenario::SpotDown), bumps.spot),
                ))
                .with_vega(finite_or_zero(
                    "vega",
                    central_difference(p(Scenario::VolUp), p(Scenario::VolDown), bumps.volatility),
                ))
                .with_rho(finite_or_zero(
                    "rho",
                    central_difference(p(Scenario::RateUp), p(Scenario::RateDown), bumps.rate),
                ))
                .with_theta(finite_or_zero(
                    "theta",
                    -central_difference(p(Scenario::TimeUp), p(Scenario::TimeDown), bumps.time),
                ));
        }

        if self.config.second_order {
            result = result
                .with_gamma(finite_or_zero(
                    "gamma",
                    second_difference(p(Scenario::SpotUp), base, p(Scenario::SpotDown), bumps.spot),
                ))
                .with_vanna(finite_or_zero(
                    "vanna",
                    cross_difference(
                        p(Scenario::SpotUpVolUp),
                        p(Scenario::SpotUpVolDown),
                        p(Scenario::SpotDownVolUp),
                        p(Scenario::SpotDownVolDown),
                        bumps.spot,
                        bumps.volatility,
                    ),
                ))
                .with_vomma(finite_or_zero(
                    "vomma",
                    second_difference(
                        p(Scenario::VolUp),
                        base,
                        p(Scenario::VolDown),
                        bumps.volatility,
                    ),
                ));
        }

        Ok(result)
    }

    fn scenarios(&self) -> Vec<Scenario> {
        let mut scenarios = vec![Scenario::Base];
        let mut add = |list: &[Scenario]| {
            for s in list {
                if !scenarios.contains(s) {
                    scenarios.push(*s);
                }
            }
        };
        if self.config.first_order {
            add(&Scenario::FIRST_ORDER);
        }
        if self.config.second_order {
            add(&Scenario::SECOND_ORDER);
        }
        scenarios
    }
}
