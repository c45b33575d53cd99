//! Lattice construction.
//!
//! The trunk drifts at the risk-free rate and drops by the dividend owned
//! by each step:
//!
//! ```text
//! trunk[0] = S0
//! trunk[i] = max(trunk[i-1] exp(r dt) - D(trunk[i-1]), MIN_PRICE)
//! ```
//!
//! Level `i` prices form a geometric fan `trunk[i] * alpha^k`, `k ∈ [-i, i]`,
//! so the lattice recombines by construction. Every non-terminal node is
//! then calibrated.

use pricer_models::market::Market;
use tracing::debug;

use super::error::LatticeError;
use super::node::{Lattice, Level, Node};
use super::probabilities::{StepCalibrator, MIN_PRICE};
use super::request::MAX_STEPS;

/// Builds a calibrated lattice for a market and step count.
///
/// # Examples
/// ```
/// use pricer_models::market::Market;
/// use pricer_pricing::lattice::LatticeBuilder;
///
/// let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
/// let lattice = LatticeBuilder::new(&market, 10).unwrap().build();
///
/// assert_eq!(lattice.levels().len(), 11);
/// assert_eq!(lattice.levels()[10].len(), 21);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LatticeBuilder<'a> {
    market: &'a Market,
    steps: usize,
}

impl<'a> LatticeBuilder<'a> {
    /// Creates a builder.
    ///
    /// # Errors
    /// `LatticeError::InvalidStepCount` unless `1 <= steps <= MAX_STEPS`.
    pub fn new(market: &'a Market, steps: usize) -> Result<Self, LatticeError> {
        if steps == 0 || steps > MAX_STEPS {
            return Err(LatticeError::InvalidStepCount(steps));
        }
        Ok(Self { market, steps })
    }

    /// Builds prices and transitions.
    pub fn build(self) -> Lattice {
        let n = self.steps;
        let dt = self.market.maturity() / n as f64;
        let calibrator = StepCalibrator::new(self.market, dt);
        let alpha = calibrator.alpha();

        let trunk = self.trunk(dt, calibrator.growth());

        let mut levels: Vec<Level> = (0..=n)
            .map(|i| {
                let slots = (-(i as i64)..=i as i64)
                    .map(|k| Some(Node::new(i, k, trunk[i] * alpha.powi(k as i32))))
                    .collect();
                Level::new(i, slots)
            })
            .collect();

        for (i, level) in levels.iter_mut().take(n).enumerate() {
            let next_trunk = trunk[i + 1];
            for node in level.slots_mut().iter_mut().flatten() {
                node.transition = Some(calibrator.calibrate(i, node.stock_price, next_trunk));
            }
        }

        debug!(
            steps = n,
            dt,
            alpha,
            dividends = self.market.dividends().len(),
            "lattice built"
        );

        Lattice {
            steps: n,
            dt,
            alpha,
            exp_sig2_dt: calibrator.exp_sig2_dt(),
            discount: (-self.market.rate() * dt).exp(),
            trunk,
            levels,
        }
    }

    fn trunk(&self, dt: f64, growth: f64) -> Vec<f64> {
        let mut trunk = Vec::with_capacity(self.steps + 1);
        trunk.push(self.market.spot());
        for i in 1..=self.steps {
            let prev = trunk[i - 1];
            let div = self
                .market
                .dividend_on_step((i - 1) as f64 * dt, i as f64 * dt, prev);
            trunk.push((prev * growth - div).max(MIN_PRICE));
        }
        trunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::market::DividendPolicy;

    #[test]
    fn test_rejects_bad_step_counts() {
        let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
        assert_eq!(
            LatticeBuilder::new(&market, 0).unwrap_err(),
            LatticeError::InvalidStepCount(0)
        );
        assert!(LatticeBuilder::new(&market, MAX_STEPS + 1).is_err());
        assert!(LatticeBuilder::new(&market, 1).is_ok());
    }

    #[test]
    fn test_shape_and_terminal_level() {
        let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
        let lattice = LatticeBuilder::new(&market, 25).unwrap().build();
        for (i, level) in lattice.levels().iter().enumerate() {
            assert_eq!(level.len(), 2 * i + 1);
            assert_eq!(level.index(), i);
            let expect_transition = i < 25;
            assert!(level
                .nodes()
                .all(|n| n.transition.is_some() == expect_transition));
        }
        assert_eq!(lattice.node_count(), 26 * 26);
    }

    #[test]
    fn test_trunk_drifts_at_rate_without_dividends() {
        let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
        let lattice = LatticeBuilder::new(&market, 50).unwrap().build();
        assert_relative_eq!(lattice.trunk()[50], 100.0 * 0.05_f64.exp(), max_relative = 1e-12);
        let level = &lattice.levels()[3];
        assert_relative_eq!(
            level.node(2).unwrap().stock_price,
            lattice.trunk()[3] * lattice.alpha().powi(2)
        );
    }

    #[test]
    fn test_huge_dividend_floors_trunk() {
        let policy = DividendPolicy::new(5.0, 0.0, 0.0).unwrap();
        let market = Market::builder()
            .spot(100.0)
            .rate(0.0)
            .volatility(0.2)
            .maturity(1.0)
            .dividend(0.5, policy)
            .build()
            .unwrap();
        let lattice = LatticeBuilder::new(&market, 10).unwrap().build();
        assert_eq!(lattice.trunk()[5], MIN_PRICE);
        assert!(lattice.trunk().iter().all(|&s| s > 0.0));
    }

    #[test]
    fn test_dividend_near_origin_drops_first_trunk_step() {
        let policy = DividendPolicy::new(0.02, 0.0, 0.0).unwrap();
        let market = Market::builder()
            .spot(100.0)
            .rate(0.05)
            .volatility(0.2)
            .maturity(1.0)
            .dividend(5e-5, policy)
            .build()
            .unwrap();
        let plain = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();

        let with_div = LatticeBuilder::new(&market, 10).unwrap().build();
        let without = LatticeBuilder::new(&plain, 10).unwrap().build();
        assert_relative_eq!(
            with_div.trunk()[1],
            without.trunk()[1] - 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lattice_constants() {
        let market = Market::new(100.0, 0.05, 0.2, 2.0).unwrap();
        let lattice = LatticeBuilder::new(&market, 100).unwrap().build();
        assert_relative_eq!(lattice.dt(), 0.02);
        assert_relative_eq!(lattice.alpha(), (0.2 * 0.06_f64.sqrt()).exp());
        assert_relative_eq!(lattice.exp_sig2_dt(), (0.04 * 0.02_f64).exp());
        assert_relative_eq!(lattice.discount(), (-0.05 * 0.02_f64).exp());
    }
}
