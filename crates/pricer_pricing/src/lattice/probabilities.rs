//! Per-node transition probability calibration.
//!
//! For a node at price `S` on level `i`, the one-step risk-neutral moments
//! are
//!
//! ```text
//! E = S exp(r dt) - D(S)            (D: dividend owned by the step)
//! V = S² exp(2 r dt) (exp(σ² dt) - 1)
//! ```
//!
//! The calibrator picks the middle child `kprime` on the next level so that
//! `E` is bracketed by the midpoints to its neighbours, then matches the
//! first two moments with three probabilities. Every degenerate case falls
//! back to a valid distribution; calibration never fails.

use pricer_models::market::Market;

use super::node::Transition;

/// Floor applied to forward prices and trunk values.
pub const MIN_PRICE: f64 = 1e-12;

/// Variance below which a step is treated as deterministic.
pub const DEGENERATE_VARIANCE: f64 = 1e-18;

/// Threshold for a vanishing denominator or probability mass.
pub const PROBABILITY_EPSILON: f64 = 1e-14;

/// Maximum number of ±1 shifts when recentring `kprime`.
pub const MAX_RECENTRE_ITERATIONS: usize = 10;

/// Step-level constants shared by every node of a lattice.
#[derive(Debug, Clone, Copy)]
pub struct StepCalibrator<'a> {
    market: &'a Market,
    dt: f64,
    alpha: f64,
    ln_alpha: f64,
    exp_sig2_dt: f64,
    growth: f64,
    den: f64,
}

impl<'a> StepCalibrator<'a> {
    /// Calibrator for steps of length `dt` in `market`.
    pub fn new(market: &'a Market, dt: f64) -> Self {
        let sigma = market.volatility();
        let alpha = (sigma * (3.0 * dt).sqrt()).exp();
        Self {
            market,
            dt,
            alpha,
            ln_alpha: alpha.ln(),
            exp_sig2_dt: (sigma * sigma * dt).exp(),
            growth: (market.rate() * dt).exp(),
            den: (1.0 - alpha) * (1.0 / (alpha * alpha) - 1.0),
        }
    }

    /// Spacing multiplier `alpha`.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `exp(σ² dt)`.
    #[inline]
    pub fn exp_sig2_dt(&self) -> f64 {
        self.exp_sig2_dt
    }

    /// One-step growth factor `exp(r dt)`.
    #[inline]
    pub fn growth(&self) -> f64 {
        self.growth
    }

    /// Calibrates the transition out of a node at `spot` on `level`, whose
    /// children live on the level with trunk price `next_trunk`.
    ///
    /// The returned `kprime` always lies in `[-level, level]`, so the three
    /// children `kprime - 1 ..= kprime + 1` exist in level `level + 1`.
    pub fn calibrate(&self, level: usize, spot: f64, next_trunk: f64) -> Transition {
        let t_i = level as f64 * self.dt;
        let t_ip1 = (level + 1) as f64 * self.dt;
        let dividend = self.market.dividend_on_step(t_i, t_ip1, spot);
        let has_dividend = self.market.has_dividend_between(t_i, t_ip1);

        let mean = spot * self.growth - dividend;
        let variance = spot * spot * self.growth * self.growth * (self.exp_sig2_dt - 1.0);
        let bound = level as i64;
        let kprime = self.nearest_offset(mean, next_trunk, bound);

        if variance < DEGENERATE_VARIANCE {
            return self.deterministic(mean, next_trunk, kprime);
        }

        let (kprime, s_mid) = self.recentre(mean, next_trunk, kprime, bound);

        if self.den.abs() < PROBABILITY_EPSILON {
            return Transition::certain(kprime);
        }

        let (p_down, p_up) = if has_dividend {
            let m1 = mean / s_mid;
            let m2 = (variance + mean * mean) / (s_mid * s_mid);
            let p_down = ((m2 - 1.0) - (self.alpha + 1.0) * (m1 - 1.0)) / self.den;
            let p_up = (m1 - 1.0 - (1.0 / self.alpha - 1.0) * p_down) / (self.alpha - 1.0);
            (p_down, p_up)
        } else {
            let p_down = (self.exp_sig2_dt - 1.0) / self.den;
            (p_down, p_down / self.alpha)
        };

        normalised(p_down, 1.0 - p_up - p_down, p_up, kprime)
    }

    /// `round(ln(E / trunk) / ln(alpha))` clamped to `[-bound, bound]`.
    fn nearest_offset(&self, mean: f64, next_trunk: f64, bound: i64) -> i64 {
        let raw = ((mean.max(MIN_PRICE) / next_trunk).ln() / self.ln_alpha).round();
        if raw.is_nan() {
            return 0;
        }
        // Float-to-int casts saturate, so ±inf lands on the clamp.
        (raw as i64).clamp(-bound, bound)
    }

    /// Shifts `kprime` until `E` lies between the midpoints to the
    /// neighbouring children, without leaving `[-bound, bound]`.
    fn recentre(&self, mean: f64, next_trunk: f64, mut kprime: i64, bound: i64) -> (i64, f64) {
        let mut s_mid = self.price_at(next_trunk, kprime);
        for _ in 0..MAX_RECENTRE_ITERATIONS {
            let lower = 0.5 * (s_mid + s_mid / self.alpha);
            let upper = 0.5 * (s_mid + s_mid * self.alpha);
            if mean < lower && kprime > -bound {
                kprime -= 1;
            } else if mean > upper && kprime < bound {
                kprime += 1;
            } else {
                break;
            }
            s_mid = self.price_at(next_trunk, kprime);
        }
        (kprime, s_mid)
    }

    /// All mass on whichever candidate child is closest to `mean`.
    fn deterministic(&self, mean: f64, next_trunk: f64, kprime: i64) -> Transition {
        let s_mid = self.price_at(next_trunk, kprime);
        let candidates = [s_mid / self.alpha, s_mid, s_mid * self.alpha];
        let mut closest = 1;
        for (idx, candidate) in candidates.iter().enumerate() {
            if (candidate - mean).abs() < (candidates[closest] - mean).abs() {
                closest = idx;
            }
        }
        let mut p = [0.0; 3];
        p[closest] = 1.0;
        Transition {
            p_down: p[0],
            p_mid: p[1],
            p_up: p[2],
            kprime,
        }
    }

    #[inline]
    fn price_at(&self, trunk: f64, offset: i64) -> f64 {
        trunk * self.alpha.powi(offset as i32)
    }
}

/// Clips negative components to zero and rescales to unit mass; collapses
/// to `p_mid = 1` when nothing is left.
fn normalised(p_down: f64, p_mid: f64, p_up: f64, kprime: i64) -> Transition {
    let clip = |p: f64| if p.is_finite() { p.max(0.0) } else { 0.0 };
    let (d, m, u) = (clip(p_down), clip(p_mid), clip(p_up));
    let total = d + m + u;
    if total < PROBABILITY_EPSILON {
        return Transition::certain(kprime);
    }
    Transition {
        p_down: d / total,
        p_mid: m / total,
        p_up: u / total,
        kprime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::market::DividendPolicy;

    fn market() -> Market {
        Market::new(100.0, 0.05, 0.2, 1.0).unwrap()
    }

    fn assert_simplex(t: &Transition) {
        for p in t.probabilities() {
            assert!((0.0..=1.0).contains(&p), "probability {} out of range", p);
        }
        assert_relative_eq!(t.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_dividend_closed_form() {
        let m = market();
        let dt = 0.01;
        let cal = StepCalibrator::new(&m, dt);
        let next_trunk = 100.0 * cal.growth();
        let t = cal.calibrate(0, 100.0, next_trunk);

        let alpha = cal.alpha();
        let den = (1.0 - alpha) * (1.0 / (alpha * alpha) - 1.0);
        let p_down = (cal.exp_sig2_dt() - 1.0) / den;
        assert_eq!(t.kprime, 0);
        assert_relative_eq!(t.p_down, p_down, epsilon = 1e-12);
        assert_relative_eq!(t.p_up, p_down / alpha, epsilon = 1e-12);
        assert_simplex(&t);
        // Close to the textbook 1/6, 2/3, 1/6 for small dt.
        assert!((t.p_down - 1.0 / 6.0).abs() < 0.01);
    }

    #[test]
    fn test_moments_matched_with_dividend() {
        let policy = DividendPolicy::new(0.02, 0.0, 0.0).unwrap();
        let m = Market::builder()
            .spot(100.0)
            .rate(0.05)
            .volatility(0.2)
            .maturity(1.0)
            .dividend(0.5, policy)
            .build()
            .unwrap();
        let steps = 100;
        let dt = 1.0 / steps as f64;
        let cal = StepCalibrator::new(&m, dt);
        let level = 49; // step (0.49, 0.50] owns the dividend
        let trunk_i = 100.0 * (cal.growth().ln() * level as f64).exp();
        let next_trunk = trunk_i * cal.growth() - m.dividend_on_step(0.49, 0.50, trunk_i);

        let spot = trunk_i * cal.alpha().powi(3);
        let t = cal.calibrate(level, spot, next_trunk);
        assert_simplex(&t);

        let mean = spot * cal.growth() - m.dividend_on_step(0.49, 0.50, spot);
        let var = spot * spot * cal.growth().powi(2) * (cal.exp_sig2_dt() - 1.0);
        let s_mid = next_trunk * cal.alpha().powi(t.kprime as i32);
        let children = [s_mid / cal.alpha(), s_mid, s_mid * cal.alpha()];
        let lattice_mean: f64 = t.probabilities().iter().zip(children).map(|(p, s)| p * s).sum();
        let lattice_m2: f64 = t
            .probabilities()
            .iter()
            .zip(children)
            .map(|(p, s)| p * s * s)
            .sum();
        assert_relative_eq!(lattice_mean, mean, max_relative = 1e-9);
        assert_relative_eq!(lattice_m2, var + mean * mean, max_relative = 1e-9);
    }

    #[test]
    fn test_kprime_stays_inside_level_bounds() {
        // A large proportional dividend pushes the forward far below the
        // trunk; kprime must still leave all three children addressable.
        let policy = DividendPolicy::new(0.5, 50.0, 0.0).unwrap();
        let m = Market::builder()
            .spot(100.0)
            .rate(0.05)
            .volatility(0.2)
            .maturity(1.0)
            .dividend(0.05, policy)
            .build()
            .unwrap();
        let dt = 0.01;
        let cal = StepCalibrator::new(&m, dt);
        for level in 0..10 {
            let t_i = level as f64 * dt;
            let t_ip1 = t_i + dt;
            let next_trunk = 100.0 * cal.growth() - m.dividend_on_step(t_i, t_ip1, 100.0);
            for k in -(level as i32)..=(level as i32) {
                let t = cal.calibrate(level, 100.0 * cal.alpha().powi(k), next_trunk.max(MIN_PRICE));
                assert!(t.kprime.abs() <= level as i64);
                assert_simplex(&t);
            }
        }
    }

    #[test]
    fn test_degenerate_variance_puts_all_mass_on_one_child() {
        let m = Market::new(100.0, 0.05, 1e-12, 1.0).unwrap();
        let cal = StepCalibrator::new(&m, 0.02);
        let t = cal.calibrate(0, 100.0, 100.0 * cal.growth());
        assert_simplex(&t);
        assert_eq!(t.probabilities().iter().filter(|&&p| p == 1.0).count(), 1);
    }

    #[test]
    fn test_normalised_clips_and_rescales() {
        let t = normalised(-0.1, 0.6, 0.6, 2);
        assert_eq!(t.p_down, 0.0);
        assert_relative_eq!(t.p_mid, 0.5);
        assert_relative_eq!(t.p_up, 0.5);
        assert_eq!(t.kprime, 2);
    }

    #[test]
    fn test_normalised_collapse_falls_back_to_mid() {
        assert_eq!(normalised(-1.0, 0.0, -2.0, 1), Transition::certain(1));
        assert_eq!(normalised(f64::NAN, 0.0, 0.0, 0), Transition::certain(0));
    }
}
