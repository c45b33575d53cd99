//! Leading-order discretisation error of the trinomial lattice.

use std::f64::consts::PI;

/// Theoretical error bound of an `n`-step lattice price for an at-the-money
/// option:
///
/// ```text
/// 3 S0 / (8 √(2π)) · (exp(σ² T/n) − 1) exp(2 r T/n) / √(exp(σ² T) − 1)
/// ```
///
/// Decays like `1/n`.
///
/// # Examples
/// ```
/// use pricer_pricing::analysis::tree_error;
///
/// let coarse = tree_error(100.0, 0.2, 0.05, 1.0, 100);
/// let fine = tree_error(100.0, 0.2, 0.05, 1.0, 1000);
/// assert!(fine < coarse / 9.0);
/// ```
pub fn tree_error(spot: f64, volatility: f64, rate: f64, maturity: f64, steps: usize) -> f64 {
    let dt = maturity / steps as f64;
    let prefactor = 3.0 * spot / (8.0 * (2.0 * PI).sqrt());
    let numerator = ((volatility * volatility * dt).exp() - 1.0) * (2.0 * rate * dt).exp();
    let denominator = ((volatility * volatility * maturity).exp() - 1.0).sqrt();
    prefactor * numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_value() {
        // 3*100/(8*sqrt(2π)) * (e^{0.0004}-1) e^{0.001} / sqrt(e^{0.04}-1)
        let expected = 300.0 / (8.0 * (2.0 * PI).sqrt()) * (0.0004_f64.exp() - 1.0)
            * 0.001_f64.exp()
            / (0.04_f64.exp() - 1.0).sqrt();
        assert_relative_eq!(tree_error(100.0, 0.2, 0.05, 1.0, 100), expected, max_relative = 1e-14);
        assert!(expected > 0.0 && expected < 0.1);
    }

    #[test]
    fn test_scales_like_one_over_n() {
        let e100 = tree_error(100.0, 0.2, 0.0, 1.0, 100);
        let e200 = tree_error(100.0, 0.2, 0.0, 1.0, 200);
        assert_relative_eq!(e100 / e200, 2.0, max_relative = 1e-3);
    }

    #[test]
    fn test_linear_in_spot() {
        assert_relative_eq!(
            tree_error(200.0, 0.3, 0.02, 2.0, 50),
            2.0 * tree_error(100.0, 0.3, 0.02, 2.0, 50),
            max_relative = 1e-14
        );
    }
}
