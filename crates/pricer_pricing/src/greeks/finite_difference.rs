//! Central finite-difference operators.
//!
//! The closure forms evaluate `f` themselves; the `*_difference` forms take
//! already-computed scenario prices so one set of revaluations can feed
//! several Greeks.

use num_traits::Float;
use tracing::warn;

/// `(f(x+h) - f(x-h)) / 2h`.
///
/// # Examples
/// ```
/// use pricer_pricing::greeks::first_derivative;
///
/// let d = first_derivative(|x: f64| x * x * x, 2.0, 1e-4);
/// assert!((d - 12.0).abs() < 1e-6);
/// ```
pub fn first_derivative<T, F>(f: F, x: T, h: T) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    central_difference(f(x + h), f(x - h), h)
}

/// `(f(x+h) - 2f(x) + f(x-h)) / h²`.
pub fn second_derivative<T, F>(f: F, x: T, h: T) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    second_difference(f(x + h), f(x), f(x - h), h)
}

/// Mixed partial `∂²f/∂x∂y` from the four corner points.
pub fn cross_derivative<T, F>(f: F, x: T, y: T, hx: T, hy: T) -> T
where
    T: Float,
    F: Fn(T, T) -> T,
{
    cross_difference(
        f(x + hx, y + hy),
        f(x + hx, y - hy),
        f(x - hx, y + hy),
        f(x - hx, y - hy),
        hx,
        hy,
    )
}

/// Central first difference from up and down values.
#[inline]
pub fn central_difference<T: Float>(up: T, down: T, h: T) -> T {
    (up - down) / (h + h)
}

/// Central second difference from up, mid and down values.
#[inline]
pub fn second_difference<T: Float>(up: T, mid: T, down: T, h: T) -> T {
    (up - (mid + mid) + down) / (h * h)
}

/// Four-point mixed difference; arguments are `f(+,+)`, `f(+,-)`,
/// `f(-,+)`, `f(-,-)`.
#[inline]
pub fn cross_difference<T: Float>(pp: T, pm: T, mp: T, mm: T, hx: T, hy: T) -> T {
    let four = T::one() + T::one() + T::one() + T::one();
    (pp - pm - mp + mm) / (four * hx * hy)
}

/// Replaces a non-finite sensitivity by zero.
///
/// This is the only place Greeks are sanitised; each replacement is logged
/// at `warn` with the Greek's name.
pub fn finite_or_zero<T: Float>(greek: &str, value: T) -> T {
    if value.is_finite() {
        value
    } else {
        warn!(greek, "non-finite sensitivity replaced by zero");
        T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_derivative_exp() {
        let d = first_derivative(f64::exp, 1.0, 1e-5);
        assert_relative_eq!(d, 1.0_f64.exp(), max_relative = 1e-9);
    }

    #[test]
    fn test_second_derivative_sin() {
        let d = second_derivative(f64::sin, 0.5, 1e-4);
        assert_relative_eq!(d, -(0.5_f64.sin()), epsilon = 1e-6);
    }

    #[test]
    fn test_cross_derivative_product() {
        // ∂²(x² y³)/∂x∂y = 6 x y²
        let d = cross_derivative(|x: f64, y: f64| x * x * y * y * y, 1.5, 2.0, 1e-3, 1e-3);
        assert_relative_eq!(d, 6.0 * 1.5 * 4.0, max_relative = 1e-5);
    }

    #[test]
    fn test_differences_are_exact_on_quadratics() {
        let f = |x: f64| 3.0 * x * x - 2.0 * x + 1.0;
        let h = 0.1;
        assert_relative_eq!(central_difference(f(2.0 + h), f(2.0 - h), h), 10.0, epsilon = 1e-12);
        assert_relative_eq!(
            second_difference(f(2.0 + h), f(2.0), f(2.0 - h), h),
            6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_generic_over_f32() {
        let d = first_derivative(|x: f32| x * x, 3.0_f32, 1e-2);
        assert_relative_eq!(d, 6.0_f32, epsilon = 1e-3);
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero("delta", 0.5), 0.5);
        assert_eq!(finite_or_zero("gamma", f64::NAN), 0.0);
        assert_eq!(finite_or_zero("vomma", f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero("vanna", f64::NEG_INFINITY), 0.0);
    }
}
