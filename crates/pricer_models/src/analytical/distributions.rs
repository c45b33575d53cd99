//! Standard normal distribution functions.
//!
//! Generic over `T: Float` so the reference formulas work for `f32` and
//! `f64` alike.

use num_traits::Float;

/// Converts an `f64` literal into `T`.
#[inline]
pub(crate) fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Complementary error function.
///
/// Chebyshev fit from Numerical Recipes (`erfcc`), fractional error below
/// 1.2e-7 everywhere.
#[inline]
fn erfc<T: Float>(x: T) -> T {
    let z = x.abs();
    let t = T::one() / (T::one() + lit::<T>(0.5) * z);
    let poly = lit::<T>(-1.265_512_23)
        + t * (lit::<T>(1.000_023_68)
            + t * (lit::<T>(0.374_091_96)
                + t * (lit::<T>(0.096_784_18)
                    + t * (lit::<T>(-0.186_288_06)
                        + t * (lit::<T>(0.278_868_07)
                            + t * (lit::<T>(-1.135_203_98)
                                + t * (lit::<T>(1.488_515_87)
                                    + t * (lit::<T>(-0.822_152_23) + t * lit::<T>(0.170_872_77)))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= T::zero() {
        ans
    } else {
        lit::<T>(2.0) - ans
    }
}

/// Standard normal CDF, Φ(x) = erfc(-x/√2) / 2.
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!((norm_cdf(1.96_f64) - 0.975).abs() < 1e-4);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc(-x / lit::<T>(std::f64::consts::SQRT_2))
}

/// Standard normal PDF, φ(x) = exp(-x²/2) / √(2π).
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let inv_sqrt_2pi = lit::<T>(0.398_942_280_401_432_7);
    inv_sqrt_2pi * (-lit::<T>(0.5) * x * x).exp()
}
