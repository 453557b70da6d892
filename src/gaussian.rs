//! Standard normal CDF and upper tail
//!
//! Both go through `libm::erfc` so neither tail loses precision to
//! cancellation; `Phi(-9)` stays meaningful.

use std::f64::consts::FRAC_1_SQRT_2;

/// Standard normal CDF `Phi(z) = P(Z <= z)`
///
/// Computed as `0.5 * erfc(-z / sqrt(2))`, equal to `0.5 * (1 + erf(z / sqrt(2)))`
/// but without losing the lower tail.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * libm::erfc(-z * FRAC_1_SQRT_2)
}

/// Standard normal upper tail `1 - Phi(z) = P(Z > z)`
pub fn normal_sf(z: f64) -> f64 {
    0.5 * libm::erfc(z * FRAC_1_SQRT_2)
}
