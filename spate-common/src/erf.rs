//! Inverse error function
//!
//! `erfinv` feeds millisecond-rounded arrival offsets over runs that may
//! last hours, so the rational approximation from `statrs` is tightened
//! with one Newton step against `erf` to keep the error below 1e-9 across
//! the whole open interval.

use statrs::function::erf;

/// Inverse error function for `x` in the open interval `(-1, 1)`.
///
/// Refines `statrs`' rational approximation with a single Newton
/// iteration: `y' = y - (erf(y) - x) / erf'(y)` where
/// `erf'(y) = 2/sqrt(pi) * exp(-y^2)`.
pub fn erfinv(x: f64) -> f64 {
    debug_assert!(x > -1.0 && x < 1.0, "erfinv domain is (-1, 1), got {x}");

    let y = erf::erf_inv(x);
    if !y.is_finite() {
        return y;
    }
    let half_sqrt_pi = 0.5 * std::f64::consts::PI.sqrt();
    y - (erf::erf(y) - x) * half_sqrt_pi * (y * y).exp()
}
