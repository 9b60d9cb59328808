//! Scalar interpolation helpers:
//! - lerp_f64 (exact at both ends)
//! - blend factor for a query position between two keyframe positions
//! - cosine and power easing of a blend factor

use std::f64::consts::PI;

/// Linear interpolation of scalars.
///
/// Written as a weighted sum so that `t == 0` yields `a` and `t == 1` yields `b`
/// bit for bit.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Relative position of `position` in `[left, right]`.
/// Unbounded outside the interval; zero when the interval is empty.
#[inline]
pub fn blend_factor(position: f64, left: f64, right: f64) -> f64 {
    let span = right - left;
    if span == 0.0 {
        return 0.0;
    }
    (position - left) / span
}

/// Half-period cosine ease: flat at 0 and 1, steepest at 0.5.
#[inline]
pub fn cosine_ease(t: f64) -> f64 {
    (1.0 - (t * PI).cos()) * 0.5
}

/// `t^exponent`, mirrored for negative `t` so extrapolation stays finite.
#[inline]
pub fn pow_ease(t: f64, exponent: f64) -> f64 {
    if t < 0.0 {
        -(-t).powf(exponent)
    } else {
        t.powf(exponent)
    }
}
