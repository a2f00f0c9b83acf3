//! Angle helpers.

use std::f64::consts::{PI, TAU};

/// Wrap an angle (or a difference of two angles) into `(-π, π]`.
///
/// The result is the shortest signed rotation equivalent to `a`, so easing
/// by it never goes the long way around. Non-finite input maps to `0.0`.
pub fn normalize_angle(a: f64) -> f64 {
    if !a.is_finite() {
        return 0.0;
    }

    // rem_euclid never returns a negative remainder.
    let wrapped = (a + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
