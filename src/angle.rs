//! Angle utilities shared by deskew and line binning.
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Normalizes an angle into the range [0, π).
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let mut norm = angle.rem_euclid(PI);
    if norm >= PI {
        norm -= PI;
    }
    if norm >= PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Computes the smallest unsigned angular difference between two angles,
/// treating antipodal directions as equivalent (i.e. π apart → 0).
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let mut diff = (a - b).abs();
    if diff > PI {
        diff = diff.rem_euclid(PI);
    }
    if diff > FRAC_PI_2 {
        PI - diff
    } else {
        diff
    }
}

/// Signed deviation of a line-normal angle from the nearest multiple of 90°,
/// in (−π/4, π/4].
///
/// A grid rotated by `α` produces vertical lines with normal `α` and
/// horizontal lines with normal `π/2 + α`; both fold to `α`.
#[inline]
pub fn axis_deviation(theta: f32) -> f32 {
    let quarter = (theta / FRAC_PI_2).round();
    let mut dev = theta - quarter * FRAC_PI_2;
    if dev <= -FRAC_PI_4 {
        dev += FRAC_PI_2;
    } else if dev > FRAC_PI_4 {
        dev -= FRAC_PI_2;
    }
    dev
}
