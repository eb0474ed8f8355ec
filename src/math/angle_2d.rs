use std::f64::consts::TAU;

use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Folds an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Direction of `from → to` as `atan2(Δy, Δx)`, normalized to `[0, 2π)`.
#[must_use]
pub fn calculate_angle(from: &Point2, to: &Point2) -> f64 {
    normalize_angle((to.y - from.y).atan2(to.x - from.x))
}

/// Unsigned angle between two vectors in `[0, π]`.
///
/// Returns `0` when either vector has zero length.
#[must_use]
pub fn angle_between_vectors(a: &Vector2, b: &Vector2) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na < TOLERANCE || nb < TOLERANCE {
        return 0.0;
    }
    let cos = (a.dot(b) / (na * nb)).clamp(-1.0, 1.0);
    cos.acos()
}

/// Signed turn from `a` to `b` in `(-π, π]`; positive is counter-clockwise.
///
/// Returns `0` when either vector has zero length.
#[must_use]
pub fn signed_turn(a: &Vector2, b: &Vector2) -> f64 {
    if a.norm() < TOLERANCE || b.norm() < TOLERANCE {
        return 0.0;
    }
    cross_2d(a, b).atan2(a.dot(b))
}

/// Compares two angles modulo `2π` within `tolerance`.
#[must_use]
pub fn angles_equal(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = normalize_angle(a - b);
    diff <= tolerance || TAU - diff <= tolerance
}
