//! 2D circular-arc math.
//!
//! Arcs are described by `center`, `radius`, `start_angle` and a signed
//! `sweep` (positive = counter-clockwise).

use std::f64::consts::PI;

use super::Point2;

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Computes the unit tangent direction on an arc at parameter `t` in `[0, 1]`.
///
/// The tangent points in the direction of increasing `t`.
#[must_use]
pub fn arc_tangent_at(start_angle: f64, sweep: f64, t: f64) -> (f64, f64) {
    let angle = start_angle + sweep * t;
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
    (-sign * angle.sin(), sign * angle.cos())
}

/// Checks if an angle falls within an arc's angular range.
#[must_use]
pub fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    let eps = 1e-10;
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += 2.0 * PI;
        }
        while delta > 2.0 * PI + eps {
            delta -= 2.0 * PI;
        }
        delta >= -eps && delta <= sweep + eps
    } else {
        while delta > eps {
            delta -= 2.0 * PI;
        }
        while delta < -2.0 * PI - eps {
            delta += 2.0 * PI;
        }
        delta <= eps && delta >= sweep - eps
    }
}

/// Number of chords needed to approximate an arc within `tolerance`
/// (sagitta bound: `s = r * (1 - cos(θ/2))`).
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil().min(4096.0) as u32;
    n.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn quarter_arc_points() {
        let c = Point2::origin();
        let p0 = arc_point_at(&c, 1.0, 0.0, PI / 2.0, 0.0);
        let pm = arc_point_at(&c, 1.0, 0.0, PI / 2.0, 0.5);
        let p1 = arc_point_at(&c, 1.0, 0.0, PI / 2.0, 1.0);
        assert!((p0.x - 1.0).abs() < TOL && p0.y.abs() < TOL);
        let e = (PI / 4.0).cos();
        assert!((pm.x - e).abs() < TOL && (pm.y - e).abs() < TOL);
        assert!(p1.x.abs() < TOL && (p1.y - 1.0).abs() < TOL);
    }

    #[test]
    fn tangent_is_unit_and_follows_sweep() {
        let (tx, ty) = arc_tangent_at(0.0, PI, 0.0);
        assert!(tx.abs() < TOL);
        assert!((ty - 1.0).abs() < TOL);
        let (tx, ty) = arc_tangent_at(0.0, -PI, 0.0);
        assert!(tx.abs() < TOL);
        assert!((ty + 1.0).abs() < TOL);
    }

    #[test]
    fn angle_range_ccw_and_cw() {
        assert!(angle_in_arc_range(PI / 2.0, 0.0, PI));
        assert!(!angle_in_arc_range(-PI / 2.0, 0.0, PI));
        assert!(angle_in_arc_range(-PI / 2.0, 0.0, -PI));
    }

    #[test]
    fn subdivision_count_scales_with_tolerance() {
        assert_eq!(arc_subdivision_count(1.0, PI, 10.0), 1);
        assert!(arc_subdivision_count(1.0, PI, 0.001) > 10);
    }
}
