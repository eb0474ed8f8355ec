use super::arc_2d::angle_in_arc_range;
use super::{Point2, TOLERANCE};

/// Euclidean distance between two points.
#[must_use]
pub fn distance_between_points(a: &Point2, b: &Point2) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Returns the parameter of the projection of `p` onto segment `a → b`,
/// clamped to `[0, 1]`. Zero-length segments project to `0`.
#[must_use]
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    t.clamp(0.0, 1.0)
}

/// Returns the closest point to `p` on segment `a → b`.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let t = project_onto_segment(p, a, b);
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Returns the minimum distance from `p` to the segment `a → b`.
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearer endpoint.
#[must_use]
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let closest = closest_point_on_segment(p, a, b);
    distance_between_points(p, &closest)
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to the center) falls within the arc range,
/// the distance is `||p - center| - radius|`; otherwise the nearer arc
/// endpoint decides.
#[must_use]
pub fn distance_to_arc(p: &Point2, center: &Point2, radius: f64, start_angle: f64, sweep: f64) -> f64 {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let dist_to_center = (dx * dx + dy * dy).sqrt();

    let angle = dy.atan2(dx);
    if angle_in_arc_range(angle, start_angle, sweep) {
        return (dist_to_center - radius).abs();
    }

    let end_angle = start_angle + sweep;
    let e0 = Point2::new(
        center.x + radius * start_angle.cos(),
        center.y + radius * start_angle.sin(),
    );
    let e1 = Point2::new(
        center.x + radius * end_angle.cos(),
        center.y + radius * end_angle.sin(),
    );
    distance_between_points(p, &e0).min(distance_between_points(p, &e1))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn point_distance_pythagorean() {
        let d = distance_between_points(&Point2::new(0.0, 0.0), &Point2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)→(2,0). Closest at (1,0), dist = 1.
        let d = distance_to_segment(
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_clamps_to_endpoint() {
        // Point (-1, 0) to segment (0,0)→(2,0). Closest at (0,0), dist = 1.
        let d = distance_to_segment(
            &Point2::new(-1.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");

        let d = distance_to_segment(
            &Point2::new(5.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        let d = distance_to_segment(
            &Point2::new(3.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn projection_parameter() {
        let t = project_onto_segment(
            &Point2::new(2.5, 7.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert!((t - 0.25).abs() < TOL, "t={t}");
    }

    #[test]
    fn arc_dist_in_range() {
        // Point at (0, 2), CCW semicircle centered at origin, radius 1.
        let d = distance_to_arc(&Point2::new(0.0, 2.0), &Point2::origin(), 1.0, 0.0, PI);
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_outside_range() {
        // Angle -π/2 is outside [0, π]; both endpoints are √5 away.
        let d = distance_to_arc(&Point2::new(0.0, -2.0), &Point2::origin(), 1.0, 0.0, PI);
        assert!((d - 5.0_f64.sqrt()).abs() < 1e-9, "d={d}");
    }
}
