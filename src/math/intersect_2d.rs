use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(p1: &Point2, d1: &Vector2, p2: &Point2, d2: &Vector2) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// A bounded segment-segment crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// The intersection point.
    pub point: Point2,
    /// Parameter along the first segment, clamped to `[0, 1]`.
    pub t: f64,
    /// Parameter along the second segment, clamped to `[0, 1]`.
    pub u: f64,
}

/// Bounded segment-segment intersection in 2D.
///
/// Uses the determinant method. The determinant is compared against
/// `tolerance` scaled by both segment lengths, so near-parallel pairs are
/// rejected independently of drawing scale. Parameters within `tolerance`
/// (relative to the segment length) outside `[0, 1]` are accepted, which
/// keeps endpoint touches as valid junctions.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tolerance: f64,
) -> Option<SegmentHit> {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();
    if len_a < TOLERANCE || len_b < TOLERANCE {
        return None;
    }

    let cross = cross_2d(&da, &db);
    // sin(angle between the segments) = cross / (len_a * len_b)
    if (cross / (len_a * len_b)).abs() < tolerance.max(TOLERANCE) {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Endpoint band, expressed in parameter space.
    let eps_t = tolerance / len_a;
    let eps_u = tolerance / len_b;
    if t >= -eps_t && t <= 1.0 + eps_t && u >= -eps_u && u <= 1.0 + eps_u {
        let t = t.clamp(0.0, 1.0);
        let u = u.clamp(0.0, 1.0);
        Some(SegmentHit {
            point: a0 + da * t,
            t,
            u,
        })
    } else {
        None
    }
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}
