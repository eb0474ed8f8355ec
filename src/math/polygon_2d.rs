use super::intersect_2d::segment_segment_intersect_2d;
use super::{cross_2d, Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Perimeter of a closed polygon.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Unsigned area of the triangle `a, b, c` (half the cross product).
#[must_use]
pub fn triangle_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross_2d(&(b - a), &(c - a)).abs() * 0.5
}

/// Triangle-area collinearity test.
///
/// The area is compared against `tolerance` times the longest side, i.e.
/// the height of the triangle must stay within about `2 * tolerance`. This
/// keeps the test meaningful at any drawing scale.
#[must_use]
pub fn are_points_collinear(a: &Point2, b: &Point2, c: &Point2, tolerance: f64) -> bool {
    let longest = (b - a).norm().max((c - b).norm()).max((a - c).norm());
    triangle_area(a, b, c) <= tolerance * longest.max(1.0)
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Clips `subject` against a convex `clip` polygon (Sutherland–Hodgman).
///
/// `clip` may wind either way. Returns an empty vector when the polygons
/// do not overlap.
#[must_use]
pub fn clip_convex_2d(subject: &[Point2], clip: &[Point2]) -> Vec<Point2> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }
    let orientation = signed_area_2d(clip).signum();
    let mut output = subject.to_vec();

    let n = clip.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let c0 = clip[i];
        let c1 = clip[(i + 1) % n];
        let edge = c1 - c0;
        let inside = |p: &Point2| cross_2d(&edge, &(p - c0)) * orientation >= -TOLERANCE;

        let input = std::mem::take(&mut output);
        let m = input.len();
        for k in 0..m {
            let cur = input[k];
            let prev = input[(k + m - 1) % m];
            let cur_in = inside(&cur);
            let prev_in = inside(&prev);
            if cur_in {
                if !prev_in {
                    if let Some(p) = edge_crossing(&prev, &cur, &c0, &c1) {
                        output.push(p);
                    }
                }
                output.push(cur);
            } else if prev_in {
                if let Some(p) = edge_crossing(&prev, &cur, &c0, &c1) {
                    output.push(p);
                }
            }
        }
    }
    output
}

/// Intersection of segment `p0 → p1` with the infinite line through `c0, c1`.
fn edge_crossing(p0: &Point2, p1: &Point2, c0: &Point2, c1: &Point2) -> Option<Point2> {
    let d = p1 - p0;
    let e = c1 - c0;
    let denom = cross_2d(&d, &e);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let t = cross_2d(&(c0 - p0), &e) / denom;
    Some(p0 + d * t)
}

/// Finds pairs of non-adjacent edges of a closed polygon that cross.
///
/// Endpoint-to-endpoint touches are skipped; only genuine crossings
/// (at least one parameter in the interior) are reported as `(i, j, point)`.
#[must_use]
pub fn polygon_self_intersections(points: &[Point2], tolerance: f64) -> Vec<(usize, usize, Point2)> {
    let n = points.len();
    let mut hits = Vec::new();
    if n < 4 {
        return hits;
    }
    let eps = 1e-9;
    for i in 0..n {
        let i_next = (i + 1) % n;
        for j in (i + 2)..n {
            if are_adjacent(i, j, n) {
                continue;
            }
            let j_next = (j + 1) % n;
            if let Some(hit) = segment_segment_intersect_2d(
                &points[i],
                &points[i_next],
                &points[j],
                &points[j_next],
                tolerance,
            ) {
                let t_at_end = hit.t < eps || hit.t > 1.0 - eps;
                let u_at_end = hit.u < eps || hit.u > 1.0 - eps;
                if t_at_end && u_at_end {
                    continue;
                }
                hits.push((i, j, hit.point));
            }
        }
    }
    hits
}

/// Checks whether edges `i` and `j` are adjacent in a closed polygon of `n` edges.
fn are_adjacent(i: usize, j: usize, n: usize) -> bool {
    let diff = i.abs_diff(j);
    diff == 1 || diff == n - 1
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}
