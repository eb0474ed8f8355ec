//! One-sided offset of a polyline.
//!
//! 1. Each piece is shifted along its left normal by the signed distance.
//! 2. Consecutive shifted pieces are joined. The inner side of a turn uses
//!    the line intersection; the outer side applies the requested join.
//!    Near-reversals get a flat cap instead of a diverging miter.
//! 3. Loops created where shifted pieces cross each other are cut out.
//!
//! A polyline whose last point returns to its first is treated as closed:
//! the closing vertex gets a join too, and the offset is closed again.

use std::f64::consts::FRAC_PI_4;

use crate::error::{OperationError, Result};
use crate::math::angle_2d::signed_turn;
use crate::math::arc_2d::{arc_point_at, arc_subdivision_count};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at, segment_segment_intersect_2d};
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::operations::tolerance::{ToleranceContext, ToleranceKind, ToleranceManager};

use super::{Approximation, JoinRecord, JoinType};

/// When `cos(turn) < this`, the corner is capped flat (turn > ~169°).
const FLAT_CAP_COS: f64 = -0.98;

/// Adaptive joins switch from bevel to round above this turn (135°).
const ROUND_TURN: f64 = 3.0 * FRAC_PI_4;

/// Turns below this are treated as straight continuations.
const STRAIGHT_TURN: f64 = 1e-9;

#[derive(Debug)]
pub(super) struct RawOffset {
    pub points: Vec<Point2>,
    pub joins: Vec<JoinRecord>,
    pub approximations: Vec<Approximation>,
}

/// A shifted piece and the direction of the original one.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: Point2,
    end: Point2,
    dir: Vector2,
}

/// Offsets `points` by `distance` (positive = left of the walking direction).
///
/// Join records of a closed chain use vertex `0` for the closing vertex.
///
/// # Errors
///
/// - `OperationError::InvalidInput` for fewer than two points
/// - `GeometryError::Degenerate` for a zero-length piece
/// - `OperationError::Failed` if the offset collapses
pub(super) fn offset_chain(
    points: &[Point2],
    distance: f64,
    join: JoinType,
    tolerances: &mut ToleranceManager,
) -> Result<RawOffset> {
    if points.len() < 2 {
        return Err(OperationError::InvalidInput("at least 2 points are required for polyline offset".to_owned()).into());
    }

    let mut pieces = Vec::with_capacity(points.len() - 1);
    for w in points.windows(2) {
        let dir = segment_direction(&w[0], &w[1])?;
        let shift = left_normal(&dir) * distance;
        pieces.push(Piece {
            start: w[0] + shift,
            end: w[1] + shift,
            dir,
        });
    }

    let mut raw = Vec::with_capacity(points.len() * 2);
    let mut joins = Vec::with_capacity(points.len().saturating_sub(2));
    let mut approximations = Vec::new();
    let last = pieces.len() - 1;
    let closed = pieces.len() >= 3 && (points[0] - points[points.len() - 1]).norm() <= TOLERANCE;

    let mut closing = Vec::new();
    if closed {
        let (resolved, approx) = push_corner(&mut closing, &pieces[last], &pieces[0], &points[0], 0, distance, join, tolerances);
        joins.push(JoinRecord { vertex: 0, join: resolved });
        approximations.extend(approx);
    }
    raw.push(closing.last().copied().unwrap_or(pieces[0].start));

    for i in 1..pieces.len() {
        let (resolved, approx) = push_corner(&mut raw, &pieces[i - 1], &pieces[i], &points[i], i, distance, join, tolerances);
        joins.push(JoinRecord { vertex: i, join: resolved });
        approximations.extend(approx);
    }
    if closing.is_empty() {
        raw.push(pieces[last].end);
    } else {
        raw.extend_from_slice(&closing);
    }

    let tol = tolerances.base();
    let (trimmed, loops) = trim_loops(&raw, tol);
    if loops > 0 {
        approximations.push(Approximation::LoopTrimmed { loops });
    }
    if trimmed.len() < 2 {
        return Err(OperationError::Failed("offset collapsed to fewer than 2 points".to_owned()).into());
    }

    Ok(RawOffset {
        points: trimmed,
        joins,
        approximations,
    })
}

/// Appends the corner between two shifted pieces and returns the join
/// actually used.
#[allow(clippy::too_many_arguments)]
fn push_corner(
    raw: &mut Vec<Point2>,
    prev: &Piece,
    next: &Piece,
    vertex: &Point2,
    index: usize,
    distance: f64,
    join: JoinType,
    tolerances: &mut ToleranceManager,
) -> (JoinType, Option<Approximation>) {
    if prev.dir.dot(&next.dir) < FLAT_CAP_COS {
        raw.push(prev.end);
        raw.push(next.start);
        return (JoinType::Bevel, Some(Approximation::FlatCap { vertex: index }));
    }

    let turn = signed_turn(&prev.dir, &next.dir);
    if turn.abs() < STRAIGHT_TURN {
        raw.push(prev.end);
        return (JoinType::Miter, None);
    }

    let miter = intersect_offset_lines(prev, next).unwrap_or(prev.end);
    // A left offset lies outside a right turn and vice versa.
    let outer = turn * distance < 0.0;
    if !outer {
        raw.push(miter);
        return (JoinType::Miter, None);
    }

    let resolved = match join {
        JoinType::Adaptive => adaptive_join(turn.abs(), tolerances),
        other => other,
    };
    match resolved {
        JoinType::Bevel => {
            raw.push(prev.end);
            raw.push(next.start);
            (JoinType::Bevel, None)
        }
        JoinType::Round => {
            let radius = distance.abs();
            let ctx = ToleranceContext::new(ToleranceKind::Offset, 2.0 * radius, 1.0).with_join_angle(turn.abs());
            let tol = tolerances.calculate_tolerance(&ctx);
            let n = arc_subdivision_count(radius, turn.abs(), tol);
            let start = prev.end - *vertex;
            let start_angle = start.y.atan2(start.x);
            for k in 0..=n {
                raw.push(arc_point_at(vertex, radius, start_angle, turn, f64::from(k) / f64::from(n)));
            }
            (JoinType::Round, None)
        }
        JoinType::Miter | JoinType::Adaptive => {
            let limit = tolerances.miter_limit() * distance.abs();
            if (miter - *vertex).norm() > limit {
                raw.push(prev.end);
                raw.push(next.start);
                (JoinType::Bevel, Some(Approximation::MiterClipped { vertex: index }))
            } else {
                raw.push(miter);
                (JoinType::Miter, None)
            }
        }
    }
}

/// Miter below the miter-limit angle, bevel for sharper turns, round for
/// the sharpest ones.
fn adaptive_join(turn: f64, tolerances: &ToleranceManager) -> JoinType {
    if turn <= tolerances.miter_threshold() {
        JoinType::Miter
    } else if turn < ROUND_TURN {
        JoinType::Bevel
    } else {
        JoinType::Round
    }
}

fn intersect_offset_lines(prev: &Piece, next: &Piece) -> Option<Point2> {
    let d_prev = prev.end - prev.start;
    let d_next = next.end - next.start;
    line_line_intersect_2d(&prev.end, &d_prev, &next.start, &d_next).map(|(t, _)| point_at(&prev.end, &d_prev, t))
}

/// Cuts every loop out of a chain. Returns the chain and the number of
/// loops removed.
fn trim_loops(points: &[Point2], tolerance: f64) -> (Vec<Point2>, usize) {
    let mut pts = dedup(points);
    let mut loops = 0;
    while let Some((i, j, hit)) = first_crossing(&pts, tolerance) {
        let mut next = Vec::with_capacity(pts.len());
        next.extend_from_slice(&pts[..=i]);
        next.push(hit);
        next.extend_from_slice(&pts[j + 1..]);
        pts = dedup(&next);
        loops += 1;
    }
    (pts, loops)
}

/// First crossing between non-adjacent pieces of a chain.
///
/// Endpoint-to-endpoint touches are not crossings.
fn first_crossing(points: &[Point2], tolerance: f64) -> Option<(usize, usize, Point2)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    let eps = 1e-9;
    for i in 0..n - 1 {
        for j in (i + 2)..n - 1 {
            let Some(hit) = segment_segment_intersect_2d(&points[i], &points[i + 1], &points[j], &points[j + 1], tolerance) else {
                continue;
            };
            let t_at_end = hit.t < eps || hit.t > 1.0 - eps;
            let u_at_end = hit.u < eps || hit.u > 1.0 - eps;
            if t_at_end && u_at_end {
                continue;
            }
            return Some((i, j, hit.point));
        }
    }
    None
}

fn dedup(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |q| (p - q).norm() > TOLERANCE * 100.0) {
            out.push(*p);
        }
    }
    out
}
