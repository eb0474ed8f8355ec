//! Segment-level primitives that resolve node ids through an explicit lookup.
//!
//! Nothing here holds state. Callers pass whatever maps node ids to
//! positions: the graph itself, its node arena, or a detached snapshot.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::{OperationError, Result};
use crate::graph::{NodeData, NodeId, SegmentData, WallData, WallGraph, WallId};
use crate::math::distance_2d::distance_to_segment;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::are_points_collinear;
use crate::math::Point2;

pub use crate::math::angle_2d::{angle_between_vectors, angles_equal, calculate_angle, normalize_angle};
pub use crate::math::distance_2d::distance_between_points;

/// Resolves node ids to positions.
pub trait NodeLookup {
    /// Position of `id`, or `None` if the node is unknown.
    fn lookup_position(&self, id: NodeId) -> Option<Point2>;
}

impl NodeLookup for WallGraph {
    fn lookup_position(&self, id: NodeId) -> Option<Point2> {
        self.node_position(id).ok()
    }
}

impl NodeLookup for SlotMap<NodeId, NodeData> {
    fn lookup_position(&self, id: NodeId) -> Option<Point2> {
        self.get(id).map(|n| n.position)
    }
}

impl NodeLookup for FxHashMap<NodeId, Point2> {
    fn lookup_position(&self, id: NodeId) -> Option<Point2> {
        self.get(&id).copied()
    }
}

/// Resolves both endpoints of a segment.
pub fn segment_points<L: NodeLookup + ?Sized>(lookup: &L, seg: &SegmentData) -> Option<(Point2, Point2)> {
    Some((lookup.lookup_position(seg.start)?, lookup.lookup_position(seg.end)?))
}

/// Crossing point of two segments.
///
/// Returns `None` for missing nodes, near-parallel segments, or a crossing
/// outside either segment. Endpoint touches within `tolerance` count.
pub fn find_intersection<L: NodeLookup + ?Sized>(
    lookup: &L,
    a: &SegmentData,
    b: &SegmentData,
    tolerance: f64,
) -> Option<Point2> {
    let (a0, a1) = segment_points(lookup, a)?;
    let (b0, b1) = segment_points(lookup, b)?;
    segment_segment_intersect_2d(&a0, &a1, &b0, &b1, tolerance).map(|hit| hit.point)
}

/// `true` if all four endpoints of the two segments lie on one line.
///
/// Every three-point combination must pass the triangle-area test.
pub fn are_segments_collinear<L: NodeLookup + ?Sized>(
    lookup: &L,
    a: &SegmentData,
    b: &SegmentData,
    tolerance: f64,
) -> bool {
    let (Some((p0, p1)), Some((p2, p3))) = (segment_points(lookup, a), segment_points(lookup, b)) else {
        return false;
    };
    let pts = [p0, p1, p2, p3];
    [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)]
        .iter()
        .all(|&(i, j, k)| are_points_collinear(&pts[i], &pts[j], &pts[k], tolerance))
}

/// Distance from `point` to a segment record, `None` for missing nodes.
pub fn distance_to_segment_record<L: NodeLookup + ?Sized>(
    lookup: &L,
    point: &Point2,
    seg: &SegmentData,
) -> Option<f64> {
    let (a, b) = segment_points(lookup, seg)?;
    Some(distance_to_segment(point, &a, &b))
}

/// `true` if `point` lies on the segment within `tolerance`.
pub fn is_point_on_segment<L: NodeLookup + ?Sized>(
    lookup: &L,
    point: &Point2,
    seg: &SegmentData,
    tolerance: f64,
) -> bool {
    distance_to_segment_record(lookup, point, seg).is_some_and(|d| d <= tolerance)
}

/// Shortest distance between two bounded segments.
#[must_use]
pub fn segment_to_segment_distance(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> f64 {
    if segment_segment_intersect_2d(a0, a1, b0, b1, 0.0).is_some() {
        return 0.0;
    }
    distance_to_segment(a0, b0, b1)
        .min(distance_to_segment(a1, b0, b1))
        .min(distance_to_segment(b0, a0, a1))
        .min(distance_to_segment(b1, a0, a1))
}

/// Shortest centerline distance between two walls, `None` if either is
/// unknown or empty.
#[must_use]
pub fn wall_distance(graph: &WallGraph, a: WallId, b: WallId) -> Option<f64> {
    let segs_a = graph.wall(a).ok()?.segments();
    let segs_b = graph.wall(b).ok()?.segments();
    let mut best: Option<f64> = None;
    for sa in segs_a {
        let Ok((a0, a1)) = graph.segment_endpoints(*sa) else {
            continue;
        };
        for sb in segs_b {
            let Ok((b0, b1)) = graph.segment_endpoints(*sb) else {
                continue;
            };
            let d = segment_to_segment_distance(&a0, &a1, &b0, &b1);
            best = Some(best.map_or(d, |x| x.min(d)));
        }
    }
    best
}

/// Candidates whose centerline comes within `threshold` of `wall`.
///
/// The wall itself and unknown ids are skipped. Results are ordered by
/// distance.
#[must_use]
pub fn find_nearby_walls(graph: &WallGraph, wall: WallId, candidates: &[WallId], threshold: f64) -> Vec<WallId> {
    let mut hits: Vec<(WallId, f64)> = candidates
        .iter()
        .filter(|c| **c != wall)
        .filter_map(|c| wall_distance(graph, wall, *c).map(|d| (*c, d)))
        .filter(|(_, d)| *d <= threshold)
        .collect();
    hits.sort_by(|x, y| x.1.total_cmp(&y.1));
    hits.into_iter().map(|(id, _)| id).collect()
}

/// `true` if two walls may be merged: same type, both visible, both non-empty.
#[must_use]
pub fn can_merge_walls(a: &WallData, b: &WallData) -> bool {
    check_merge_compatibility(a, b).is_ok()
}

/// Like [`can_merge_walls`], but says why a merge is refused.
///
/// # Errors
///
/// Returns `OperationError::Incompatible` with a readable reason.
pub fn check_merge_compatibility(a: &WallData, b: &WallData) -> Result<()> {
    if a.wall_type != b.wall_type {
        return Err(OperationError::Incompatible(format!(
            "cannot merge a {} wall with a {} wall",
            a.wall_type, b.wall_type
        ))
        .into());
    }
    if !a.visible || !b.visible {
        return Err(OperationError::Incompatible("cannot merge hidden walls".into()).into());
    }
    if a.is_empty() || b.is_empty() {
        return Err(OperationError::Incompatible("cannot merge a wall without segments".into()).into());
    }
    Ok(())
}
