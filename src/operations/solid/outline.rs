//! Closed outlines of a wall's centerline network.
//!
//! Every segment contributes a left and a right side edge at half the wall
//! thickness. Where wall segments meet, arms are sorted by angle and the
//! left side of each arm is intersected with the right side of the next
//! one, giving the corner shared by the two side edges. Free ends get a
//! square cap. The resulting edge soup is walked into closed loops.

use std::f64::consts::{PI, TAU};

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::graph::{NodeId, SegmentId, WallGraph};
use crate::math::angle_2d::normalize_angle;
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{left_normal, rotate_to_canonical_start};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::chain::Adjacency;

/// A directed boundary edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct OutlineEdge {
    pub start: Point2,
    pub end: Point2,
}

/// Side lines of one segment, in the segment's own direction.
#[derive(Debug, Clone, Copy)]
struct Sides {
    dir: Vector2,
    left_start: Point2,
    left_end: Point2,
    right_start: Point2,
    right_end: Point2,
}

impl Sides {
    fn new(a: Point2, b: Point2, half: f64) -> Self {
        let d = b - a;
        let len = d.norm();
        let dir = if len > TOLERANCE { d / len } else { Vector2::new(1.0, 0.0) };
        let shift = left_normal(&dir) * half;
        Self {
            dir,
            left_start: a + shift,
            left_end: b + shift,
            right_start: a - shift,
            right_end: b - shift,
        }
    }

    /// Base point and outgoing direction of one side line seen from a node.
    ///
    /// For an incoming segment the arm runs backwards, so its left side is
    /// the segment's right side and vice versa.
    fn line_at_node(&self, outgoing: bool, left: bool) -> (Point2, Vector2) {
        let dir = if outgoing { self.dir } else { -self.dir };
        let base = match (outgoing, left) {
            (true, true) => self.left_start,
            (true, false) => self.right_start,
            (false, true) => self.right_end,
            (false, false) => self.left_end,
        };
        (base, dir)
    }

    fn set_at_node(&mut self, outgoing: bool, left: bool, p: Point2) {
        match (outgoing, left) {
            (true, true) => self.left_start = p,
            (true, false) => self.right_start = p,
            (false, true) => self.right_end = p,
            (false, false) => self.left_end = p,
        }
    }
}

/// An arm of a junction: a wall segment leaving `node`.
#[derive(Debug, Clone, Copy)]
struct Arm {
    angle: f64,
    index: usize,
    outgoing: bool,
}

/// Builds outline edges for the wall segments.
///
/// Junction corners farther than `miter_limit × half` from their node are
/// replaced by a bevel; the affected nodes are returned alongside the edges.
pub(super) fn build_edges(
    graph: &WallGraph,
    segments: &[SegmentId],
    adj: &Adjacency,
    half: f64,
    miter_limit: f64,
) -> Result<(Vec<OutlineEdge>, Vec<NodeId>)> {
    let mut sides = Vec::with_capacity(segments.len());
    let mut index_of = FxHashMap::default();
    for (i, s) in segments.iter().enumerate() {
        let (a, b) = graph.segment_endpoints(*s)?;
        sides.push(Sides::new(a, b, half));
        index_of.insert(*s, i);
    }
    let original = sides.clone();

    let mut edges = Vec::with_capacity(segments.len() * 2 + 4);
    let mut clipped = Vec::new();
    let mut caps = Vec::new();

    let mut junctions: Vec<(&NodeId, &_)> = adj.iter().collect();
    junctions.sort_by_key(|(n, _)| **n);
    for (node, arms_at) in junctions {
        let pivot = graph.node_position(*node)?;
        let mut arms: Vec<Arm> = Vec::with_capacity(arms_at.len());
        for s in arms_at {
            let Some(&index) = index_of.get(s) else {
                continue;
            };
            let seg = graph.segment(*s)?;
            let outgoing = seg.start == *node;
            let dir = if outgoing { sides[index].dir } else { -sides[index].dir };
            arms.push(Arm {
                angle: dir.y.atan2(dir.x),
                index,
                outgoing,
            });
        }
        if arms.len() == 1 {
            caps.push(arms[0]);
            continue;
        }
        arms.sort_by(|a, b| a.angle.total_cmp(&b.angle));

        let n = arms.len();
        for k in 0..n {
            let arm_i = arms[k];
            let arm_j = arms[(k + 1) % n];
            let (p1, d1) = original[arm_i.index].line_at_node(arm_i.outgoing, true);
            let (p2, d2) = original[arm_j.index].line_at_node(arm_j.outgoing, false);
            let Some((t, _)) = line_line_intersect_2d(&p1, &d1, &p2, &d2) else {
                continue;
            };
            let corner = p1 + d1 * t;
            if (corner - pivot).norm() > miter_limit * half {
                edges.push(OutlineEdge { start: p1, end: p2 });
                clipped.push(*node);
                continue;
            }
            sides[arm_i.index].set_at_node(arm_i.outgoing, true, corner);
            sides[arm_j.index].set_at_node(arm_j.outgoing, false, corner);
        }
    }

    for s in &sides {
        edges.push(OutlineEdge {
            start: s.left_end,
            end: s.left_start,
        });
        edges.push(OutlineEdge {
            start: s.right_start,
            end: s.right_end,
        });
    }
    for arm in caps {
        let s = &sides[arm.index];
        edges.push(if arm.outgoing {
            OutlineEdge {
                start: s.left_start,
                end: s.right_start,
            }
        } else {
            OutlineEdge {
                start: s.right_end,
                end: s.left_end,
            }
        });
    }

    clipped.dedup();
    Ok((edges, clipped))
}

/// Walks edges into closed loops, always taking the smallest CCW turn
/// from the reversed incoming direction. Tracing begins at the lowest unused
/// edge, then each loop is rotated to start at its leftmost (then lowest)
/// vertex.
pub(super) fn trace_loops(edges: &[OutlineEdge], merge_distance: f64) -> Vec<Vec<Point2>> {
    let mut points: Vec<Point2> = Vec::new();
    let mut list: Vec<(usize, usize)> = Vec::new();
    for e in edges {
        let si = ensure_point(&mut points, e.start, merge_distance);
        let ei = ensure_point(&mut points, e.end, merge_distance);
        if si != ei {
            list.push((si, ei));
        }
    }

    let mut outgoing: Vec<Vec<(usize, usize)>> = vec![Vec::new(); points.len()];
    for (idx, &(si, ei)) in list.iter().enumerate() {
        outgoing[si].push((idx, ei));
    }

    let mut used = vec![false; list.len()];
    let mut loops = Vec::new();
    while let Some(start) = lowest_unused(&list, &used, &points) {
        let ring = trace_one(start, &list, &outgoing, &points, &mut used);
        if ring.len() >= 3 {
            loops.push(rotate_to_canonical_start(&ring));
        }
    }
    loops
}

fn lowest_unused(list: &[(usize, usize)], used: &[bool], points: &[Point2]) -> Option<usize> {
    let mut best: Option<(usize, Point2)> = None;
    for (idx, &(si, _)) in list.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let p = points[si];
        let better = best.map_or(true, |(_, b)| p.y < b.y - TOLERANCE || ((p.y - b.y).abs() < TOLERANCE && p.x < b.x));
        if better {
            best = Some((idx, p));
        }
    }
    best.map(|(idx, _)| idx)
}

fn trace_one(
    start: usize,
    list: &[(usize, usize)],
    outgoing: &[Vec<(usize, usize)>],
    points: &[Point2],
    used: &mut [bool],
) -> Vec<Point2> {
    let origin = list[start].0;
    let mut ring = Vec::new();
    let mut current = start;

    while !used[current] {
        used[current] = true;
        let (si, ei) = list[current];
        ring.push(points[si]);
        if ei == origin {
            break;
        }
        let heading = points[ei] - points[si];
        let back = normalize_angle(heading.y.atan2(heading.x) + PI);

        let mut best: Option<(usize, f64)> = None;
        for &(next, target) in &outgoing[ei] {
            if used[next] {
                continue;
            }
            let d = points[target] - points[ei];
            let mut delta = normalize_angle(d.y.atan2(d.x) - back);
            if delta < TOLERANCE {
                delta = TAU;
            }
            if best.map_or(true, |(_, bd)| delta < bd) {
                best = Some((next, delta));
            }
        }
        let Some((next, _)) = best else {
            break;
        };
        current = next;
    }
    ring
}

fn ensure_point(points: &mut Vec<Point2>, p: Point2, merge_distance: f64) -> usize {
    if let Some(i) = points.iter().position(|q| (q - p).norm() <= merge_distance) {
        return i;
    }
    points.push(p);
    points.len() - 1
}
