//! Removal of redundant degree-2 nodes.
//!
//! A node is redundant when exactly two segments meet there and both lie on
//! one straight line, running in opposite directions from the node. The two
//! segments are replaced by one spanning the outer nodes.

use crate::error::{GraphError, Result};
use crate::geometry::primitives::are_segments_collinear;
use crate::graph::{NodeId, SegmentId, WallGraph, WallId};

/// Result of a cleanup attempt on one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub merged: bool,
    /// The segment that replaced the two merged ones.
    pub new_segment: Option<SegmentId>,
}

impl CleanupOutcome {
    fn unchanged() -> Self {
        Self::default()
    }

    fn merged(segment: SegmentId) -> Self {
        Self {
            merged: true,
            new_segment: Some(segment),
        }
    }
}

/// Summary of a full-graph cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub nodes_examined: usize,
    /// Removed node and the segment that replaced its two segments.
    pub merges: Vec<(NodeId, SegmentId)>,
}

impl CleanupReport {
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.merges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }
}

/// Wall of the merged segment: shared wall if both agree, the only wall if
/// one is unowned, none if they disagree.
fn merged_wall(a: Option<WallId>, b: Option<WallId>) -> Option<WallId> {
    match (a, b) {
        (Some(x), Some(y)) if x == y => Some(x),
        (Some(_), Some(_)) | (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x),
    }
}

/// Merges away `node` if it is a collinear degree-2 node.
///
/// Nodes with another degree, a corner, or a hairpin are left untouched.
///
/// # Errors
///
/// Returns `GraphError::NodeNotFound` if the node is unknown.
pub fn perform_node_cleanup(graph: &mut WallGraph, node: NodeId) -> Result<CleanupOutcome> {
    let tol = graph.tolerance();
    let data = graph.node(node)?;
    let &[first_id, second_id] = data.segments() else {
        return Ok(CleanupOutcome::unchanged());
    };
    let pivot = data.position;

    let first = graph.segment(first_id)?.clone();
    let second = graph.segment(second_id)?.clone();
    let dangling = || GraphError::InvalidReference(format!("node {node:?} lists a segment that does not touch it"));
    let outer_a = first.other_node(node).ok_or_else(dangling)?;
    let outer_b = second.other_node(node).ok_or_else(dangling)?;
    if outer_a == outer_b || !are_segments_collinear(graph, &first, &second, tol) {
        return Ok(CleanupOutcome::unchanged());
    }

    let pa = graph.node_position(outer_a)?;
    let pb = graph.node_position(outer_b)?;
    // Collinear segments folding back over each other are not a straight run.
    if (pa - pivot).dot(&(pb - pivot)) >= 0.0 {
        return Ok(CleanupOutcome::unchanged());
    }

    let wall = merged_wall(first.wall, second.wall);
    let (start, end) = if first.end == node { (outer_a, outer_b) } else { (outer_b, outer_a) };

    graph.detach_segment(first_id)?;
    graph.detach_segment(second_id)?;
    graph.remove_node(node);
    let merged = graph.insert_segment(start, end, wall)?;

    tracing::debug!(
        ?node,
        removed = ?[first_id, second_id],
        ?merged,
        ?wall,
        "collinear node merged"
    );
    Ok(CleanupOutcome::merged(merged))
}

/// Runs [`perform_node_cleanup`] on every node once.
///
/// One pass reaches a fixed point: merging never changes the degree or the
/// direction of segments at the outer nodes, so a second call finds nothing.
///
/// # Errors
///
/// Only fails on a dangling reference inside the graph.
pub fn analyze_and_cleanup_nodes(graph: &mut WallGraph) -> Result<CleanupReport> {
    let ids: Vec<NodeId> = graph.nodes().map(|(id, _)| id).collect();
    let mut report = CleanupReport::default();
    for id in ids {
        if !graph.contains_node(id) {
            continue;
        }
        report.nodes_examined += 1;
        if let Some(seg) = perform_node_cleanup(graph, id)?.new_segment {
            report.merges.push((id, seg));
        }
    }
    tracing::debug!(
        examined = report.nodes_examined,
        merged = report.merged_count(),
        "node cleanup pass finished"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::graph::WallType;
    use crate::math::Point2;

    /// `(0,0) - (5,0) - (10,0)` with a stub `(5,0) - (5,5)` making the middle
    /// node degree 3.
    fn collinear_with_stub(g: &mut WallGraph) -> (NodeId, SegmentId, SegmentId, SegmentId) {
        let a = g.create_node(0.0, 0.0);
        let m = g.create_node(5.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let up = g.create_node(5.0, 5.0);
        let s1 = g.create_segment(a, m).unwrap();
        let s2 = g.create_segment(m, b).unwrap();
        let stub = g.create_segment(m, up).unwrap();
        (m, s1, s2, stub)
    }

    #[test]
    fn degree_two_collinear_merge_keeps_wall() {
        let mut g = WallGraph::new();
        let (m, s1, s2, stub) = collinear_with_stub(&mut g);
        let wall = g.create_wall(WallType::Layout, &[s1, s2]).unwrap();

        // T-junction: untouched.
        assert_eq!(g.perform_node_cleanup(m).unwrap(), CleanupOutcome::unchanged());

        // Removing the stub leaves m at degree 2 and triggers the merge.
        let outcomes = g.delete_segment(stub).unwrap();
        assert_eq!(outcomes.len(), 1);
        let merged = outcomes[0].new_segment.unwrap();
        assert!(outcomes[0].merged);

        assert!(!g.contains_node(m));
        assert!(!g.contains_segment(s1) && !g.contains_segment(s2));
        let seg = g.segment(merged).unwrap();
        assert_abs_diff_eq!(seg.length, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(seg.angle, 0.0, epsilon = 1e-12);
        assert_eq!(seg.wall, Some(wall));
        assert_eq!(g.wall(wall).unwrap().segments(), &[merged]);
        g.check_integrity().unwrap();
    }

    #[test]
    fn corner_and_dead_end_are_kept() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let c = g.create_node(10.0, 10.0);
        g.create_segment(a, b).unwrap();
        g.create_segment(b, c).unwrap();
        assert!(!g.perform_node_cleanup(b).unwrap().merged);
        assert!(!g.perform_node_cleanup(a).unwrap().merged);
        assert_eq!(g.segment_count(), 2);
    }

    #[test]
    fn hairpin_is_kept() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let m = g.create_node(10.0, 0.0);
        let b = g.create_node(5.0, 0.0);
        g.create_segment(a, m).unwrap();
        g.create_segment(m, b).unwrap();
        assert!(!g.perform_node_cleanup(m).unwrap().merged);
        assert!(g.contains_node(m));
    }

    #[test]
    fn different_walls_leave_merge_unowned() {
        let mut g = WallGraph::new();
        let (m, s1, s2, stub) = collinear_with_stub(&mut g);
        let w1 = g.create_wall(WallType::Layout, &[s1]).unwrap();
        let w2 = g.create_wall(WallType::Zone, &[s2]).unwrap();
        let outcomes = g.delete_segment(stub).unwrap();
        let merged = outcomes[0].new_segment.unwrap();
        assert!(!g.contains_node(m));
        assert_eq!(g.segment(merged).unwrap().wall, None);
        assert!(g.wall(w1).unwrap().is_empty());
        assert!(g.wall(w2).unwrap().is_empty());
        g.check_integrity().unwrap();
    }

    #[test]
    fn single_owner_is_inherited() {
        let mut g = WallGraph::new();
        let (_, s1, _, stub) = collinear_with_stub(&mut g);
        let w = g.create_wall(WallType::Area, &[s1]).unwrap();
        let outcomes = g.delete_segment(stub).unwrap();
        let merged = outcomes[0].new_segment.unwrap();
        assert_eq!(g.segment(merged).unwrap().wall, Some(w));
        assert_abs_diff_eq!(g.wall(w).unwrap().thickness, 150.0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let mut g = WallGraph::new();
        let (m, _, _, stub) = collinear_with_stub(&mut g);
        g.delete_segment(stub).unwrap();
        assert!(g.perform_node_cleanup(m).unwrap_err().is_not_found());
    }

    #[test]
    fn cleanup_round_trip_matches_direct_segment() {
        let mut merged = WallGraph::new();
        let (_, _, _, stub) = collinear_with_stub(&mut merged);
        merged.delete_segment(stub).unwrap();

        let mut direct = WallGraph::new();
        let a = direct.create_node(0.0, 0.0);
        let b = direct.create_node(10.0, 0.0);
        direct.create_segment(a, b).unwrap();

        let stats_merged = merged.get_statistics();
        let stats_direct = direct.get_statistics();
        assert_eq!(stats_merged.node_count, stats_direct.node_count);
        assert_eq!(stats_merged.segment_count, stats_direct.segment_count);
        let (_, m) = merged.segments().next().unwrap();
        let (_, d) = direct.segments().next().unwrap();
        assert_abs_diff_eq!(m.length, d.length, epsilon = 1e-9);
        assert_abs_diff_eq!(m.angle, d.angle, epsilon = 1e-12);
        let ends = merged.segment_endpoints(merged.segments().next().unwrap().0).unwrap();
        assert_abs_diff_eq!(ends.0.x, 0.0);
        assert_abs_diff_eq!(ends.1.x, 10.0);
    }

    #[test]
    fn batch_cleanup_is_idempotent_and_conserves_length() {
        let mut g = WallGraph::new();
        // A straight run of five pieces plus one corner.
        let ids: Vec<NodeId> = (0..=5).map(|i| g.create_node(f64::from(i) * 2.0, 0.0)).collect();
        let mut segs: Vec<SegmentId> = ids.windows(2).map(|w| g.create_segment(w[0], w[1]).unwrap()).collect();
        let corner = g.create_node(10.0, 7.0);
        segs.push(g.create_segment(ids[5], corner).unwrap());
        let wall = g.create_wall(WallType::Zone, &segs).unwrap();
        let before = g.get_wall_properties(wall).unwrap().total_length;

        let first = g.analyze_and_cleanup_nodes().unwrap();
        assert_eq!(first.merged_count(), 4);
        assert_eq!(g.segment_count(), 2);
        assert_eq!(g.node_count(), 3);
        let after = g.get_wall_properties(wall).unwrap().total_length;
        assert_abs_diff_eq!(before, after, epsilon = 1e-9);
        g.check_integrity().unwrap();

        let second = g.analyze_and_cleanup_nodes().unwrap();
        assert!(second.is_empty());
        assert_eq!(second.nodes_examined, 3);
        assert_eq!(g.segment_count(), 2);
    }

    #[test]
    fn nearly_collinear_within_tolerance_merges() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let m = g.create_node(5000.0, 1e-7);
        let b = g.create_node(10000.0, 0.0);
        g.create_segment(a, m).unwrap();
        g.create_segment(m, b).unwrap();
        let out = g.perform_node_cleanup(m).unwrap();
        assert!(out.merged);
        let pos = g.node_position(b).unwrap();
        assert_eq!(pos, Point2::new(10000.0, 0.0));
    }
}
