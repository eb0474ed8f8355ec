//! Wall solids: the 2D body of a wall derived from its centerline.
//!
//! A [`WallSolid`] is a snapshot. It is rebuilt from the graph whenever it
//! is needed and never patched in place.

mod chain;
mod contact;
mod outline;

pub use contact::WallContact;

use crate::error::{GeometryError, Result};
use crate::geometry::{Curve, Polyline};
use crate::graph::{SegmentId, WallGraph, WallId, WallType};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

use super::offset::{Approximation, OffsetCurve, OffsetEngine};
use super::validate::{self, QualityMetrics};

/// Baseline and side curves of one chain of a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSolid {
    pub segments: Vec<SegmentId>,
    pub closed: bool,
    pub baseline: Curve,
    pub left: OffsetCurve,
    pub right: OffsetCurve,
}

/// Derived body of one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSolid {
    pub wall: WallId,
    pub wall_type: WallType,
    pub thickness: f64,
    pub chains: Vec<ChainSolid>,
    /// Closed boundary loops; outer loops wind counter-clockwise, holes
    /// clockwise.
    pub outlines: Vec<Vec<Point2>>,
    pub contacts: Vec<WallContact>,
    /// Everything simplified while building, chain offsets included.
    pub approximations: Vec<Approximation>,
    pub quality: QualityMetrics,
}

impl WallSolid {
    /// `true` if neither offsets nor outline corners were approximated.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.approximations.is_empty()
    }

    /// Net outline area, holes subtracted.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outlines.iter().map(|o| signed_area_2d(o)).sum::<f64>().abs()
    }
}

/// Builds the [`WallSolid`] of a wall.
#[derive(Debug, Clone, Copy)]
pub struct ComputeWallSolid {
    wall: WallId,
}

impl ComputeWallSolid {
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Builds the solid with an offset engine configured from the graph.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](Self::execute_with).
    pub fn execute(&self, graph: &WallGraph) -> Result<WallSolid> {
        let mut engine = OffsetEngine::from_config(graph.config());
        self.execute_with(graph, &mut engine)
    }

    /// Builds the solid, reusing `engine` and its tolerance cache.
    ///
    /// # Errors
    ///
    /// - `GraphError::WallNotFound` if the wall is unknown
    /// - `GeometryError::Degenerate` if the wall has no segments
    /// - any offset error of the wall's chains
    pub fn execute_with(&self, graph: &WallGraph, engine: &mut OffsetEngine) -> Result<WallSolid> {
        let wall = graph.wall(self.wall)?;
        let segments = wall.segments();
        if segments.is_empty() {
            return Err(GeometryError::Degenerate(format!("wall {:?} has no segments", self.wall)).into());
        }
        let half = wall.thickness * 0.5;
        let join = graph.config().join;

        let adj = chain::adjacency(graph, segments)?;
        let mut approximations = Vec::new();
        let mut chains = Vec::new();
        for c in chain::build_chains(graph, segments, &adj)? {
            let points = c
                .nodes
                .iter()
                .map(|n| graph.node_position(*n))
                .collect::<Result<Vec<_>>>()?;
            let baseline = Curve::Polyline(Polyline::new(points)?);
            let pair = engine.offset(&baseline, half, join)?;
            approximations.extend(pair.left.approximations.iter().cloned());
            approximations.extend(pair.right.approximations.iter().cloned());
            chains.push(ChainSolid {
                segments: c.segments,
                closed: c.closed,
                baseline,
                left: pair.left,
                right: pair.right,
            });
        }

        let (edges, clipped) = outline::build_edges(graph, segments, &adj, half, engine.tolerances().miter_limit())?;
        approximations.extend(clipped.into_iter().map(|node| Approximation::JunctionClipped { node }));
        let outlines = outline::trace_loops(&edges, graph.tolerance());
        let contacts = contact::find_contacts(graph, self.wall, wall.thickness, &adj)?;
        let quality = validate::measure(&outlines, wall.thickness, graph.tolerance());

        tracing::debug!(
            wall = ?self.wall,
            chains = chains.len(),
            outlines = outlines.len(),
            contacts = contacts.len(),
            "computed wall solid"
        );

        Ok(WallSolid {
            wall: self.wall,
            wall_type: wall.wall_type,
            thickness: wall.thickness,
            chains,
            outlines,
            contacts,
            approximations,
            quality,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::graph::NodeId;
    use crate::operations::validate::{Defect, GeometryValidator};

    fn room(g: &mut WallGraph, size: f64) -> (Vec<NodeId>, Vec<SegmentId>) {
        let nodes: Vec<NodeId> = [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]
            .iter()
            .map(|&(x, y)| g.create_node(x, y))
            .collect();
        let segs = (0..4)
            .map(|i| g.create_segment(nodes[i], nodes[(i + 1) % 4]).unwrap())
            .collect();
        (nodes, segs)
    }

    #[test]
    fn straight_wall_solid() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(1000.0, 0.0);
        let s = g.create_segment(a, b).unwrap();
        let w = g.create_wall(WallType::Layout, &[s]).unwrap();

        let solid = ComputeWallSolid::new(w).execute(&g).unwrap();
        assert_eq!(solid.chains.len(), 1);
        assert!(!solid.chains[0].closed);
        assert_eq!(solid.outlines.len(), 1);
        assert!(solid.is_exact());
        assert!(solid.contacts.is_empty());
        assert_abs_diff_eq!(solid.area(), 350_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solid.quality.area, 350_000.0, epsilon = 1e-6);

        let left = &solid.chains[0].left.curve;
        assert_abs_diff_eq!(left.start().y, 175.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solid.chains[0].right.curve.end().y, -175.0, epsilon = 1e-9);
    }

    #[test]
    fn closed_room_has_a_hole() {
        let mut g = WallGraph::new();
        let (_, segs) = room(&mut g, 5000.0);
        let w = g.create_wall(WallType::Zone, &segs).unwrap();

        let solid = ComputeWallSolid::new(w).execute(&g).unwrap();
        assert_eq!(solid.chains.len(), 1);
        assert!(solid.chains[0].closed);
        assert_eq!(solid.outlines.len(), 2);
        // Outer 5250² minus inner 4750².
        assert_abs_diff_eq!(solid.area(), 5250.0 * 5250.0 - 4750.0 * 4750.0, epsilon = 1e-3);

        let report = GeometryValidator::default().validate(&solid);
        assert!(report.is_valid());
        assert_abs_diff_eq!(report.score, 1.0);
    }

    #[test]
    fn tee_junction_reports_contact() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(4000.0, 0.0);
        let c = g.create_node(2000.0, 0.0);
        let d = g.create_node(2000.0, 3000.0);
        let main = g.create_segment(a, b).unwrap();
        let branch = g.create_segment(c, d).unwrap();
        g.process_intersections(branch).unwrap();

        let main_segs: Vec<SegmentId> = g.connected_segments(c).unwrap().iter().copied().filter(|s| *s != branch).collect();
        assert_eq!(main_segs.len(), 2);
        assert!(!g.contains_segment(main));
        let w_main = g.create_wall(WallType::Layout, &main_segs).unwrap();
        let w_branch = g.create_wall(WallType::Area, &[branch]).unwrap();

        let solid = ComputeWallSolid::new(w_main).execute(&g).unwrap();
        // The two pieces through the junction form one straight chain.
        assert_eq!(solid.chains.len(), 1);
        assert_eq!(solid.outlines.len(), 1);
        assert_eq!(solid.contacts.len(), 1);
        assert_eq!(solid.contacts[0].neighbour, w_branch);
        assert_abs_diff_eq!(solid.area(), 4000.0 * 350.0, epsilon = 1e-3);

        let other = ComputeWallSolid::new(w_branch).execute(&g).unwrap();
        assert_eq!(other.contacts.len(), 1);
        assert_eq!(other.contacts[0].neighbour, w_main);
        assert_abs_diff_eq!(other.contacts[0].overlap_area, solid.contacts[0].overlap_area, epsilon = 1e-6);
    }

    #[test]
    fn sharp_corner_is_reported() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(3000.0, 0.0);
        let c = g.create_node(0.0, 200.0);
        let s1 = g.create_segment(a, b).unwrap();
        let s2 = g.create_segment(b, c).unwrap();
        let w = g.create_wall(WallType::Layout, &[s1, s2]).unwrap();

        let solid = ComputeWallSolid::new(w).execute(&g).unwrap();
        assert!(!solid.is_exact());
        assert!(solid
            .approximations
            .iter()
            .any(|x| matches!(x, Approximation::JunctionClipped { node } if *node == b)));
        let report = GeometryValidator::default().validate(&solid);
        assert!(report.score < 1.0);
        assert!(report.defects.iter().any(|d| matches!(d, Defect::Approximated(_))));
    }

    #[test]
    fn empty_wall_is_degenerate() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let s = g.create_segment(a, b).unwrap();
        let w = g.create_wall(WallType::Area, &[s]).unwrap();
        g.delete_segment(s).unwrap();

        let err = ComputeWallSolid::new(w).execute(&g).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn unknown_wall_is_not_found() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let s = g.create_segment(a, b).unwrap();
        let w = g.create_wall(WallType::Area, &[s]).unwrap();
        g.delete_wall(w, false).unwrap();
        assert!(ComputeWallSolid::new(w).execute(&g).unwrap_err().is_not_found());
    }
}
