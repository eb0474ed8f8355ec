use crate::error::Result;
use crate::graph::{NodeId, NodeKind, SegmentId, WallGraph};
use crate::math::distance_2d::distance_between_points;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{Aabb2, Point2};

/// A segment that was split, and the pieces that replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentModification {
    pub original: SegmentId,
    /// Pieces in order from the original start to the original end.
    pub replacements: Vec<SegmentId>,
}

/// One crossing of the processed segment with another segment.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Parameter along the processed segment.
    t: f64,
    point: Point2,
    other: SegmentId,
}

/// Node a junction passes through: an existing one, or the `i`-th node
/// still to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Existing(NodeId),
    New(usize),
}

/// A planned junction and the splits it causes.
#[derive(Debug, Clone, Copy)]
struct Junction {
    anchor: Anchor,
    other: SegmentId,
    split_other: bool,
    split_self: bool,
}

/// Splits every segment crossed by a newly created or moved segment.
///
/// Segments sharing a node with it are connected, not crossing, and are
/// skipped. Parallel and collinear overlaps are not crossings either.
/// Crossings are applied in order of distance from the segment's start so
/// that each split lands on the current tail piece. A crossing within
/// tolerance of an existing node reuses that node.
#[derive(Debug)]
pub struct ProcessIntersections {
    segment: SegmentId,
}

impl ProcessIntersections {
    #[must_use]
    pub fn new(segment: SegmentId) -> Self {
        Self { segment }
    }

    /// Runs the operation.
    ///
    /// Returns one modification per split segment; the processed segment
    /// comes last if it was split. Every junction is planned before the
    /// graph is touched, so a failure leaves the graph unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` if the segment is unknown.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<SegmentModification>> {
        let crossings = self.find_crossings(graph)?;
        if crossings.is_empty() {
            return Ok(Vec::new());
        }
        let (fresh, junctions) = self.plan(graph, &crossings)?;

        let created: Vec<NodeId> = fresh
            .iter()
            .map(|p| graph.insert_node(*p, NodeKind::Intersection))
            .collect();
        let mut modifications = Vec::new();
        let mut pieces = Vec::new();
        let mut tail = self.segment;

        for junction in &junctions {
            let node = match junction.anchor {
                Anchor::Existing(n) => n,
                Anchor::New(i) => created[i],
            };
            if junction.split_other {
                let (a, b) = graph.split_segment_at_node(junction.other, node)?;
                modifications.push(SegmentModification {
                    original: junction.other,
                    replacements: vec![a, b],
                });
            }
            if junction.split_self {
                let (first, second) = graph.split_segment_at_node(tail, node)?;
                pieces.push(first);
                tail = second;
            }
        }
        for n in created {
            graph.remove_if_orphan(n);
        }

        if !pieces.is_empty() {
            pieces.push(tail);
            modifications.push(SegmentModification {
                original: self.segment,
                replacements: pieces,
            });
        }
        tracing::debug!(
            segment = ?self.segment,
            crossings = crossings.len(),
            splits = modifications.len(),
            "intersections processed"
        );
        Ok(modifications)
    }

    /// Resolves each crossing to a node and decides which segments it
    /// splits, without mutating the graph.
    ///
    /// A segment is only split where the junction lies farther than the
    /// tolerance from both of its current ends, so no split can produce a
    /// zero-length piece. Junctions within tolerance of an endpoint reuse
    /// that endpoint.
    fn plan(&self, graph: &WallGraph, crossings: &[Crossing]) -> Result<(Vec<Point2>, Vec<Junction>)> {
        let tol = graph.tolerance();
        let seg = graph.segment(self.segment)?;
        let (s_start, s_end) = graph.segment_endpoints(self.segment)?;
        let apart = |a: &Point2, b: &Point2| distance_between_points(a, b) > tol;

        let mut fresh: Vec<Point2> = Vec::new();
        let mut junctions = Vec::with_capacity(crossings.len());
        let mut last_cut: Option<Point2> = None;

        for crossing in crossings {
            let other = graph.segment(crossing.other)?;
            let (o_start, o_end) = graph.segment_endpoints(crossing.other)?;
            let near = |p: &Point2| !apart(p, &crossing.point);

            let (anchor, at) = if near(&o_start) {
                (Anchor::Existing(other.start), o_start)
            } else if near(&o_end) {
                (Anchor::Existing(other.end), o_end)
            } else if near(&s_start) {
                (Anchor::Existing(seg.start), s_start)
            } else if near(&s_end) {
                (Anchor::Existing(seg.end), s_end)
            } else if let Some(i) = fresh.iter().position(|p| near(p)) {
                (Anchor::New(i), fresh[i])
            } else if let Some(n) = graph.find_node_at(crossing.point.x, crossing.point.y, tol) {
                (Anchor::Existing(n), graph.node_position(n)?)
            } else {
                fresh.push(crossing.point);
                (Anchor::New(fresh.len() - 1), crossing.point)
            };

            let split_other = apart(&at, &o_start) && apart(&at, &o_end);
            let split_self =
                apart(&at, &s_start) && apart(&at, &s_end) && last_cut.map_or(true, |p| apart(&at, &p));
            if split_self {
                last_cut = Some(at);
            }
            junctions.push(Junction {
                anchor,
                other: crossing.other,
                split_other,
                split_self,
            });
        }
        Ok((fresh, junctions))
    }

    /// All crossings, sorted by distance from the segment's start.
    fn find_crossings(&self, graph: &WallGraph) -> Result<Vec<Crossing>> {
        let tol = graph.tolerance();
        let seg = graph.segment(self.segment)?;
        let (s0, s1) = graph.segment_endpoints(self.segment)?;
        let reach = Aabb2::from_corners(s0, s1).expanded(tol);

        let mut crossings = Vec::new();
        for (id, other) in graph.segments() {
            if id == self.segment || seg.shares_node_with(other) {
                continue;
            }
            let (t0, t1) = graph.segment_endpoints(id)?;
            if !reach.intersects(&Aabb2::from_corners(t0, t1)) {
                continue;
            }
            if let Some(hit) = segment_segment_intersect_2d(&s0, &s1, &t0, &t1, tol) {
                crossings.push(Crossing {
                    t: hit.t,
                    point: hit.point,
                    other: id,
                });
            }
        }
        crossings.sort_by(|a, b| a.t.total_cmp(&b.t));
        Ok(crossings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::graph::WallType;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn line(g: &mut WallGraph, x0: f64, y0: f64, x1: f64, y1: f64) -> SegmentId {
        let a = g.create_node(x0, y0);
        let b = g.create_node(x1, y1);
        g.create_segment(a, b).unwrap()
    }

    #[test]
    fn four_way_junction() {
        init_tracing();
        let mut g = WallGraph::new();
        let h = line(&mut g, 0.0, 5.0, 10.0, 5.0);
        let v = line(&mut g, 5.0, 0.0, 5.0, 10.0);

        let mods = g.process_intersections(v).unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].original, h);
        assert_eq!(mods[1].original, v);
        assert!(!g.contains_segment(h));
        assert!(!g.contains_segment(v));

        let center = g.find_node_at(5.0, 5.0, 1e-6).unwrap();
        let node = g.node(center).unwrap();
        assert_eq!(node.degree(), 4);
        assert_eq!(node.kind, NodeKind::Intersection);
        assert_eq!(g.segment_count(), 4);
        for (_, seg) in g.segments() {
            assert_abs_diff_eq!(seg.length, 5.0, epsilon = 1e-9);
        }
        g.check_integrity().unwrap();
    }

    #[test]
    fn crossings_are_applied_in_order() {
        let mut g = WallGraph::new();
        let verticals: Vec<SegmentId> = [8.0, 2.0, 5.0]
            .iter()
            .map(|x| line(&mut g, *x, -1.0, *x, 1.0))
            .collect();
        let s = line(&mut g, 0.0, 0.0, 10.0, 0.0);

        let mods = g.process_intersections(s).unwrap();
        assert_eq!(mods.len(), 4);
        let last = mods.last().unwrap();
        assert_eq!(last.original, s);
        assert_eq!(last.replacements.len(), 4);

        let xs: Vec<f64> = last
            .replacements
            .iter()
            .map(|id| g.segment_endpoints(*id).unwrap().1.x)
            .collect();
        assert_eq!(xs, vec![2.0, 5.0, 8.0, 10.0]);
        for v in verticals {
            assert!(!g.contains_segment(v));
        }
        g.check_integrity().unwrap();
    }

    #[test]
    fn t_junction_reuses_endpoint() {
        let mut g = WallGraph::new();
        let h = line(&mut g, 0.0, 0.0, 10.0, 0.0);
        let stem = line(&mut g, 4.0, 0.0, 4.0, 6.0);
        let nodes_before = g.node_count();

        let mods = g.process_intersections(stem).unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].original, h);
        assert_eq!(g.node_count(), nodes_before);
        assert!(g.contains_segment(stem));

        let junction = g.segment(stem).unwrap().start;
        assert_eq!(g.node(junction).unwrap().degree(), 3);
        g.check_integrity().unwrap();
    }

    #[test]
    fn existing_node_is_reused() {
        let mut g = WallGraph::new();
        let a = line(&mut g, 0.0, 5.0, 10.0, 5.0);
        let b = line(&mut g, 5.0, 0.0, 5.0, 10.0);
        g.process_intersections(b).unwrap();
        let c = line(&mut g, 0.0, 0.0, 10.0, 10.0);
        let nodes_before = g.node_count();

        g.process_intersections(c).unwrap();
        // The diagonal passes through the existing (5, 5) junction.
        assert_eq!(g.node_count(), nodes_before);
        let center = g.find_node_at(5.0, 5.0, 1e-6).unwrap();
        assert_eq!(g.node(center).unwrap().degree(), 6);
        assert!(!g.contains_segment(a));
        g.check_integrity().unwrap();
    }

    #[test]
    fn connected_and_parallel_segments_are_ignored() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let c = g.create_node(10.0, 10.0);
        let s1 = g.create_segment(a, b).unwrap();
        let s2 = g.create_segment(b, c).unwrap();
        line(&mut g, 0.0, 1.0, 8.0, 1.0);

        assert!(g.process_intersections(s1).unwrap().is_empty());
        assert!(g.process_intersections(s2).unwrap().is_empty());
        assert_eq!(g.segment_count(), 3);
    }

    #[test]
    fn split_segments_keep_their_walls() {
        let mut g = WallGraph::new();
        let h = line(&mut g, 0.0, 5.0, 10.0, 5.0);
        let v = line(&mut g, 5.0, 0.0, 5.0, 10.0);
        let wh = g.create_wall(WallType::Layout, &[h]).unwrap();
        let wv = g.create_wall(WallType::Area, &[v]).unwrap();

        g.process_intersections(v).unwrap();
        assert_eq!(g.wall(wh).unwrap().segments().len(), 2);
        assert_eq!(g.wall(wv).unwrap().segments().len(), 2);
        g.check_integrity().unwrap();
    }

    #[test]
    fn near_coincident_endpoint_is_a_junction() {
        let mut g = WallGraph::new();
        let mid = line(&mut g, 5.0, -5.0, 5.0, 5.0);
        let spur = line(&mut g, 10.0, 5e-7, 10.0, 5.0);
        let s = line(&mut g, 0.0, 0.0, 10.0, 0.0);
        let spur_start = g.segment(spur).unwrap().start;
        let s_end = g.segment(s).unwrap().end;

        let mods = g.process_intersections(s).unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].original, mid);
        assert_eq!(mods[1].original, s);
        assert_eq!(mods[1].replacements.len(), 2);
        assert!(g.contains_segment(spur));
        assert!(g.contains_node(spur_start));
        assert!(g.contains_node(s_end));
        assert_eq!(g.segment_count(), 5);
        g.check_integrity().unwrap();
    }

    #[test]
    fn unknown_segment_is_an_error() {
        let mut g = WallGraph::new();
        let s = line(&mut g, 0.0, 0.0, 1.0, 0.0);
        g.delete_segment(s).unwrap();
        assert!(g.process_intersections(s).unwrap_err().is_not_found());
    }
}
