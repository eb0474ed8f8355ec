use smallvec::SmallVec;

use crate::error::Result;
use crate::graph::{NodeId, SegmentId, WallGraph, WallId};
use crate::math::polygon_2d::{clip_convex_2d, left_normal, signed_area_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::chain::Adjacency;

/// A node where another wall attaches to the wall being built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub node: NodeId,
    pub position: Point2,
    pub neighbour: WallId,
    pub neighbour_thickness: f64,
    /// Area shared by the junction squares of both walls at `node`.
    pub overlap_area: f64,
}

/// Collects contacts at every node of the wall, ordered by node id.
pub(super) fn find_contacts(graph: &WallGraph, wall: WallId, thickness: f64, adj: &Adjacency) -> Result<Vec<WallContact>> {
    let mut nodes: Vec<NodeId> = adj.keys().copied().collect();
    nodes.sort_unstable();

    let mut contacts = Vec::new();
    for node in nodes {
        let position = graph.node_position(node)?;
        let own_arm = adj.get(&node).and_then(|segs| segs.first()).copied();
        let own = junction_square(graph, node, position, own_arm, thickness)?;

        let mut seen: SmallVec<[WallId; 4]> = SmallVec::new();
        for s in graph.connected_segments(node)? {
            let Some(other) = graph.segment(*s)?.wall else {
                continue;
            };
            if other == wall || seen.contains(&other) {
                continue;
            }
            seen.push(other);

            let neighbour_thickness = graph.wall(other)?.thickness;
            let theirs = junction_square(graph, node, position, Some(*s), neighbour_thickness)?;
            let overlap_area = signed_area_2d(&clip_convex_2d(&own, &theirs)).abs();
            contacts.push(WallContact {
                node,
                position,
                neighbour: other,
                neighbour_thickness,
                overlap_area,
            });
        }
    }
    Ok(contacts)
}

/// Square of side `thickness` centred on the node, aligned with `arm`.
fn junction_square(
    graph: &WallGraph,
    node: NodeId,
    centre: Point2,
    arm: Option<SegmentId>,
    thickness: f64,
) -> Result<Vec<Point2>> {
    let mut u = Vector2::new(1.0, 0.0);
    if let Some(arm) = arm {
        let seg = graph.segment(arm)?;
        if let Some(far) = seg.other_node(node) {
            let d = graph.node_position(far)? - centre;
            if d.norm() > TOLERANCE {
                u = d.normalize();
            }
        }
    }
    let h = thickness * 0.5;
    let a = u * h;
    let b = left_normal(&u) * h;
    Ok(vec![centre - a - b, centre + a - b, centre + a + b, centre - a + b])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::graph::WallType;
    use crate::operations::solid::chain::adjacency;

    #[test]
    fn tee_contact_overlap() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(1000.0, 0.0);
        let c = g.create_node(1000.0, 1000.0);
        let d = g.create_node(2000.0, 0.0);
        let s1 = g.create_segment(a, b).unwrap();
        let s2 = g.create_segment(b, d).unwrap();
        let s3 = g.create_segment(b, c).unwrap();
        let main = g.create_wall(WallType::Layout, &[s1, s2]).unwrap();
        let branch = g.create_wall(WallType::Area, &[s3]).unwrap();

        let segs = [s1, s2];
        let adj = adjacency(&g, &segs).unwrap();
        let contacts = find_contacts(&g, main, 350.0, &adj).unwrap();
        assert_eq!(contacts.len(), 1);
        let contact = contacts[0];
        assert_eq!(contact.node, b);
        assert_eq!(contact.neighbour, branch);
        assert_abs_diff_eq!(contact.neighbour_thickness, 150.0);
        // The thinner square sits fully inside the thicker one.
        assert_abs_diff_eq!(contact.overlap_area, 150.0 * 150.0, epsilon = 1e-6);
    }

    #[test]
    fn unowned_neighbours_are_not_contacts() {
        let mut g = WallGraph::new();
        let a = g.create_node(0.0, 0.0);
        let b = g.create_node(10.0, 0.0);
        let c = g.create_node(10.0, 10.0);
        let s1 = g.create_segment(a, b).unwrap();
        g.create_segment(b, c).unwrap();
        let w = g.create_wall(WallType::Zone, &[s1]).unwrap();
        let adj = adjacency(&g, &[s1]).unwrap();
        assert!(find_contacts(&g, w, 250.0, &adj).unwrap().is_empty());
    }
}
