use crate::math::angle_2d::calculate_angle;
use crate::math::distance_2d::distance_between_points;
use crate::math::Point2;

use super::node::NodeId;
use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for a segment in the wall graph.
    pub struct SegmentId;
}

/// A straight centerline edge between two nodes.
///
/// `length` and `angle` are cached from the endpoint positions and
/// refreshed by the graph whenever an endpoint moves.
#[derive(Debug, Clone)]
pub struct SegmentData {
    /// Start node.
    pub start: NodeId,
    /// End node.
    pub end: NodeId,
    /// Cached `distance(start, end)`.
    pub length: f64,
    /// Cached direction `atan2(Δy, Δx)` in `[0, 2π)`.
    pub angle: f64,
    /// Owning wall, if any.
    pub wall: Option<WallId>,
}

impl SegmentData {
    pub(crate) fn new(start: NodeId, end: NodeId, a: &Point2, b: &Point2, wall: Option<WallId>) -> Self {
        Self {
            start,
            end,
            length: distance_between_points(a, b),
            angle: calculate_angle(a, b),
            wall,
        }
    }

    pub(crate) fn refresh(&mut self, a: &Point2, b: &Point2) {
        self.length = distance_between_points(a, b);
        self.angle = calculate_angle(a, b);
    }

    /// Returns `true` if `node` is one of the two endpoints.
    #[must_use]
    pub fn has_node(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// Returns the endpoint opposite `node`, or `None` if `node` is not an endpoint.
    #[must_use]
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if self.start == node {
            Some(self.end)
        } else if self.end == node {
            Some(self.start)
        } else {
            None
        }
    }

    /// Returns `true` if the two segments share at least one endpoint.
    #[must_use]
    pub fn shares_node_with(&self, other: &Self) -> bool {
        self.has_node(other.start) || self.has_node(other.end)
    }
}
