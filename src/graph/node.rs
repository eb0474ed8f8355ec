use smallvec::SmallVec;

use crate::math::Point2;

use super::segment::SegmentId;

slotmap::new_key_type! {
    /// Unique identifier for a node in the wall graph.
    pub struct NodeId;
}

/// Role of a node in the planar graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A free end or corner created by the user.
    Endpoint,
    /// A junction created by subdividing a segment.
    Intersection,
}

/// Data associated with a graph node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Position in drawing units.
    pub position: Point2,
    /// Whether the node was drawn or produced by subdivision.
    pub kind: NodeKind,
    pub(crate) segments: SmallVec<[SegmentId; 4]>,
}

impl NodeData {
    /// Creates an unconnected node at `position`.
    #[must_use]
    pub fn new(position: Point2, kind: NodeKind) -> Self {
        Self {
            position,
            kind,
            segments: SmallVec::new(),
        }
    }

    /// Segments that have this node as an endpoint.
    #[must_use]
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    /// Number of connected segments.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn attach(&mut self, segment: SegmentId) {
        if !self.segments.contains(&segment) {
            self.segments.push(segment);
        }
    }

    pub(crate) fn detach(&mut self, segment: SegmentId) {
        self.segments.retain(|s| *s != segment);
    }
}
