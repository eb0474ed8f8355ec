pub mod node;
pub mod query;
pub mod segment;
pub mod wall;

pub use node::{NodeData, NodeId, NodeKind};
pub use query::{GraphStatistics, WallHit, WallProperties};
pub use segment::{SegmentData, SegmentId};
pub use wall::{WallData, WallId, WallType};

use slotmap::SlotMap;

use crate::config::KernelConfig;
use crate::error::{GeometryError, GraphError, OperationError, Result};
use crate::math::distance_2d::{distance_between_points, distance_to_segment};
use crate::math::Point2;
use crate::operations::cleanup::{self, CleanupOutcome};
use crate::operations::solid::{ComputeWallSolid, WallSolid};
use crate::operations::validate::{GeometryValidator, ValidationReport};

/// Central arena that owns every node, segment and wall of a floor plan.
///
/// Entities reference each other via typed IDs (generational indices), so
/// deleting an entity simply makes its stale IDs fail lookup. Every public
/// mutation either fully succeeds or leaves the graph untouched.
#[derive(Debug, Default)]
pub struct WallGraph {
    nodes: SlotMap<NodeId, NodeData>,
    segments: SlotMap<SegmentId, SegmentData>,
    walls: SlotMap<WallId, WallData>,
    config: KernelConfig,
}

impl WallGraph {
    /// Creates an empty graph with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with an explicit configuration.
    #[must_use]
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration this graph was built with.
    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Shorthand for `self.config().tolerance`.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    // --- Lookups ---

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the id is unknown.
    pub fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id).into())
    }

    /// Returns a reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` if the id is unknown.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentData> {
        self.segments
            .get(id)
            .ok_or_else(|| GraphError::SegmentNotFound(id).into())
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the id is unknown.
    pub fn wall(&self, id: WallId) -> Result<&WallData> {
        self.walls
            .get(id)
            .ok_or_else(|| GraphError::WallNotFound(id).into())
    }

    fn wall_mut(&mut self, id: WallId) -> Result<&mut WallData> {
        self.walls
            .get_mut(id)
            .ok_or_else(|| GraphError::WallNotFound(id).into())
    }

    /// Position of a node.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the id is unknown.
    pub fn node_position(&self, id: NodeId) -> Result<Point2> {
        Ok(self.node(id)?.position)
    }

    /// Start and end positions of a segment.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` for an unknown segment, or
    /// `GraphError::InvalidReference` if an endpoint no longer resolves.
    pub fn segment_endpoints(&self, id: SegmentId) -> Result<(Point2, Point2)> {
        let seg = self.segment(id)?;
        Ok((self.resolve_node(seg.start)?, self.resolve_node(seg.end)?))
    }

    /// Node lookup for ids taken from the graph's own collections.
    fn resolve_node(&self, id: NodeId) -> Result<Point2> {
        self.nodes.get(id).map(|n| n.position).ok_or_else(|| {
            GraphError::InvalidReference(format!("dangling node id {id:?}")).into()
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &SegmentData)> {
        self.segments.iter()
    }

    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> {
        self.walls.iter()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn contains_segment(&self, id: SegmentId) -> bool {
        self.segments.contains_key(id)
    }

    #[must_use]
    pub fn contains_wall(&self, id: WallId) -> bool {
        self.walls.contains_key(id)
    }

    /// Segments connected to `node`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the id is unknown.
    pub fn connected_segments(&self, node: NodeId) -> Result<&[SegmentId]> {
        Ok(self.node(node)?.segments())
    }

    /// Number of segments meeting at `node`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the id is unknown.
    pub fn node_degree(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.segments().len())
    }

    // --- Nodes ---

    /// Creates an unconnected endpoint node. Always succeeds.
    pub fn create_node(&mut self, x: f64, y: f64) -> NodeId {
        self.insert_node(Point2::new(x, y), NodeKind::Endpoint)
    }

    pub(crate) fn insert_node(&mut self, position: Point2, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(NodeData::new(position, kind));
        tracing::trace!(?id, x = position.x, y = position.y, ?kind, "node created");
        id
    }

    /// Moves a node and refreshes the cached length/angle of every
    /// connected segment.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` for an unknown node, or
    /// `GeometryError::Degenerate` if the move would collapse a connected
    /// segment to zero length. The graph is unchanged on error.
    pub fn update_node(&mut self, id: NodeId, position: Point2) -> Result<()> {
        let tol = self.config.tolerance;
        let connected: Vec<SegmentId> = self.node(id)?.segments.to_vec();

        let mut refreshed = Vec::with_capacity(connected.len());
        for seg_id in &connected {
            let seg = self.segment(*seg_id)?;
            let other = seg.other_node(id).ok_or_else(|| {
                GraphError::InvalidReference(format!("node {id:?} lists foreign segment {seg_id:?}"))
            })?;
            let other_pos = self.resolve_node(other)?;
            if distance_between_points(&position, &other_pos) <= tol {
                return Err(GeometryError::Degenerate(format!(
                    "moving node {id:?} would collapse segment {seg_id:?}"
                ))
                .into());
            }
            refreshed.push((*seg_id, other_pos, seg.start == id));
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.position = position;
        }
        for (seg_id, other_pos, is_start) in refreshed {
            let Some(seg) = self.segments.get_mut(seg_id) else {
                continue;
            };
            if is_start {
                seg.refresh(&position, &other_pos);
            } else {
                seg.refresh(&other_pos, &position);
            }
            if let Some(wall) = seg.wall.and_then(|w| self.walls.get_mut(w)) {
                wall.touch();
            }
        }
        tracing::debug!(?id, x = position.x, y = position.y, "node moved");
        Ok(())
    }

    /// Removes `id` if it has no connected segments. Returns `true` if removed.
    pub(crate) fn remove_if_orphan(&mut self, id: NodeId) -> bool {
        let orphan = self.nodes.get(id).is_some_and(|n| n.segments.is_empty());
        if orphan {
            self.nodes.remove(id);
            tracing::trace!(?id, "orphan node removed");
        }
        orphan
    }

    /// Removes a node unconditionally. Callers must have detached its segments.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<NodeData> {
        self.nodes.remove(id)
    }

    /// Finds the node nearest to `(x, y)` within `tolerance`.
    #[must_use]
    pub fn find_node_at(&self, x: f64, y: f64, tolerance: f64) -> Option<NodeId> {
        let p = Point2::new(x, y);
        self.nodes
            .iter()
            .map(|(id, n)| (id, distance_between_points(&p, &n.position)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // --- Segments ---

    /// Creates a segment between two existing nodes and registers it on both.
    ///
    /// # Errors
    ///
    /// - `GraphError::NodeNotFound` if either node is unknown
    /// - `GeometryError::Degenerate` if `start == end` or the nodes coincide
    pub fn create_segment(&mut self, start: NodeId, end: NodeId) -> Result<SegmentId> {
        self.insert_segment(start, end, None)
    }

    /// Validates and builds segment data without touching the graph.
    fn build_segment(&self, start: NodeId, end: NodeId, wall: Option<WallId>) -> Result<SegmentData> {
        let a = self.node_position(start)?;
        let b = self.node_position(end)?;
        if start == end {
            return Err(GeometryError::Degenerate(format!(
                "segment endpoints must differ (node {start:?})"
            ))
            .into());
        }
        if distance_between_points(&a, &b) <= self.config.tolerance {
            return Err(GeometryError::Degenerate(format!(
                "zero-length segment between {start:?} and {end:?}"
            ))
            .into());
        }
        Ok(SegmentData::new(start, end, &a, &b, wall))
    }

    pub(crate) fn insert_segment(&mut self, start: NodeId, end: NodeId, wall: Option<WallId>) -> Result<SegmentId> {
        let data = self.build_segment(start, end, wall)?;
        if let Some(w) = wall {
            self.wall(w)?;
        }
        let length = data.length;
        let id = self.segments.insert(data);
        for n in [start, end] {
            if let Some(node) = self.nodes.get_mut(n) {
                node.attach(id);
            }
        }
        if let Some(w) = wall.and_then(|w| self.walls.get_mut(w)) {
            w.add_segment(id);
        }
        tracing::debug!(?id, ?start, ?end, length, "segment created");
        Ok(id)
    }

    /// Removes a segment from the arena, its nodes and its wall.
    ///
    /// Nodes left without segments are kept; callers decide what to do with them.
    pub(crate) fn detach_segment(&mut self, id: SegmentId) -> Result<SegmentData> {
        let data = self
            .segments
            .remove(id)
            .ok_or(GraphError::SegmentNotFound(id))?;
        for n in [data.start, data.end] {
            if let Some(node) = self.nodes.get_mut(n) {
                node.detach(id);
            }
        }
        if let Some(w) = data.wall.and_then(|w| self.walls.get_mut(w)) {
            w.remove_segment(id);
        }
        Ok(data)
    }

    /// Deletes a segment, removes nodes left without connections, and runs
    /// node cleanup on the surviving endpoints.
    ///
    /// Returns the cleanup outcome of every endpoint that survived.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` if the id is unknown.
    pub fn delete_segment(&mut self, id: SegmentId) -> Result<Vec<CleanupOutcome>> {
        let data = self.detach_segment(id)?;
        tracing::debug!(?id, start = ?data.start, end = ?data.end, "segment deleted");

        let mut outcomes = Vec::with_capacity(2);
        for node in [data.start, data.end] {
            if self.remove_if_orphan(node) || !self.nodes.contains_key(node) {
                continue;
            }
            outcomes.push(cleanup::perform_node_cleanup(self, node)?);
        }
        Ok(outcomes)
    }

    /// Splits a segment at `point` into two segments sharing a new
    /// intersection node. Wall ownership carries over to both halves.
    ///
    /// # Errors
    ///
    /// - `GraphError::SegmentNotFound` if the id is unknown
    /// - `OperationError::InvalidInput` if `point` is not on the segment
    /// - `GeometryError::Degenerate` if `point` coincides with an endpoint
    pub fn subdivide_segment(&mut self, id: SegmentId, point: Point2) -> Result<(SegmentId, SegmentId)> {
        let (a, b) = self.segment_endpoints(id)?;
        let length = self.segment(id)?.length;
        let tol = self.config.tolerance;

        if distance_to_segment(&point, &a, &b) > tol * (1.0 + length) {
            return Err(OperationError::InvalidInput(format!(
                "point ({}, {}) does not lie on segment {id:?}",
                point.x, point.y
            ))
            .into());
        }
        if distance_between_points(&point, &a) <= tol || distance_between_points(&point, &b) <= tol {
            return Err(GeometryError::Degenerate(format!(
                "subdivision point coincides with an endpoint of {id:?}"
            ))
            .into());
        }

        let node = self.insert_node(point, NodeKind::Intersection);
        match self.split_segment_at_node(id, node) {
            Ok(halves) => Ok(halves),
            Err(e) => {
                self.nodes.remove(node);
                Err(e)
            }
        }
    }

    /// Splits segment `id` at an existing node that lies on it.
    ///
    /// The node is marked as an intersection. Both halves keep the original
    /// direction and wall; the wall's segment set swaps the old id for the
    /// two new ones in one step.
    pub(crate) fn split_segment_at_node(&mut self, id: SegmentId, node: NodeId) -> Result<(SegmentId, SegmentId)> {
        let seg = self.segment(id)?.clone();
        if seg.has_node(node) {
            return Err(GeometryError::Degenerate(format!(
                "cannot split {id:?} at its own endpoint {node:?}"
            ))
            .into());
        }
        let first = self.build_segment(seg.start, node, seg.wall)?;
        let second = self.build_segment(node, seg.end, seg.wall)?;

        self.segments.remove(id);
        for n in [seg.start, seg.end] {
            if let Some(nd) = self.nodes.get_mut(n) {
                nd.detach(id);
            }
        }

        let first_id = self.segments.insert(first);
        let second_id = self.segments.insert(second);
        if let Some(nd) = self.nodes.get_mut(seg.start) {
            nd.attach(first_id);
        }
        if let Some(nd) = self.nodes.get_mut(seg.end) {
            nd.attach(second_id);
        }
        if let Some(nd) = self.nodes.get_mut(node) {
            nd.attach(first_id);
            nd.attach(second_id);
            nd.kind = NodeKind::Intersection;
        }
        if let Some(w) = seg.wall.and_then(|w| self.walls.get_mut(w)) {
            w.replace_segment(id, &[first_id, second_id]);
        }

        tracing::debug!(original = ?id, ?node, first = ?first_id, second = ?second_id, "segment subdivided");
        Ok((first_id, second_id))
    }

    // --- Walls ---

    /// Creates a wall of `wall_type` from unowned segments.
    ///
    /// # Errors
    ///
    /// - `GraphError::SegmentNotFound` if any segment is unknown
    /// - `GraphError::SegmentOwned` if a segment already belongs to a wall
    /// - `OperationError::InvalidInput` if `segments` is empty
    pub fn create_wall(&mut self, wall_type: WallType, segments: &[SegmentId]) -> Result<WallId> {
        self.create_wall_inner(wall_type, segments, false)
    }

    /// Like [`create_wall`](Self::create_wall), but moves segments that
    /// already belong to another wall into the new one.
    ///
    /// # Errors
    ///
    /// Same as `create_wall`, minus `SegmentOwned`.
    pub fn create_wall_with_reassign(&mut self, wall_type: WallType, segments: &[SegmentId]) -> Result<WallId> {
        self.create_wall_inner(wall_type, segments, true)
    }

    fn create_wall_inner(&mut self, wall_type: WallType, segments: &[SegmentId], reassign: bool) -> Result<WallId> {
        if segments.is_empty() {
            return Err(OperationError::InvalidInput("a wall needs at least one segment".to_owned()).into());
        }
        let mut unique: Vec<SegmentId> = Vec::with_capacity(segments.len());
        for &s in segments {
            let seg = self.segment(s)?;
            if let Some(owner) = seg.wall {
                if !reassign {
                    return Err(GraphError::SegmentOwned { segment: s, wall: owner }.into());
                }
            }
            if !unique.contains(&s) {
                unique.push(s);
            }
        }

        let thickness = self.config.thicknesses.for_type(wall_type);
        let id = self.walls.insert(WallData::new(wall_type, thickness, unique.clone()));
        for s in unique {
            let Some(seg) = self.segments.get_mut(s) else {
                continue;
            };
            if let Some(prev) = seg.wall.replace(id) {
                if let Some(prev_wall) = self.walls.get_mut(prev) {
                    prev_wall.remove_segment(s);
                }
            }
        }
        tracing::debug!(?id, %wall_type, thickness, "wall created");
        Ok(id)
    }

    /// Changes a wall's type and resets its thickness to the type default.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the id is unknown.
    pub fn update_wall_type(&mut self, id: WallId, wall_type: WallType) -> Result<&WallData> {
        let thickness = self.config.thicknesses.for_type(wall_type);
        let wall = self.wall_mut(id)?;
        wall.wall_type = wall_type;
        wall.thickness = thickness;
        wall.touch();
        tracing::debug!(?id, %wall_type, thickness, "wall type updated");
        Ok(wall)
    }

    /// Overrides a wall's thickness independently of its type.
    ///
    /// # Errors
    ///
    /// - `GraphError::WallNotFound` if the id is unknown
    /// - `GeometryError::Degenerate` if `thickness` is not positive
    pub fn set_wall_thickness(&mut self, id: WallId, thickness: f64) -> Result<()> {
        if thickness.is_nan() || thickness <= self.config.tolerance {
            return Err(GeometryError::Degenerate(format!("wall thickness {thickness} is not positive")).into());
        }
        let wall = self.wall_mut(id)?;
        wall.thickness = thickness;
        wall.touch();
        Ok(())
    }

    /// Shows or hides a wall.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the id is unknown.
    pub fn set_wall_visible(&mut self, id: WallId, visible: bool) -> Result<()> {
        let wall = self.wall_mut(id)?;
        wall.visible = visible;
        wall.touch();
        Ok(())
    }

    /// Deletes a wall. With `also_delete_segments`, every owned segment is
    /// deleted too and node cleanup runs on the surviving endpoints once the
    /// wall is gone; otherwise the segments survive without an owner.
    ///
    /// Segments the wall does not own are never deleted, even when cleanup
    /// merges them at a node the wall's segments used to occupy.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the id is unknown.
    pub fn delete_wall(&mut self, id: WallId, also_delete_segments: bool) -> Result<Vec<CleanupOutcome>> {
        let owned = self.wall(id)?.segments.clone();
        let mut outcomes = Vec::new();

        if also_delete_segments {
            let mut touched: Vec<NodeId> = Vec::with_capacity(owned.len() * 2);
            for s in &owned {
                let data = self.detach_segment(*s)?;
                for n in [data.start, data.end] {
                    if !touched.contains(&n) {
                        touched.push(n);
                    }
                }
            }
            self.walls.remove(id);
            for n in touched {
                if self.remove_if_orphan(n) || !self.nodes.contains_key(n) {
                    continue;
                }
                outcomes.push(cleanup::perform_node_cleanup(self, n)?);
            }
        } else {
            for s in owned {
                if let Some(seg) = self.segments.get_mut(s) {
                    seg.wall = None;
                }
            }
            self.walls.remove(id);
        }

        tracing::debug!(?id, also_delete_segments, "wall deleted");
        Ok(outcomes)
    }

    // --- Queries ---

    /// Walls of the given type.
    #[must_use]
    pub fn get_walls_by_type(&self, wall_type: WallType) -> Vec<WallId> {
        self.walls
            .iter()
            .filter(|(_, w)| w.wall_type == wall_type)
            .map(|(id, _)| id)
            .collect()
    }

    /// Segments owned by a wall.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::WallNotFound` if the id is unknown.
    pub fn get_segments_by_wall(&self, id: WallId) -> Result<Vec<SegmentId>> {
        Ok(self.wall(id)?.segments.clone())
    }

    /// Process intersections for a newly created or moved segment.
    ///
    /// See [`ProcessIntersections`](crate::operations::intersection::ProcessIntersections).
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SegmentNotFound` if the id is unknown.
    pub fn process_intersections(
        &mut self,
        segment: SegmentId,
    ) -> Result<Vec<crate::operations::intersection::SegmentModification>> {
        crate::operations::intersection::ProcessIntersections::new(segment).execute(self)
    }

    /// Merge `node` away if it is a collinear degree-2 node.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if the id is unknown.
    pub fn perform_node_cleanup(&mut self, node: NodeId) -> Result<CleanupOutcome> {
        cleanup::perform_node_cleanup(self, node)
    }

    /// Scans every node and merges all collinear degree-2 nodes.
    ///
    /// # Errors
    ///
    /// Only fails on an internal invariant violation.
    pub fn analyze_and_cleanup_nodes(&mut self) -> Result<cleanup::CleanupReport> {
        cleanup::analyze_and_cleanup_nodes(self)
    }

    /// Builds the derived solid of a wall.
    ///
    /// See [`ComputeWallSolid`](crate::operations::solid::ComputeWallSolid).
    ///
    /// # Errors
    ///
    /// - `GraphError::WallNotFound` if the id is unknown
    /// - `GeometryError::Degenerate` if the wall has no segments
    pub fn compute_wall_solid(&self, id: WallId) -> Result<WallSolid> {
        ComputeWallSolid::new(id).execute(self)
    }

    /// Builds a wall's solid and validates it with the graph's tolerance.
    ///
    /// # Errors
    ///
    /// Same as [`compute_wall_solid`](Self::compute_wall_solid).
    pub fn validate_wall(&self, id: WallId) -> Result<ValidationReport> {
        let solid = self.compute_wall_solid(id)?;
        Ok(GeometryValidator::from_config(&self.config).validate(&solid))
    }

    /// Verifies every referential and geometric invariant of the graph.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidReference` describing the first violation.
    pub fn check_integrity(&self) -> Result<()> {
        let tol = self.config.tolerance;
        let fail = |msg: String| -> Result<()> { Err(GraphError::InvalidReference(msg).into()) };

        for (id, node) in &self.nodes {
            if node.segments.is_empty() {
                return fail(format!("node {id:?} has no connected segments"));
            }
            for s in &node.segments {
                match self.segments.get(*s) {
                    Some(seg) if seg.has_node(id) => {}
                    Some(_) => return fail(format!("node {id:?} lists segment {s:?} that does not touch it")),
                    None => return fail(format!("node {id:?} lists missing segment {s:?}")),
                }
            }
        }

        for (id, seg) in &self.segments {
            if seg.start == seg.end {
                return fail(format!("segment {id:?} starts and ends at the same node"));
            }
            for n in [seg.start, seg.end] {
                match self.nodes.get(n) {
                    Some(node) if node.segments.contains(&id) => {}
                    Some(_) => return fail(format!("node {n:?} does not list segment {id:?}")),
                    None => return fail(format!("segment {id:?} references missing node {n:?}")),
                }
            }
            let (a, b) = self.segment_endpoints(id)?;
            let actual = distance_between_points(&a, &b);
            if (actual - seg.length).abs() > tol * (1.0 + actual) {
                return fail(format!("segment {id:?} caches length {} but spans {actual}", seg.length));
            }
            if let Some(w) = seg.wall {
                match self.walls.get(w) {
                    Some(wall) if wall.segments.contains(&id) => {}
                    Some(_) => return fail(format!("wall {w:?} does not list segment {id:?}")),
                    None => return fail(format!("segment {id:?} references missing wall {w:?}")),
                }
            }
        }

        for (id, wall) in &self.walls {
            for s in &wall.segments {
                match self.segments.get(*s) {
                    Some(seg) if seg.wall == Some(id) => {}
                    Some(_) => return fail(format!("wall {id:?} lists segment {s:?} owned elsewhere")),
                    None => return fail(format!("wall {id:?} lists missing segment {s:?}")),
                }
            }
        }
        Ok(())
    }
}
