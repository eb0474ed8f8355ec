use std::time::SystemTime;

use rustc_hash::FxHashSet;

use crate::math::distance_2d::distance_to_segment;
use crate::math::{Aabb2, Point2};

use super::{NodeKind, WallGraph, WallId, WallType};

/// Entity counts across a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub endpoint_nodes: usize,
    pub intersection_nodes: usize,
    pub segment_count: usize,
    /// Segments that belong to no wall.
    pub unowned_segments: usize,
    pub wall_count: usize,
    pub layout_walls: usize,
    pub zone_walls: usize,
    pub area_walls: usize,
    /// Summed centerline length per wall type, indexed like [`WallType::ALL`].
    pub length_by_type: [f64; 3],
}

impl GraphStatistics {
    /// Number of walls of the given type.
    #[must_use]
    pub fn walls_of(&self, wall_type: WallType) -> usize {
        match wall_type {
            WallType::Layout => self.layout_walls,
            WallType::Zone => self.zone_walls,
            WallType::Area => self.area_walls,
        }
    }
}

/// Aggregated, read-only view of one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallProperties {
    pub id: WallId,
    pub wall_type: WallType,
    pub thickness: f64,
    pub visible: bool,
    pub segment_count: usize,
    /// Sum of segment lengths.
    pub total_length: f64,
    /// Distinct nodes touched by the wall's segments.
    pub node_count: usize,
    /// Centerline bounds, `None` for an empty wall.
    pub bounds: Option<Aabb2>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Result of a point hit test against walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: WallId,
    /// Distance from the query point to the wall's nearest centerline segment.
    pub distance: f64,
}

impl WallGraph {
    /// Counts nodes, segments and walls by kind.
    #[must_use]
    pub fn get_statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            node_count: self.node_count(),
            segment_count: self.segment_count(),
            wall_count: self.wall_count(),
            ..GraphStatistics::default()
        };

        for (_, node) in self.nodes() {
            match node.kind {
                NodeKind::Endpoint => stats.endpoint_nodes += 1,
                NodeKind::Intersection => stats.intersection_nodes += 1,
            }
        }

        for (_, wall) in self.walls() {
            match wall.wall_type {
                WallType::Layout => stats.layout_walls += 1,
                WallType::Zone => stats.zone_walls += 1,
                WallType::Area => stats.area_walls += 1,
            }
        }

        for (_, seg) in self.segments() {
            let Some(wall) = seg.wall.and_then(|w| self.wall(w).ok()) else {
                stats.unowned_segments += 1;
                continue;
            };
            let slot = WallType::ALL
                .iter()
                .position(|t| *t == wall.wall_type)
                .unwrap_or_default();
            stats.length_by_type[slot] += seg.length;
        }

        stats
    }

    /// Aggregated properties of a wall, or `None` if the id is unknown.
    #[must_use]
    pub fn get_wall_properties(&self, id: WallId) -> Option<WallProperties> {
        let wall = self.wall(id).ok()?;
        let mut nodes = FxHashSet::default();
        let mut total_length = 0.0;
        let mut bounds: Option<Aabb2> = None;

        for s in wall.segments() {
            let Ok(seg) = self.segment(*s) else {
                continue;
            };
            total_length += seg.length;
            nodes.insert(seg.start);
            nodes.insert(seg.end);
            if let Ok((a, b)) = self.segment_endpoints(*s) {
                let seg_box = Aabb2::from_corners(a, b);
                bounds = Some(bounds.map_or(seg_box, |bb| bb.union(&seg_box)));
            }
        }

        Some(WallProperties {
            id,
            wall_type: wall.wall_type,
            thickness: wall.thickness,
            visible: wall.visible,
            segment_count: wall.segments().len(),
            total_length,
            node_count: nodes.len(),
            bounds,
            created_at: wall.created_at,
            updated_at: wall.updated_at,
        })
    }

    /// Finds the visible wall whose centerline is nearest to `point`.
    ///
    /// A wall counts as hit when the point lies within its half thickness
    /// plus `tolerance` of any of its segments. Ties resolve to the
    /// nearest centerline.
    #[must_use]
    pub fn find_wall_at_point(&self, point: Point2, tolerance: f64) -> Option<WallHit> {
        let mut best: Option<WallHit> = None;
        for (id, wall) in self.walls() {
            if !wall.visible {
                continue;
            }
            let reach = wall.thickness * 0.5 + tolerance;
            for s in wall.segments() {
                let Ok((a, b)) = self.segment_endpoints(*s) else {
                    continue;
                };
                let d = distance_to_segment(&point, &a, &b);
                if d <= reach && best.map_or(true, |h| d < h.distance) {
                    best = Some(WallHit { wall: id, distance: d });
                }
            }
        }
        best
    }
}
