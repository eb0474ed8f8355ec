use std::f64::consts::PI;

use crate::config::KernelConfig;
use crate::math::polygon_2d::{perimeter_2d, polygon_self_intersections, signed_area_2d};
use crate::math::{Point2, TOLERANCE};

use super::offset::Approximation;
use super::solid::WallSolid;

/// A loop whose mean width (`2A / P`) falls below this share of the wall
/// thickness is a sliver.
pub const DEFAULT_SLIVER_RATIO: f64 = 0.1;

/// Quality metrics of a set of outline loops.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualityMetrics {
    /// Net enclosed area (holes subtracted).
    pub area: f64,
    /// Summed length of every loop.
    pub perimeter: f64,
    /// `4πA / P²`; 1 for a circle, towards 0 for long thin shapes.
    pub compactness: f64,
    pub outline_count: usize,
    pub sliver_count: usize,
    /// Summed area of sliver loops.
    pub sliver_area: f64,
    pub self_intersection_count: usize,
    /// Shortest outline edge, `0` without outlines.
    pub min_edge_length: f64,
}

impl QualityMetrics {
    #[must_use]
    pub fn is_self_intersecting(&self) -> bool {
        self.self_intersection_count > 0
    }
}

/// A problem found in a wall solid.
#[derive(Debug, Clone, PartialEq)]
pub enum Defect {
    /// The solid has no outline at all.
    MissingOutline,
    SelfIntersection { outline: usize, point: Point2 },
    /// A loop much thinner than the wall.
    SliverFace { outline: usize, area: f64 },
    /// A loop with (near) zero area.
    DegenerateFace { outline: usize, area: f64 },
    /// The offset engine simplified the geometry.
    Approximated(Approximation),
}

/// Outcome of [`GeometryValidator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub defects: Vec<Defect>,
    pub metrics: QualityMetrics,
    /// 1 for a clean solid, lower for each defect; always in `[0, 1]`.
    pub score: f64,
}

impl ValidationReport {
    /// `true` unless the solid is missing, self-intersecting or degenerate.
    /// Slivers and approximations lower the score but keep the solid valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.defects.iter().any(|d| {
            matches!(
                d,
                Defect::MissingOutline | Defect::SelfIntersection { .. } | Defect::DegenerateFace { .. }
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopClass {
    Normal,
    Sliver,
    Degenerate,
}

#[derive(Debug)]
struct LoopInspection {
    signed_area: f64,
    perimeter: f64,
    crossings: Vec<Point2>,
    min_edge: f64,
    class: LoopClass,
}

fn inspect_loop(points: &[Point2], thickness: f64, sliver_ratio: f64, tolerance: f64) -> LoopInspection {
    let signed_area = signed_area_2d(points);
    let perimeter = perimeter_2d(points);
    let crossings = polygon_self_intersections(points, tolerance)
        .into_iter()
        .map(|(_, _, p)| p)
        .collect();
    let n = points.len();
    let min_edge = (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .fold(f64::INFINITY, f64::min);

    let area = signed_area.abs();
    let class = if points.len() < 3 || area <= tolerance * perimeter.max(1.0) {
        LoopClass::Degenerate
    } else if 2.0 * area / perimeter < sliver_ratio * thickness {
        LoopClass::Sliver
    } else {
        LoopClass::Normal
    };

    LoopInspection {
        signed_area,
        perimeter,
        crossings,
        min_edge,
        class,
    }
}

/// Computes metrics for `outlines` of a wall of the given thickness.
#[must_use]
pub fn measure(outlines: &[Vec<Point2>], thickness: f64, tolerance: f64) -> QualityMetrics {
    measure_with(outlines, thickness, DEFAULT_SLIVER_RATIO, tolerance).0
}

fn measure_with(
    outlines: &[Vec<Point2>],
    thickness: f64,
    sliver_ratio: f64,
    tolerance: f64,
) -> (QualityMetrics, Vec<LoopInspection>) {
    let inspections: Vec<LoopInspection> = outlines
        .iter()
        .map(|o| inspect_loop(o, thickness, sliver_ratio, tolerance))
        .collect();

    let mut metrics = QualityMetrics {
        outline_count: outlines.len(),
        ..QualityMetrics::default()
    };
    let mut signed = 0.0;
    let mut min_edge = f64::INFINITY;
    for ins in &inspections {
        signed += ins.signed_area;
        metrics.perimeter += ins.perimeter;
        metrics.self_intersection_count += ins.crossings.len();
        min_edge = min_edge.min(ins.min_edge);
        if ins.class == LoopClass::Sliver {
            metrics.sliver_count += 1;
            metrics.sliver_area += ins.signed_area.abs();
        }
    }
    metrics.area = signed.abs();
    metrics.min_edge_length = if min_edge.is_finite() { min_edge } else { 0.0 };
    if metrics.perimeter > TOLERANCE {
        metrics.compactness = 4.0 * PI * metrics.area / (metrics.perimeter * metrics.perimeter);
    }
    (metrics, inspections)
}

/// Checks wall solids for defects and scores them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryValidator {
    tolerance: f64,
    sliver_ratio: f64,
}

impl GeometryValidator {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            sliver_ratio: DEFAULT_SLIVER_RATIO,
        }
    }

    #[must_use]
    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.tolerance)
    }

    #[must_use]
    pub fn with_sliver_ratio(mut self, ratio: f64) -> Self {
        self.sliver_ratio = ratio;
        self
    }

    /// Validates a solid. Never fails; problems are reported as defects.
    #[must_use]
    pub fn validate(&self, solid: &WallSolid) -> ValidationReport {
        let (metrics, inspections) = measure_with(&solid.outlines, solid.thickness, self.sliver_ratio, self.tolerance);
        let mut defects = Vec::new();

        if solid.outlines.is_empty() {
            defects.push(Defect::MissingOutline);
        }
        for (i, ins) in inspections.iter().enumerate() {
            defects.extend(ins.crossings.iter().map(|p| Defect::SelfIntersection { outline: i, point: *p }));
            match ins.class {
                LoopClass::Normal => {}
                LoopClass::Sliver => defects.push(Defect::SliverFace {
                    outline: i,
                    area: ins.signed_area.abs(),
                }),
                LoopClass::Degenerate => defects.push(Defect::DegenerateFace {
                    outline: i,
                    area: ins.signed_area.abs(),
                }),
            }
        }
        defects.extend(solid.approximations.iter().cloned().map(Defect::Approximated));

        let score = score(&defects);
        if score < 1.0 {
            tracing::debug!(wall = ?solid.wall, score, defects = defects.len(), "wall solid has defects");
        }
        ValidationReport { defects, metrics, score }
    }
}

impl Default for GeometryValidator {
    fn default() -> Self {
        Self::from_config(&KernelConfig::default())
    }
}

fn score(defects: &[Defect]) -> f64 {
    let mut crossings = false;
    let mut fatal = 0.0;
    let mut slivers = 0.0;
    let mut approximations = 0.0;
    for d in defects {
        match d {
            Defect::MissingOutline => return 0.0,
            Defect::SelfIntersection { .. } => crossings = true,
            Defect::DegenerateFace { .. } => fatal += 0.3,
            Defect::SliverFace { .. } => slivers += 0.15,
            Defect::Approximated(_) => approximations += 0.05,
        }
    }
    let crossing_penalty = if crossings { 0.5 } else { 0.0 };
    let penalty = crossing_penalty + fatal + f64::min(slivers, 0.45) + f64::min(approximations, 0.25);
    (1.0 - penalty).clamp(0.0, 1.0)
}
