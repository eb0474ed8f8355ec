//! Parallel offsets of wall baselines.
//!
//! [`OffsetEngine`] produces the left and right side curves of a wall from
//! its [`Curve`] baseline. When an exact offset is impossible the engine
//! falls back to an approximation and reports it as an [`Approximation`]
//! record. Callers get usable geometry plus a list of what was
//! simplified.

mod polyline;

use crate::config::KernelConfig;
use crate::error::{OperationError, Result};
use crate::geometry::{Curve, Polyline};
use crate::graph::NodeId;
use crate::math::TOLERANCE;

use super::tolerance::{ToleranceContext, ToleranceKind, ToleranceManager};

/// Corner treatment where two offset pieces meet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// Extend both pieces to their intersection.
    Miter,
    /// Connect the piece ends with a straight cut.
    Bevel,
    /// Connect the piece ends with a circular arc around the vertex.
    Round,
    /// Miter for shallow turns, bevel or round for sharp ones.
    #[default]
    Adaptive,
}

/// A simplification the offset engine applied instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Approximation {
    /// A miter longer than the limit was cut to a bevel.
    MiterClipped { vertex: usize },
    /// A near-reversal was capped flat.
    FlatCap { vertex: usize },
    /// Self-intersection loops were cut out of the offset.
    LoopTrimmed { loops: usize },
    /// The offset radius of an arc dropped to zero; the chord was offset.
    ArcCollapsed { radius: f64 },
    /// A freeform curve was flattened to a polyline first.
    Flattened { points: usize, tolerance: f64 },
    /// A junction corner of a wall outline exceeded the miter limit and was
    /// bevelled.
    JunctionClipped { node: NodeId },
}

/// Join used at one interior vertex of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRecord {
    pub vertex: usize,
    /// The concrete join; never `Adaptive`.
    pub join: JoinType,
}

/// One offset side.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetCurve {
    pub curve: Curve,
    /// Signed distance; positive is left of the baseline.
    pub distance: f64,
    pub joins: Vec<JoinRecord>,
    pub approximations: Vec<Approximation>,
}

impl OffsetCurve {
    /// `true` if no approximation was needed.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.approximations.is_empty()
    }
}

/// Both sides of a baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPair {
    pub left: OffsetCurve,
    pub right: OffsetCurve,
}

/// Computes offsets, owning the tolerance cache it draws thresholds from.
#[derive(Debug, Clone, Default)]
pub struct OffsetEngine {
    tolerances: ToleranceManager,
}

impl OffsetEngine {
    #[must_use]
    pub fn new(tolerances: ToleranceManager) -> Self {
        Self { tolerances }
    }

    #[must_use]
    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(ToleranceManager::from_config(config))
    }

    #[must_use]
    pub fn tolerances(&self) -> &ToleranceManager {
        &self.tolerances
    }

    /// Offsets `curve` by `distance` to both sides.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if `distance` is not a positive number
    /// - any error of [`offset_side`](Self::offset_side)
    pub fn offset(&mut self, curve: &Curve, distance: f64, join: JoinType) -> Result<OffsetPair> {
        if distance.is_nan() || distance <= 0.0 {
            return Err(OperationError::InvalidInput(format!("offset distance must be positive, got {distance}")).into());
        }
        Ok(OffsetPair {
            left: self.offset_side(curve, distance, join)?,
            right: self.offset_side(curve, -distance, join)?,
        })
    }

    /// Offsets `curve` by the signed `distance` (positive = left).
    ///
    /// # Errors
    ///
    /// - `GeometryError::Degenerate` for a baseline with a zero-length piece
    /// - `OperationError::Failed` if the offset collapses entirely
    pub fn offset_side(&mut self, curve: &Curve, distance: f64, join: JoinType) -> Result<OffsetCurve> {
        if distance.abs() < TOLERANCE {
            return Ok(OffsetCurve {
                curve: curve.clone(),
                distance,
                joins: Vec::new(),
                approximations: Vec::new(),
            });
        }

        let result = match curve {
            Curve::Polyline(p) => self.offset_points(p.points(), distance, join, Vec::new())?,
            Curve::Arc(arc) => {
                // The left normal of a CCW arc points at the center.
                let delta = if arc.is_ccw() { -distance } else { distance };
                match arc.with_radius_delta(delta) {
                    Some(shifted) => OffsetCurve {
                        curve: Curve::Arc(shifted),
                        distance,
                        joins: Vec::new(),
                        approximations: Vec::new(),
                    },
                    None => {
                        let chord = [curve.start(), curve.end()];
                        let approx = vec![Approximation::ArcCollapsed {
                            radius: arc.radius() + delta,
                        }];
                        self.offset_points(&chord, distance, join, approx)?
                    }
                }
            }
            Curve::Bezier(_) | Curve::Spline(_) => {
                let ctx = ToleranceContext::new(ToleranceKind::Offset, 2.0 * distance.abs(), 1.0);
                let tolerance = self.tolerances.calculate_tolerance(&ctx);
                let points = curve.flatten(tolerance);
                let approx = vec![Approximation::Flattened {
                    points: points.len(),
                    tolerance,
                }];
                self.offset_points(&points, distance, join, approx)?
            }
        };

        if !result.approximations.is_empty() {
            tracing::warn!(
                distance,
                approximations = result.approximations.len(),
                "offset fell back to an approximation"
            );
        }
        Ok(result)
    }

    fn offset_points(
        &mut self,
        points: &[crate::math::Point2],
        distance: f64,
        join: JoinType,
        mut approximations: Vec<Approximation>,
    ) -> Result<OffsetCurve> {
        let raw = polyline::offset_chain(points, distance, join, &mut self.tolerances)?;
        approximations.extend(raw.approximations);
        Ok(OffsetCurve {
            curve: Curve::Polyline(Polyline::new(raw.points)?),
            distance,
            joins: raw.joins,
            approximations,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::{Arc2, CatmullRom, CubicBezier};
    use crate::math::Point2;

    #[test]
    fn polyline_pair() {
        let mut engine = OffsetEngine::default();
        let base = Curve::Polyline(Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]).unwrap());
        let pair = engine.offset(&base, 25.0, JoinType::Adaptive).unwrap();
        assert_abs_diff_eq!(pair.left.curve.start().y, 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pair.right.curve.end().y, -25.0, epsilon = 1e-12);
        assert!(pair.left.is_exact() && pair.right.is_exact());
        assert_abs_diff_eq!(pair.right.distance, -25.0);
    }

    #[test]
    fn rejects_non_positive_distance() {
        let mut engine = OffsetEngine::default();
        let base = Curve::Polyline(Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).unwrap());
        assert!(engine.offset(&base, 0.0, JoinType::Miter).is_err());
        assert!(engine.offset(&base, f64::NAN, JoinType::Miter).is_err());
    }

    #[test]
    fn arc_offset_is_concentric() {
        let mut engine = OffsetEngine::default();
        let arc = Curve::Arc(Arc2::new(Point2::origin(), 100.0, 0.0, PI).unwrap());
        let pair = engine.offset(&arc, 10.0, JoinType::Adaptive).unwrap();
        let Curve::Arc(left) = &pair.left.curve else {
            panic!("expected an arc");
        };
        let Curve::Arc(right) = &pair.right.curve else {
            panic!("expected an arc");
        };
        assert_abs_diff_eq!(left.radius(), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(right.radius(), 110.0, epsilon = 1e-12);
    }

    #[test]
    fn collapsing_arc_falls_back_to_chord() {
        let mut engine = OffsetEngine::default();
        let arc = Curve::Arc(Arc2::new(Point2::origin(), 5.0, 0.0, PI).unwrap());
        let left = engine.offset_side(&arc, 10.0, JoinType::Adaptive).unwrap();
        assert!(left.curve.is_polyline());
        assert!(matches!(left.approximations[0], Approximation::ArcCollapsed { .. }));
    }

    #[test]
    fn freeform_curves_are_flattened() {
        let mut engine = OffsetEngine::default();
        let bezier = Curve::Bezier(CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(300.0, 400.0),
            Point2::new(700.0, 400.0),
            Point2::new(1000.0, 0.0),
        ));
        let side = engine.offset_side(&bezier, 50.0, JoinType::Adaptive).unwrap();
        assert!(matches!(side.approximations[0], Approximation::Flattened { .. }));
        // Offset start sits one distance away from the curve start.
        assert_abs_diff_eq!((side.curve.start() - bezier.start()).norm(), 50.0, epsilon = 1e-9);

        let spline = Curve::Spline(CatmullRom::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(500.0, 200.0),
            Point2::new(1000.0, 0.0),
        ]));
        let side = engine.offset_side(&spline, -50.0, JoinType::Round).unwrap();
        assert!(!side.is_exact());
        assert!(engine.tolerances().stats().misses >= 1);
    }
}
