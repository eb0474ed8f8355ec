//! Baseline curves a wall solid can be built on.
//!
//! [`Curve`] is a closed set of variants, so every computation over it is an
//! exhaustive `match`. All curves are parameterized over `t` in `[0, 1]`.

mod arc;
mod bezier;
mod polyline;
mod spline;

pub use arc::Arc2;
pub use bezier::CubicBezier;
pub use polyline::Polyline;
pub use spline::CatmullRom;

use crate::math::{cross_2d, Aabb2, Point2, Vector2, TOLERANCE};

/// Tolerance used for length and bounds of freeform curves, relative to
/// the size of their control polygon.
const FREEFORM_RELATIVE_TOLERANCE: f64 = 1e-7;

/// A planar curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Polyline(Polyline),
    Bezier(CubicBezier),
    Spline(CatmullRom),
    Arc(Arc2),
}

impl Curve {
    /// Point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Polyline(p) => p.point_at(t),
            Self::Bezier(b) => b.point_at(t.clamp(0.0, 1.0)),
            Self::Spline(s) => s.point_at(t),
            Self::Arc(a) => a.point_at(t.clamp(0.0, 1.0)),
        }
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.point_at(0.0)
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.point_at(1.0)
    }

    /// Unit tangent at `t`, or the zero vector where the curve is stationary.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let raw = match self {
            Self::Polyline(p) => p.tangent_at(t),
            Self::Bezier(b) => b.derivative(t.clamp(0.0, 1.0)),
            Self::Spline(s) => s.derivative(t),
            Self::Arc(a) => a.tangent_at(t.clamp(0.0, 1.0)),
        };
        let n = raw.norm();
        if n < TOLERANCE {
            Vector2::zeros()
        } else {
            raw / n
        }
    }

    /// Signed curvature at `t` (positive turns left).
    ///
    /// Polylines are straight between vertices and report zero.
    #[must_use]
    pub fn curvature_at(&self, t: f64) -> f64 {
        let (d1, d2) = match self {
            Self::Polyline(_) => return 0.0,
            Self::Arc(a) => return a.curvature(),
            Self::Bezier(b) => {
                let t = t.clamp(0.0, 1.0);
                (b.derivative(t), b.second_derivative(t))
            }
            Self::Spline(s) => (s.derivative(t), s.second_derivative(t)),
        };
        let speed = d1.norm();
        if speed < TOLERANCE {
            return 0.0;
        }
        cross_2d(&d1, &d2) / (speed * speed * speed)
    }

    /// Arc length. Exact for polylines and arcs, flattened for freeform curves.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Polyline(p) => p.length(),
            Self::Arc(a) => a.length(),
            Self::Bezier(_) | Self::Spline(_) => {
                let pts = self.flatten(self.freeform_tolerance());
                pts.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
            }
        }
    }

    /// Axis-aligned bounds of the curve itself, not its control points.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb2 {
        match self {
            Self::Polyline(p) => bounds_of(p.points()),
            Self::Arc(a) => a.bounding_box(),
            Self::Bezier(b) => bezier_bounds(b),
            Self::Spline(s) => (0..s.span_count())
                .map(|i| bezier_bounds(&s.span(i)))
                .reduce(|a, b| a.union(&b))
                .unwrap_or_else(|| bounds_of(&s.points)),
        }
    }

    /// Approximates the curve by a point chain whose chords stay within
    /// `tolerance` of the curve.
    #[must_use]
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        let tolerance = tolerance.max(TOLERANCE);
        match self {
            Self::Polyline(p) => p.points().to_vec(),
            Self::Arc(a) => a.flatten(tolerance),
            Self::Bezier(b) => {
                let mut out = vec![b.p0];
                b.flatten_into(tolerance, &mut out, 0);
                out
            }
            Self::Spline(s) => {
                let mut out: Vec<Point2> = s.points.first().copied().into_iter().collect();
                for i in 0..s.span_count() {
                    s.span(i).flatten_into(tolerance, &mut out, 0);
                }
                out
            }
        }
    }

    /// `true` for curves that are exactly a chain of straight pieces.
    #[must_use]
    pub fn is_polyline(&self) -> bool {
        matches!(self, Self::Polyline(_))
    }

    fn freeform_tolerance(&self) -> f64 {
        let size = match self {
            Self::Bezier(b) => b.hull_bounds(),
            Self::Spline(s) => bounds_of(&s.points),
            Self::Polyline(p) => bounds_of(p.points()),
            Self::Arc(a) => a.bounding_box(),
        };
        (size.width().hypot(size.height()) * FREEFORM_RELATIVE_TOLERANCE).max(TOLERANCE)
    }
}

fn bounds_of(points: &[Point2]) -> Aabb2 {
    Aabb2::from_points(points).unwrap_or(Aabb2::from_corners(Point2::origin(), Point2::origin()))
}

/// Exact Bézier bounds: endpoints plus the roots of `B'(t)` per axis.
fn bezier_bounds(b: &CubicBezier) -> Aabb2 {
    let mut bb = Aabb2::from_corners(b.p0, b.p3);
    let axes = [
        [b.p0.x, b.p1.x, b.p2.x, b.p3.x],
        [b.p0.y, b.p1.y, b.p2.y, b.p3.y],
    ];
    for [p0, p1, p2, p3] in axes {
        // B'(t)/3 = a t^2 + b t + c
        let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
        let bq = 2.0 * (p0 - 2.0 * p1 + p2);
        let c = p1 - p0;
        for t in quadratic_roots(a, bq, c) {
            if t > 0.0 && t < 1.0 {
                bb.include(b.point_at(t));
            }
        }
    }
    bb
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        if b.abs() < TOLERANCE {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    vec![(-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)]
}
