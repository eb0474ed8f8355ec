use crate::math::{Point2, Vector2};

use super::bezier::CubicBezier;

/// A uniform Catmull-Rom spline through its control points.
///
/// The curve passes through every point; end tangents are formed by
/// mirroring the neighbouring point. Each span converts to an equivalent
/// cubic Bézier for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    pub points: Vec<Point2>,
}

impl CatmullRom {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Number of spans (`points.len() - 1`, or 0).
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Bézier form of span `i` (between `points[i]` and `points[i + 1]`).
    /// `i` must be below `span_count()`.
    #[must_use]
    pub(super) fn span(&self, i: usize) -> CubicBezier {
        let n = self.points.len();
        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p0 = if i == 0 {
            p1 + (p1 - p2)
        } else {
            self.points[i - 1]
        };
        let p3 = if i + 2 < n {
            self.points[i + 2]
        } else {
            p2 + (p2 - p1)
        };
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        CubicBezier::new(p1, c1, c2, p2)
    }

    /// Maps a global `t` in `[0, 1]` to `(span index, local t)`.
    #[must_use]
    pub fn locate(&self, t: f64) -> (usize, f64) {
        let spans = self.span_count();
        if spans == 0 {
            return (0, 0.0);
        }
        #[allow(clippy::cast_precision_loss)]
        let scaled = t.clamp(0.0, 1.0) * spans as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = (scaled.floor() as usize).min(spans - 1);
        #[allow(clippy::cast_precision_loss)]
        let local = scaled - i as f64;
        (i, local)
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self.points.len() {
            0 => Point2::origin(),
            1 => self.points[0],
            _ => {
                let (i, u) = self.locate(t);
                self.span(i).point_at(u)
            }
        }
    }

    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        if self.points.len() < 2 {
            return Vector2::zeros();
        }
        let (i, u) = self.locate(t);
        self.span(i).derivative(u)
    }

    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        if self.points.len() < 2 {
            return Vector2::zeros();
        }
        let (i, u) = self.locate(t);
        self.span(i).second_derivative(u)
    }
}
