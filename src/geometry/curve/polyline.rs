use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// An open chain of straight pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point2>,
}

impl Polyline {
    /// Creates a polyline, dropping consecutive duplicate points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if fewer than two distinct points remain.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().map_or(true, |q| (p - q).norm() > TOLERANCE) {
                cleaned.push(p);
            }
        }
        if cleaned.len() < 2 {
            return Err(GeometryError::Degenerate("polyline needs two distinct points".into()).into());
        }
        Ok(Self { points: cleaned })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Cumulative arc length at each vertex.
    #[must_use]
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut acc = 0.0;
        let mut out = Vec::with_capacity(self.points.len());
        out.push(0.0);
        for w in self.points.windows(2) {
            acc += (w[1] - w[0]).norm();
            out.push(acc);
        }
        out
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Locates arc-length parameter `t` in `[0, 1]` as `(piece, local t)`.
    fn locate(&self, t: f64) -> (usize, f64) {
        let cum = self.cumulative_lengths();
        let total = cum[cum.len() - 1];
        let target = t.clamp(0.0, 1.0) * total;
        for i in 0..self.piece_count() {
            let span = cum[i + 1] - cum[i];
            if target <= cum[i + 1] || i + 1 == self.piece_count() {
                let local = if span < TOLERANCE { 0.0 } else { (target - cum[i]) / span };
                return (i, local.clamp(0.0, 1.0));
            }
        }
        (0, 0.0)
    }

    /// Point at arc-length fraction `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let (i, u) = self.locate(t);
        self.points[i] + (self.points[i + 1] - self.points[i]) * u
    }

    /// Direction of the piece containing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let (i, _) = self.locate(t);
        let d = self.points[i + 1] - self.points[i];
        let n = d.norm();
        if n < TOLERANCE {
            Vector2::zeros()
        } else {
            d / n
        }
    }
}
