use crate::math::{Aabb2, Point2, Vector2};

/// A cubic Bézier segment.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point2::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }

    /// First derivative `B'(t)` (not normalized).
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Second derivative `B''(t)`.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        (self.p2 - self.p1 * 2.0 + self.p0.coords) * (6.0 * mt)
            + (self.p3 - self.p2 * 2.0 + self.p1.coords) * (6.0 * t)
    }

    /// Control-polygon bounds; always contains the curve.
    #[must_use]
    pub fn hull_bounds(&self) -> Aabb2 {
        let mut bb = Aabb2::from_corners(self.p0, self.p3);
        bb.include(self.p1);
        bb.include(self.p2);
        bb
    }

    /// Subdivides until the control polygon is flat within `tolerance`.
    pub(crate) fn flatten_into(&self, tolerance: f64, out: &mut Vec<Point2>, depth: u32) {
        let flat = crate::math::distance_2d::distance_to_segment(&self.p1, &self.p0, &self.p3)
            .max(crate::math::distance_2d::distance_to_segment(&self.p2, &self.p0, &self.p3));
        if flat <= tolerance || depth >= 16 {
            out.push(self.p3);
            return;
        }
        let (left, right) = self.split(0.5);
        left.flatten_into(tolerance, out, depth + 1);
        right.flatten_into(tolerance, out, depth + 1);
    }

    /// De Casteljau split at `t`.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let lerp = |a: Point2, b: Point2| a + (b - a) * t;
        let p01 = lerp(self.p0, self.p1);
        let p12 = lerp(self.p1, self.p2);
        let p23 = lerp(self.p2, self.p3);
        let p012 = lerp(p01, p12);
        let p123 = lerp(p12, p23);
        let mid = lerp(p012, p123);
        (
            Self::new(self.p0, p01, p012, mid),
            Self::new(mid, p123, p23, self.p3),
        )
    }
}
