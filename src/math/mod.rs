pub mod angle_2d;
pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Numeric floor for denominators and zero-length checks.
///
/// Geometric decisions use the configurable tolerance in
/// [`KernelConfig`](crate::config::KernelConfig); this constant only guards
/// against division by values that are zero up to rounding.
pub const TOLERANCE: f64 = 1e-10;

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Axis-aligned bounding box in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb2 {
    /// Creates a box spanning the two corners in any order.
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Builds the tightest box around `points`, or `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::from_corners(*first, *first);
        for p in rest {
            aabb.include(*p);
        }
        Some(aabb)
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns the union of two boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    /// Returns a copy inflated by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Returns `true` if the two boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_points() {
        let pts = [
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ];
        let b = Aabb2::from_points(&pts).unwrap();
        assert!((b.min.x + 2.0).abs() < TOLERANCE);
        assert!((b.min.y + 1.0).abs() < TOLERANCE);
        assert!((b.max.x - 4.0).abs() < TOLERANCE);
        assert!((b.max.y - 5.0).abs() < TOLERANCE);
        assert!((b.width() - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn aabb_empty_is_none() {
        assert!(Aabb2::from_points(&[]).is_none());
    }

    #[test]
    fn aabb_overlap() {
        let a = Aabb2::from_corners(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Aabb2::from_corners(Point2::new(2.0, 1.0), Point2::new(3.0, 3.0));
        let c = Aabb2::from_corners(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.expanded(3.0).intersects(&c));
    }
}
