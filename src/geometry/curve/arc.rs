use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_point_at, arc_subdivision_count, arc_tangent_at};
use crate::math::{Aabb2, Point2, Vector2, TOLERANCE};

/// A circular arc in the drawing plane.
///
/// Sweeps from `start_angle` by the signed `sweep` (positive = CCW).
#[derive(Debug, Clone, PartialEq)]
pub struct Arc2 {
    center: Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl Arc2 {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the radius is not positive or
    /// the sweep is zero.
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius.is_nan() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be non-zero".into()).into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// `true` for counter-clockwise arcs.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, self.start_angle, self.sweep, t)
    }

    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let (x, y) = arc_tangent_at(self.start_angle, self.sweep, t);
        Vector2::new(x, y)
    }

    /// Signed curvature: `1/r` for CCW arcs, `-1/r` for CW arcs.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.sweep.signum() / self.radius
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Chord approximation within `tolerance` (sagitta bound).
    #[must_use]
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        let n = arc_subdivision_count(self.radius, self.sweep.abs(), tolerance);
        (0..=n).map(|i| self.point_at(f64::from(i) / f64::from(n))).collect()
    }

    /// Exact bounds: endpoints plus every axis extreme inside the sweep.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb2 {
        let mut bb = Aabb2::from_corners(self.point_at(0.0), self.point_at(1.0));
        for k in 0..4 {
            let angle = f64::from(k) * std::f64::consts::FRAC_PI_2;
            if crate::math::arc_2d::angle_in_arc_range(angle, self.start_angle, self.sweep) {
                bb.include(Point2::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                ));
            }
        }
        bb
    }

    /// Concentric arc at `radius + delta`, or `None` if it would collapse.
    #[must_use]
    pub fn with_radius_delta(&self, delta: f64) -> Option<Self> {
        let r = self.radius + delta;
        (r > TOLERANCE).then(|| Self { radius: r, ..self.clone() })
    }
}
