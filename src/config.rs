use crate::graph::WallType;
use crate::operations::offset::JoinType;

/// Default geometric tolerance for floating-point comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default distance under which two walls count as neighbours.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 5.0;

/// Default miter limit, as a multiple of the offset distance.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Thickness assigned to each wall type, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallThicknesses {
    /// Thickness of `layout` walls. Default: 350.
    pub layout: f64,
    /// Thickness of `zone` walls. Default: 250.
    pub zone: f64,
    /// Thickness of `area` walls. Default: 150.
    pub area: f64,
}

impl Default for WallThicknesses {
    fn default() -> Self {
        Self {
            layout: 350.0,
            zone: 250.0,
            area: 150.0,
        }
    }
}

impl WallThicknesses {
    /// Returns the thickness configured for `wall_type`.
    #[must_use]
    pub fn for_type(&self, wall_type: WallType) -> f64 {
        match wall_type {
            WallType::Layout => self.layout,
            WallType::Zone => self.zone,
            WallType::Area => self.area,
        }
    }
}

/// Configuration threaded into every [`WallGraph`](crate::graph::WallGraph).
///
/// Each graph owns its own copy, so independent graphs never interfere.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    /// Geometric tolerance used for equality, collinearity and intersection
    /// tests. Default: `1e-6`.
    pub tolerance: f64,

    /// Distance under which walls are reported by proximity queries and
    /// under which a hit test snaps to a wall. Default: `5.0`.
    pub proximity_threshold: f64,

    /// Per-type wall thickness.
    pub thicknesses: WallThicknesses,

    /// Join applied at interior baseline vertices when building solids.
    /// Default: [`JoinType::Adaptive`].
    pub join: JoinType,

    /// Maximum miter extension, as a multiple of the offset distance.
    /// Default: `4.0`.
    pub miter_limit: f64,

    /// Document precision in drawing units; scales derived tolerances.
    /// Default: `1.0`.
    pub precision: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            thicknesses: WallThicknesses::default(),
            join: JoinType::Adaptive,
            miter_limit: DEFAULT_MITER_LIMIT,
            precision: 1.0,
        }
    }
}

impl KernelConfig {
    /// Overrides the geometric tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Overrides the proximity threshold.
    #[must_use]
    pub fn with_proximity_threshold(mut self, threshold: f64) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    /// Overrides the per-type wall thicknesses.
    #[must_use]
    pub fn with_thicknesses(mut self, thicknesses: WallThicknesses) -> Self {
        self.thicknesses = thicknesses;
        self
    }

    /// Overrides the join policy used for wall solids.
    #[must_use]
    pub fn with_join(mut self, join: JoinType) -> Self {
        self.join = join;
        self
    }

    /// Overrides the miter limit.
    #[must_use]
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Overrides the document precision.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }
}
