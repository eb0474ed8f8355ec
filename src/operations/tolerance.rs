//! Context-dependent tolerances for the offset and intersection stages.

use std::f64::consts::PI;

use rustc_hash::FxHashMap;

use crate::config::KernelConfig;
use crate::math::TOLERANCE;

/// Wall thickness at which no thickness scaling is applied.
const REFERENCE_THICKNESS: f64 = 250.0;

/// Thinner walls never tighten the tolerance by more than this factor.
const MIN_THICKNESS_FACTOR: f64 = 0.1;

/// Sharp joins never tighten the tolerance by more than this factor.
const MIN_ANGLE_FACTOR: f64 = 0.05;

/// Offset tolerances also drive curve flattening, so they are coarser.
const OFFSET_SCALE: f64 = 100.0;

/// Default number of cached contexts.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// What a tolerance will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToleranceKind {
    Intersection,
    Collinearity,
    Offset,
}

/// Inputs to [`ToleranceManager::calculate_tolerance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceContext {
    /// Wall thickness in drawing units.
    pub thickness: f64,
    /// Document precision; multiplies the base tolerance.
    pub precision: f64,
    /// Turn angle at a join in radians (`0` = straight, `π` = reversal).
    pub join_angle: Option<f64>,
    pub kind: ToleranceKind,
}

impl ToleranceContext {
    #[must_use]
    pub fn new(kind: ToleranceKind, thickness: f64, precision: f64) -> Self {
        Self {
            thickness,
            precision,
            join_angle: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_join_angle(mut self, angle: f64) -> Self {
        self.join_angle = Some(angle);
        self
    }

    fn key(&self) -> ContextKey {
        ContextKey {
            thickness: self.thickness.to_bits(),
            precision: self.precision.to_bits(),
            join_angle: self.join_angle.map(f64::to_bits),
            kind: self.kind,
        }
    }
}

/// Bit-exact cache key; two contexts share an entry only if every input
/// is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ContextKey {
    thickness: u64,
    precision: u64,
    join_angle: Option<u64>,
    kind: ToleranceKind,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Derives scaled tolerances and join thresholds, caching per context.
#[derive(Debug, Clone)]
pub struct ToleranceManager {
    base: f64,
    miter_limit: f64,
    capacity: usize,
    cache: FxHashMap<ContextKey, f64>,
    hits: u64,
    misses: u64,
}

impl ToleranceManager {
    #[must_use]
    pub fn new(base: f64, miter_limit: f64) -> Self {
        Self {
            base,
            miter_limit,
            capacity: DEFAULT_CACHE_CAPACITY,
            cache: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.tolerance, config.miter_limit)
    }

    /// Caps the number of cached contexts. A full cache is flushed before
    /// the next insert.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn base(&self) -> f64 {
        self.base
    }

    #[must_use]
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// Scaled tolerance for `context`.
    ///
    /// Thinner walls and sharper joins shrink the value; offset contexts
    /// are coarser than intersection or collinearity ones. Never returns
    /// less than the numeric floor.
    pub fn calculate_tolerance(&mut self, context: &ToleranceContext) -> f64 {
        let key = context.key();
        if let Some(v) = self.cache.get(&key) {
            self.hits += 1;
            return *v;
        }
        self.misses += 1;

        let value = self.derive(context);
        if self.cache.len() >= self.capacity {
            self.cache.clear();
        }
        self.cache.insert(key, value);
        value
    }

    fn derive(&self, context: &ToleranceContext) -> f64 {
        let precision = if context.precision.is_finite() && context.precision > 0.0 {
            context.precision
        } else {
            1.0
        };
        let thickness_factor = (context.thickness.abs() / REFERENCE_THICKNESS).clamp(MIN_THICKNESS_FACTOR, 1.0);
        // cos(θ/2) is 1 for a straight join and falls to 0 at a reversal.
        let angle_factor = context
            .join_angle
            .map_or(1.0, |a| (a.abs().min(PI) * 0.5).cos().max(MIN_ANGLE_FACTOR));
        let kind_scale = match context.kind {
            ToleranceKind::Intersection | ToleranceKind::Collinearity => 1.0,
            ToleranceKind::Offset => OFFSET_SCALE,
        };
        (self.base * precision * kind_scale * thickness_factor * angle_factor).max(TOLERANCE)
    }

    /// Turn angle above which a miter would exceed the miter limit.
    ///
    /// A miter at turn `θ` reaches `d / cos(θ/2)` from the corner.
    #[must_use]
    pub fn miter_threshold(&self) -> f64 {
        if self.miter_limit <= 1.0 {
            return 0.0;
        }
        2.0 * (1.0 / self.miter_limit).acos()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
        }
    }

    /// Drops every cached value and resets the counters.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl Default for ToleranceManager {
    fn default() -> Self {
        Self::from_config(&KernelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn thinner_walls_and_sharper_joins_tighten() {
        let mut tm = ToleranceManager::default();
        let thick = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Intersection, 350.0, 1.0));
        let thin = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Intersection, 50.0, 1.0));
        assert!(thin < thick);
        assert_abs_diff_eq!(thick, 1e-6, epsilon = 1e-18);

        let base = ToleranceContext::new(ToleranceKind::Offset, 250.0, 1.0);
        let shallow = tm.calculate_tolerance(&base.with_join_angle(0.1));
        let sharp = tm.calculate_tolerance(&base.with_join_angle(2.5));
        assert!(sharp < shallow);
    }

    #[test]
    fn offset_kind_is_coarser() {
        let mut tm = ToleranceManager::default();
        let i = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Intersection, 250.0, 1.0));
        let o = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Offset, 250.0, 1.0));
        assert_abs_diff_eq!(o / i, OFFSET_SCALE, epsilon = 1e-9);
    }

    #[test]
    fn precision_scales_and_invalid_precision_falls_back() {
        let mut tm = ToleranceManager::default();
        let one = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Collinearity, 250.0, 1.0));
        let ten = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Collinearity, 250.0, 10.0));
        let bad = tm.calculate_tolerance(&ToleranceContext::new(ToleranceKind::Collinearity, 250.0, f64::NAN));
        assert_abs_diff_eq!(ten, one * 10.0, epsilon = 1e-15);
        assert_abs_diff_eq!(bad, one, epsilon = 1e-18);
    }

    #[test]
    fn cache_counts_hits_and_misses() {
        let mut tm = ToleranceManager::default();
        let ctx = ToleranceContext::new(ToleranceKind::Offset, 150.0, 1.0).with_join_angle(FRAC_PI_2);
        let a = tm.calculate_tolerance(&ctx);
        let b = tm.calculate_tolerance(&ctx);
        assert_abs_diff_eq!(a, b);
        assert_eq!(
            tm.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
        tm.clear();
        assert_eq!(tm.stats(), CacheStats::default());
    }

    #[test]
    fn cache_capacity_is_bounded() {
        let mut tm = ToleranceManager::default().with_capacity(4);
        for i in 0..10 {
            let ctx = ToleranceContext::new(ToleranceKind::Intersection, 100.0 + f64::from(i), 1.0);
            tm.calculate_tolerance(&ctx);
        }
        assert!(tm.stats().entries <= 4);
        assert_eq!(tm.stats().misses, 10);
    }

    #[test]
    fn miter_threshold_matches_limit() {
        let tm = ToleranceManager::new(1e-6, 4.0);
        let theta = tm.miter_threshold();
        assert_abs_diff_eq!(1.0 / (theta * 0.5).cos(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ToleranceManager::new(1e-6, 1.0).miter_threshold(), 0.0);
    }
}
