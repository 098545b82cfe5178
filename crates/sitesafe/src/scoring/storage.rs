//! Legacy storage-scale adapter.
//!
//! Persisted records keep per-parameter scores on a 0-10 scale inherited
//! from the previous reporting system. The conversion lives here so the
//! scoring math itself always works in natural points-out-of-weight units.

/// Convert earned points (`0..=weight`) to the persisted 0-10 scale.
pub fn to_storage(points: f64, weight: f64) -> f64 {
    if weight == 0.0 {
        return 0.0;
    }
    points / weight * 10.0
}

/// Convert a persisted 0-10 score back to points out of `weight`.
pub fn from_storage(stored: f64, weight: f64) -> f64 {
    stored / 10.0 * weight
}
