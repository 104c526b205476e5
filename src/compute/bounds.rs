//! Bounds checking for candidate trait vectors.

use crate::schema::Bounds;

/// True when every entry of `vector` lies inside the optional `[lower, upper]` interval.
///
/// An absent bound places no constraint on that side. Bounds are inclusive.
#[inline]
pub fn within_bounds(vector: &[f64], lower: Option<f64>, upper: Option<f64>) -> bool {
    if let Some(lower) = lower {
        if vector.iter().any(|&v| v < lower) {
            return false;
        }
    }
    if let Some(upper) = upper {
        if vector.iter().any(|&v| v > upper) {
            return false;
        }
    }
    true
}

impl Bounds {
    /// Check a vector against these bounds.
    #[inline]
    pub fn contains(&self, vector: &[f64]) -> bool {
        within_bounds(vector, self.lower, self.upper)
    }
}
