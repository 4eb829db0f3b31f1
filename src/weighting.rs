//! Triangular ("hat") confidence weights over the 8-bit sample domain.
//!
//! Samples at or outside `[lower, upper]` get zero weight; inside, the weight
//! rises linearly from `lower` to the midpoint and falls back to `upper`.
//! With the default bounds this is the hat of Debevec and Malik (1997).
use serde::{Deserialize, Serialize};

/// Number of distinct 8-bit sample values.
pub const LEVELS: usize = 256;

/// Hat weight of `value` for the range `[lower, upper]`.
///
/// # Panics
/// When `lower >= upper`.
#[inline]
pub fn hat(value: u8, lower: u8, upper: u8) -> f32 {
    assert!(lower < upper, "hat bounds must satisfy lower < upper ({lower} >= {upper})");
    let z = value as f32;
    let lo = lower as f32;
    let hi = upper as f32;
    if z <= lo || z >= hi {
        0.0
    } else if z <= 0.5 * (lo + hi) {
        z - lo
    } else {
        hi - z
    }
}

/// Weighting functions selectable for the curve solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingFunc {
    /// Full-range hat on `[0, 255]`.
    #[default]
    Hat,
    /// Hat with the ten extreme values on each end cut to zero, `[10, 245]`.
    #[serde(rename = "hat_10")]
    Hat10,
}

impl WeightingFunc {
    /// `(lower, upper)` bounds of the hat.
    pub fn bounds(self) -> (u8, u8) {
        match self {
            WeightingFunc::Hat => (0, 255),
            WeightingFunc::Hat10 => (10, 255 - 10),
        }
    }

    pub fn table(self) -> WeightTable {
        let (lower, upper) = self.bounds();
        WeightTable::hat(lower, upper)
    }
}

/// Hat function sampled once per 8-bit value.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    lower: u8,
    upper: u8,
    lut: [f32; LEVELS],
}

impl WeightTable {
    pub fn hat(lower: u8, upper: u8) -> Self {
        let mut lut = [0.0f32; LEVELS];
        for (value, w) in lut.iter_mut().enumerate() {
            *w = hat(value as u8, lower, upper);
        }
        Self { lower, upper, lut }
    }

    #[inline]
    pub fn weight(&self, value: u8) -> f32 {
        self.lut[value as usize]
    }

    pub fn bounds(&self) -> (u8, u8) {
        (self.lower, self.upper)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.lut
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::hat(0, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hat_vanishes_at_bounds_and_is_non_negative() {
        for &(lo, hi) in &[(0u8, 255u8), (10, 245), (0, 1), (100, 103), (37, 200)] {
            assert_eq!(hat(lo, lo, hi), 0.0);
            assert_eq!(hat(hi, lo, hi), 0.0);
            for v in 0..=255u8 {
                assert!(hat(v, lo, hi) >= 0.0, "negative weight at {v} for [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn hat_peaks_at_midpoint() {
        let (lo, hi) = (20u8, 220u8);
        let mid = 120u8;
        let peak = hat(mid, lo, hi);
        assert_eq!(peak, 100.0);
        for v in 0..=255u8 {
            assert!(hat(v, lo, hi) <= peak);
        }
        // symmetric around the midpoint
        assert_eq!(hat(mid - 30, lo, hi), hat(mid + 30, lo, hi));
    }

    #[test]
    fn default_hat_matches_paper_shape() {
        assert_eq!(hat(1, 0, 255), 1.0);
        assert_eq!(hat(127, 0, 255), 127.0);
        assert_eq!(hat(128, 0, 255), 127.0);
        assert_eq!(hat(254, 0, 255), 1.0);
    }

    #[test]
    #[should_panic]
    fn inverted_bounds_panic() {
        let _ = hat(5, 200, 100);
    }

    #[test]
    fn table_matches_pointwise_function() {
        let table = WeightingFunc::Hat10.table();
        assert_eq!(table.bounds(), (10, 245));
        for v in 0..=255u8 {
            assert_eq!(table.weight(v), hat(v, 10, 245));
        }
        assert_eq!(table.weight(10), 0.0);
        assert_eq!(table.weight(11), 1.0);
        assert_eq!(table.as_slice().len(), LEVELS);
    }
}
