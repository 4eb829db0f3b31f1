//! Weighted, regularized least-squares system of the response solve.
//!
//! Unknowns: `LEVELS` log-response entries `g(0..=255)` followed by one
//! log-irradiance per sampled position. Row layout:
//! - one data row per (image, sample): `w(z) g(z) - w(z) lnE_i = w(z) ln t_j`
//! - one anchor row: `g(ANCHOR_INDEX) = ANCHOR_VALUE`
//! - one smoothing row per interior triple:
//!   `lambda w(i+1) (g(i) - 2 g(i+1) + g(i+2)) = 0`
//!
//! The matrix is dense; each data row touches two columns only.
use crate::error::{HdrError, Result};
use crate::weighting::{WeightTable, LEVELS};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Curve entry pinned by the anchor row.
pub const ANCHOR_INDEX: usize = 128;
/// Value the anchored entry is pinned to (log domain).
pub const ANCHOR_VALUE: f64 = 1.0;

/// Incremental assembly of the data rows, one exposure at a time.
pub struct SystemBuilder<'w> {
    weights: &'w WeightTable,
    smoothing: f64,
    num_samples: usize,
    num_images: usize,
    images_pushed: usize,
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl<'w> SystemBuilder<'w> {
    pub fn new(
        num_images: usize,
        num_samples: usize,
        weights: &'w WeightTable,
        smoothing: f32,
    ) -> Self {
        let rows = num_samples * num_images + LEVELS + 1;
        let cols = LEVELS + num_samples;
        debug!("response system: {rows} rows x {cols} cols");
        Self {
            weights,
            smoothing: smoothing as f64,
            num_samples,
            num_images,
            images_pushed: 0,
            a: DMatrix::zeros(rows, cols),
            b: DVector::zeros(rows),
        }
    }

    /// Add the data rows of the next exposure. `values[i]` is the sample read
    /// at position `i` of the shared sample set.
    pub fn push_exposure(&mut self, exposure: f64, values: &[u8]) {
        assert!(
            self.images_pushed < self.num_images,
            "more exposures pushed than announced ({})",
            self.num_images
        );
        assert_eq!(values.len(), self.num_samples, "one value per sample expected");
        assert!(exposure > 0.0, "exposure time must be positive, got {exposure}");
        let log_t = exposure.ln();
        let base = self.images_pushed * self.num_samples;
        for (i, &z) in values.iter().enumerate() {
            let w = self.weights.weight(z) as f64;
            let row = base + i;
            self.a[(row, z as usize)] = w;
            self.a[(row, LEVELS + i)] = -w;
            self.b[row] = w * log_t;
        }
        self.images_pushed += 1;
    }

    /// Append the anchor and smoothing rows.
    pub fn finish(mut self) -> LinearSystem {
        assert_eq!(
            self.images_pushed, self.num_images,
            "not every exposure was pushed"
        );
        let mut k = self.num_images * self.num_samples;

        self.a[(k, ANCHOR_INDEX)] = 1.0;
        self.b[k] = ANCHOR_VALUE;
        k += 1;

        // The last triple would reach past g(255); its center weight w(255)
        // is zero for every hat, so the row stays empty like the spare one.
        for i in 0..LEVELS - 2 {
            let w = self.smoothing * self.weights.weight((i + 1) as u8) as f64;
            self.a[(k, i)] = w;
            self.a[(k, i + 1)] = -2.0 * w;
            self.a[(k, i + 2)] = w;
            k += 1;
        }
        debug_assert!(k < self.a.nrows());

        LinearSystem {
            a: self.a,
            b: self.b,
            num_samples: self.num_samples,
        }
    }
}

/// Assembled `A x = b`, consumed by the solve.
pub struct LinearSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
    num_samples: usize,
}

/// Least-squares solution split into curve and irradiance parts (log domain).
#[derive(Clone, Debug)]
pub struct SystemSolution {
    pub log_curve: Vec<f64>,
    pub log_irradiance: Vec<f64>,
    pub rank: usize,
}

impl LinearSystem {
    pub fn rows(&self) -> usize {
        self.a.nrows()
    }

    pub fn cols(&self) -> usize {
        self.a.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.b
    }

    /// Solve in the least-squares sense with a thin SVD. Singular values below
    /// `max_sv * max(rows, cols) * EPSILON` are dropped (minimum-norm solution).
    pub fn solve(self) -> Result<SystemSolution> {
        let (rows, cols) = self.a.shape();
        let svd = self.a.svd(true, true);
        let max_sv = svd.singular_values.max();
        if !max_sv.is_finite() || max_sv <= 0.0 {
            return Err(HdrError::Solve(format!(
                "degenerate system ({rows}x{cols}), largest singular value {max_sv}"
            )));
        }
        let eps = max_sv * rows.max(cols) as f64 * f64::EPSILON;
        let rank = svd.rank(eps);
        if rank < cols {
            warn!("response system is rank deficient: rank {rank} < {cols} unknowns");
        } else {
            debug!("response system has full rank {rank}");
        }
        let x = svd
            .solve(&self.b, eps)
            .map_err(|e| HdrError::Solve(e.to_string()))?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(HdrError::Solve("solution contains non-finite values".into()));
        }

        let log_curve = x.iter().take(LEVELS).copied().collect();
        let log_irradiance = x
            .iter()
            .skip(LEVELS)
            .take(self.num_samples)
            .copied()
            .collect();
        Ok(SystemSolution {
            log_curve,
            log_irradiance,
            rank,
        })
    }
}
