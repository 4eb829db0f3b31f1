use super::timing::TimingBreakdown;
use crate::weighting::WeightingFunc;
use serde::Serialize;

/// Summary of one response-curve solve.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub num_images: usize,
    pub num_samples: usize,
    pub width: usize,
    pub height: usize,
    pub channel: usize,
    pub smoothing: f32,
    pub weighting: WeightingFunc,
    /// Rows and columns of the least-squares system.
    pub rows: usize,
    pub cols: usize,
    /// Numerical rank found by the SVD.
    pub rank: usize,
    pub timings: TimingBreakdown,
}

/// Summary of one fusion run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionReport {
    pub strategy: &'static str,
    pub num_images: usize,
    pub width: usize,
    pub height: usize,
    pub valid_range: (u8, u8),
    pub pixels_considered: usize,
    pub bad_pixels: usize,
    pub timings: TimingBreakdown,
}

impl FusionReport {
    /// Share of considered pixels without a usable estimate, in percent.
    pub fn bad_pixel_percent(&self) -> f64 {
        if self.pixels_considered == 0 {
            return 0.0;
        }
        self.bad_pixels as f64 / self.pixels_considered as f64 * 100.0
    }
}
