//! Radiance fusion: merge an exposure stack into one HDR radiance map.
//!
//! Two estimators share the same driver:
//! - [`FusionStrategy::General`] – weighted log-domain average
//!   `exp(Σ w(z)(g(z) - ln t) / Σ w(z))` through a tabulated log response.
//! - [`FusionStrategy::Linear`] – for a linear sensor, the slope of the
//!   sample value against exposure time, fitted over in-range samples.
//!
//! Pixels without enough usable samples get radiance 0 and are counted in
//! [`FusionOutput::bad_pixels`]; they never abort the run.

mod general;
mod linear;

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{FusionReport, TimingBreakdown};
use crate::error::{HdrError, Result};
use crate::image::{ImageF32, ImageSource, ImageView, LdrImage};
use crate::response::ResponseCurve;
use crate::types::{ExposurePair, PixelCoord};
use crate::weighting::WeightTable;
use crate::ExposureStack;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which estimator turns the samples of a pixel into radiance.
#[derive(Clone, Copy, Debug)]
pub enum FusionStrategy<'c> {
    /// Non-linear response; the curve holds log-exposure per sample value.
    General(&'c ResponseCurve),
    /// Linear response fast path.
    Linear,
}

impl FusionStrategy<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FusionStrategy::General(_) => "general",
            FusionStrategy::Linear => "linear",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// Samples at or below this value are treated as under-exposed.
    pub valid_begin: u8,
    /// Samples at or above this value are treated as saturated.
    pub valid_end: u8,
    pub channel: usize,
    /// Produce the per-pixel count of usable samples.
    pub sample_counts: bool,
    /// Produce the per-pixel regression residual (linear strategy only).
    pub residuals: bool,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            valid_begin: 0,
            valid_end: 255,
            channel: 0,
            sample_counts: false,
            residuals: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FusionOutput {
    /// Radiance per pixel; pixels outside the selection stay 0.
    pub radiance: ImageF32,
    /// Usable samples per pixel, clamped to 255.
    pub sample_counts: Option<LdrImage>,
    /// Sum of squared regression errors; -1 where fewer than two samples.
    pub residuals: Option<ImageF32>,
    pub bad_pixels: usize,
    pub report: FusionReport,
}

/// Per-pixel outcome of an estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PixelEstimate {
    pub radiance: f32,
    pub valid: usize,
    pub residual: Option<f32>,
    pub bad: bool,
}

impl PixelEstimate {
    pub(crate) fn bad(valid: usize) -> Self {
        Self {
            radiance: 0.0,
            valid,
            residual: None,
            bad: true,
        }
    }
}

/// Per-exposure data every estimator needs, prepared once per run.
pub(crate) struct StackSamples<'a> {
    pub images: &'a [LdrImage],
    pub times: Vec<f64>,
    pub log_times: Vec<f64>,
    pub channel: usize,
}

impl StackSamples<'_> {
    #[inline]
    pub fn value(&self, j: usize, p: PixelCoord) -> u8 {
        self.images[j].get(p.x, p.y, self.channel)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

pub struct RadianceFuser<'a> {
    stack: &'a [ExposurePair],
    params: FusionParams,
}

impl<'a> RadianceFuser<'a> {
    /// # Panics
    /// When the stack is empty or `valid_begin >= valid_end`.
    pub fn new(stack: &'a [ExposurePair], params: FusionParams) -> Self {
        assert!(!stack.is_empty(), "fusion needs at least one exposure");
        assert!(
            params.valid_begin < params.valid_end,
            "valid range must satisfy begin < end ({} >= {})",
            params.valid_begin,
            params.valid_end
        );
        Self { stack, params }
    }

    /// Load the stack through `images` and fuse the pixels in `coords`.
    pub fn fuse<S: ImageSource + ?Sized>(
        &self,
        strategy: FusionStrategy<'_>,
        images: &S,
        coords: &[PixelCoord],
    ) -> Result<FusionOutput> {
        let load_start = Instant::now();
        let stack = ExposureStack::new(self.stack.to_vec());
        let loaded = stack.load_all(images, self.params.channel)?;
        let load_ms = elapsed_ms(load_start);
        let mut out = self.fuse_loaded(strategy, &loaded, coords)?;
        out.report.timings.push("load", load_ms);
        out.report.timings.total_ms += load_ms;
        Ok(out)
    }

    /// Fuse an already loaded stack; `images[j]` belongs to exposure `j`.
    ///
    /// # Panics
    /// When a coordinate lies outside the images.
    pub fn fuse_loaded(
        &self,
        strategy: FusionStrategy<'_>,
        images: &[LdrImage],
        coords: &[PixelCoord],
    ) -> Result<FusionOutput> {
        let start = Instant::now();
        if images.len() != self.stack.len() {
            return Err(HdrError::Config(format!(
                "{} images for {} exposures",
                images.len(),
                self.stack.len()
            )));
        }
        let frame = images[0].as_view();
        let (width, height) = (frame.width(), frame.height());
        for (pair, img) in self.stack.iter().zip(images) {
            crate::stack::check_dimensions(pair.path(), img, (width, height))?;
            crate::stack::check_channel(pair.path(), img, self.params.channel)?;
        }
        if let Some(p) = coords.iter().find(|p| !frame.contains(p.x, p.y)) {
            panic!("pixel ({}, {}) outside the {width}x{height} stack", p.x, p.y);
        }

        let samples = StackSamples {
            images,
            times: self.stack.iter().map(|p| p.exposure).collect(),
            log_times: self.stack.iter().map(|p| p.log_exposure()).collect(),
            channel: self.params.channel,
        };
        let (begin, end) = (self.params.valid_begin, self.params.valid_end);
        let want_residuals = self.params.residuals && matches!(strategy, FusionStrategy::Linear);
        if self.params.residuals && !want_residuals {
            debug!("residual map requested but only the linear strategy produces one");
        }

        let estimates = match strategy {
            FusionStrategy::General(curve) => {
                let table = WeightTable::hat(begin, end);
                general::estimate_all(&samples, curve, &table, coords)
            }
            FusionStrategy::Linear => {
                linear::estimate_all(&samples, begin, end, want_residuals, coords)
            }
        };

        let mut radiance = ImageF32::new(width, height);
        let mut counts = self
            .params
            .sample_counts
            .then(|| LdrImage::filled_gray(width, height, 0));
        let mut residuals = want_residuals.then(|| ImageF32::new(width, height));
        let mut bad_pixels = 0usize;
        for (p, est) in coords.iter().zip(&estimates) {
            radiance.set(p.x, p.y, est.radiance);
            if let Some(counts) = counts.as_mut() {
                counts.set(p.x, p.y, 0, est.valid.min(255) as u8);
            }
            if let Some(residuals) = residuals.as_mut() {
                residuals.set(p.x, p.y, est.residual.unwrap_or(-1.0));
            }
            if est.bad {
                bad_pixels += 1;
            }
        }

        let mut timings = TimingBreakdown::default();
        timings.lap("fuse", start);
        timings.total_ms = elapsed_ms(start);
        let report = FusionReport {
            strategy: strategy.name(),
            num_images: images.len(),
            width,
            height,
            valid_range: (begin, end),
            pixels_considered: coords.len(),
            bad_pixels,
            timings,
        };
        if bad_pixels > 0 {
            warn!(
                "{bad_pixels} of {} pixels ({:.2}%) had no usable samples in [{begin}, {end}]",
                coords.len(),
                report.bad_pixel_percent()
            );
        }
        info!(
            "fused {} pixels with the {} estimator in {:.1} ms",
            coords.len(),
            strategy.name(),
            report.timings.total_ms
        );

        Ok(FusionOutput {
            radiance,
            sample_counts: counts,
            residuals,
            bad_pixels,
            report,
        })
    }
}

/// Run `estimate` over every coordinate, in parallel when the feature is on.
/// `init` builds per-worker scratch state.
#[cfg(feature = "parallel")]
pub(crate) fn map_pixels<T, I, F>(coords: &[PixelCoord], init: I, estimate: F) -> Vec<PixelEstimate>
where
    T: Send,
    I: Fn() -> T + Sync + Send,
    F: Fn(&mut T, PixelCoord) -> PixelEstimate + Sync + Send,
{
    use rayon::prelude::*;

    coords
        .par_iter()
        .map_init(init, |scratch, &p| estimate(scratch, p))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_pixels<T, I, F>(coords: &[PixelCoord], init: I, estimate: F) -> Vec<PixelEstimate>
where
    I: Fn() -> T,
    F: Fn(&mut T, PixelCoord) -> PixelEstimate,
{
    let mut scratch = init();
    coords.iter().map(|&p| estimate(&mut scratch, p)).collect()
}
