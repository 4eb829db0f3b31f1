//! Debevec–Malik response recovery from a sparse sample of the stack.
//!
//! The same random set of positions is read from every exposure. Images are
//! loaded one at a time, their samples turned into data rows, and released
//! before the next one is decoded, so peak memory stays at one image plus the
//! linear system.
use super::curve::ResponseCurve;
use super::sampling::{random_positions, SampleSource};
use super::system::SystemBuilder;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{SolveReport, TimingBreakdown};
use crate::error::{HdrError, Result};
use crate::image::io::create_output;
use crate::image::{ImageSource, LdrImage};
use crate::stack::{check_channel, check_dimensions};
use crate::types::{ExposurePair, PixelCoord, PixelSample};
use crate::weighting::{WeightingFunc, LEVELS};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Knobs of the curve solve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Number of random positions; should exceed 256 to over-determine the system.
    pub num_samples: usize,
    /// Smoothing weight (lambda in Debevec and Malik).
    pub smoothing: f32,
    /// Image channel to solve for.
    pub channel: usize,
    pub weighting: WeightingFunc,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            smoothing: 1.0,
            channel: 0,
            weighting: WeightingFunc::Hat,
        }
    }
}

/// Result of [`ResponseSolver::solve`].
#[derive(Clone, Debug)]
pub struct SolveOutput {
    /// Exponentiated curve, `exp(g(z))`.
    pub curve: ResponseCurve,
    /// The solved `g(z)` itself, ready for the general fusion estimator.
    pub log_curve: ResponseCurve,
    /// Fitted irradiance per sampled position, when requested.
    pub samples: Option<Vec<PixelSample>>,
    pub report: SolveReport,
}

pub struct ResponseSolver<'a> {
    stack: &'a [ExposurePair],
    params: SolverParams,
}

impl<'a> ResponseSolver<'a> {
    /// # Panics
    /// When the stack holds fewer than two exposures or `num_samples == 0`.
    pub fn new(stack: &'a [ExposurePair], params: SolverParams) -> Self {
        assert!(
            stack.len() >= 2,
            "response solve needs at least 2 exposures, got {}",
            stack.len()
        );
        assert!(params.num_samples > 0, "num_samples must be positive");
        if params.num_samples <= LEVELS {
            debug!(
                "num_samples={} does not over-determine the {LEVELS} curve unknowns",
                params.num_samples
            );
        }
        Self { stack, params }
    }

    /// Recover the response curve of the configured channel.
    ///
    /// Any load failure, size mismatch or missing channel aborts the whole
    /// solve.
    pub fn solve<S, R>(&self, images: &S, sampler: &mut R, collect_samples: bool) -> Result<SolveOutput>
    where
        S: ImageSource + ?Sized,
        R: SampleSource + ?Sized,
    {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let params = &self.params;
        let chan = params.channel;
        let table = params.weighting.table();

        let first = &self.stack[0];
        let first_img = images.load(first.path())?;
        check_channel(first.path(), &first_img, chan)?;
        let (width, height) = first_img.dimensions();
        let positions = random_positions(width, height, params.num_samples, sampler);

        let load_start = Instant::now();
        let mut builder =
            SystemBuilder::new(self.stack.len(), positions.len(), &table, params.smoothing);
        builder.push_exposure(first.exposure, &read_samples(&first_img, &positions, chan));
        drop(first_img);
        for pair in &self.stack[1..] {
            let img = images.load(pair.path())?;
            check_dimensions(pair.path(), &img, (width, height))?;
            check_channel(pair.path(), &img, chan)?;
            builder.push_exposure(pair.exposure, &read_samples(&img, &positions, chan));
        }
        let system = builder.finish();
        timings.lap("assemble", load_start);
        let (rows, cols) = (system.rows(), system.cols());

        let solve_start = Instant::now();
        let solution = system.solve()?;
        timings.lap("solve", solve_start);

        let mut log_values = [0.0f32; LEVELS];
        let mut values = [0.0f32; LEVELS];
        for (i, &g) in solution.log_curve.iter().enumerate() {
            log_values[i] = g as f32;
            values[i] = g.exp() as f32;
        }

        let samples = collect_samples.then(|| {
            positions
                .iter()
                .zip(&solution.log_irradiance)
                .map(|(p, &e)| PixelSample {
                    x: p.x,
                    y: p.y,
                    irradiance: e.exp() as f32,
                })
                .collect()
        });

        timings.total_ms = elapsed_ms(total_start);
        info!(
            "response curve solved: {} images, {} samples, rank {}/{} in {:.1} ms",
            self.stack.len(),
            positions.len(),
            solution.rank,
            cols,
            timings.total_ms
        );

        Ok(SolveOutput {
            curve: ResponseCurve::new(values),
            log_curve: ResponseCurve::new(log_values),
            samples,
            report: SolveReport {
                num_images: self.stack.len(),
                num_samples: positions.len(),
                width,
                height,
                channel: chan,
                smoothing: params.smoothing,
                weighting: params.weighting,
                rows,
                cols,
                rank: solution.rank,
                timings,
            },
        })
    }

    /// Debug export to `path`: for each image, then each sample, one line
    /// `pixel_value     exposure_time * irradiance`.
    ///
    /// Every image must match the geometry of the first one, as in [`Self::solve`].
    pub fn write_sample_points<S>(
        &self,
        samples: &[PixelSample],
        images: &S,
        path: &Path,
    ) -> Result<()>
    where
        S: ImageSource + ?Sized,
    {
        let chan = self.params.channel;
        let mut buf = Vec::new();
        let mut geometry = None;
        for pair in self.stack {
            let img = images.load(pair.path())?;
            let expected = *geometry.get_or_insert(img.dimensions());
            check_dimensions(pair.path(), &img, expected)?;
            check_channel(pair.path(), &img, chan)?;
            for s in samples {
                let z = img.get(s.x, s.y, chan);
                let exposure = pair.exposure * s.irradiance as f64;
                writeln!(buf, "{z}     {exposure}").map_err(|e| HdrError::io(path, e))?;
            }
        }
        let mut sink = create_output(path)?;
        sink.write_all(&buf)
            .and_then(|_| sink.flush())
            .map_err(|e| HdrError::io(path, e))
    }
}

fn read_samples(img: &LdrImage, positions: &[PixelCoord], channel: usize) -> Vec<u8> {
    positions
        .iter()
        .map(|p| img.get(p.x, p.y, channel))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MemoryImageSource;

    fn two_images() -> Vec<ExposurePair> {
        vec![ExposurePair::new("a.png", 1.0), ExposurePair::new("b.png", 2.0)]
    }

    fn sample(x: usize, y: usize) -> PixelSample {
        PixelSample { x, y, irradiance: 50.0 }
    }

    #[test]
    fn sample_points_follow_image_then_sample_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.txt");
        let images = MemoryImageSource::new()
            .with("a.png", LdrImage::filled_gray(4, 4, 50))
            .with("b.png", LdrImage::filled_gray(4, 4, 100));
        let stack = two_images();
        let solver = ResponseSolver::new(&stack, SolverParams::default());
        solver
            .write_sample_points(&[sample(1, 1), sample(3, 2)], &images, &path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "50     50\n50     50\n100     100\n100     100\n");
    }

    #[test]
    fn sample_points_reject_mismatched_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.txt");
        let stack = two_images();
        let solver = ResponseSolver::new(&stack, SolverParams::default());

        // smaller second image
        let images = MemoryImageSource::new()
            .with("a.png", LdrImage::filled_gray(4, 4, 50))
            .with("b.png", LdrImage::filled_gray(2, 2, 100));
        let err = solver
            .write_sample_points(&[sample(3, 3)], &images, &path)
            .unwrap_err();
        assert!(matches!(err, HdrError::DimensionMismatch { found: (2, 2), .. }), "{err}");

        // same pixel count, different shape
        let images = MemoryImageSource::new()
            .with("a.png", LdrImage::filled_gray(4, 4, 50))
            .with("b.png", LdrImage::filled_gray(8, 2, 100));
        let err = solver
            .write_sample_points(&[sample(1, 1)], &images, &path)
            .unwrap_err();
        assert!(matches!(err, HdrError::DimensionMismatch { expected: (4, 4), .. }));
        assert!(!path.exists(), "no partial export on failure");
    }
}
