//! Linear-response fast path: radiance is the slope of sample value against
//! exposure time.
use super::{map_pixels, PixelEstimate, StackSamples};
use crate::regression::fit_line;
use crate::types::PixelCoord;

pub(super) fn estimate_all(
    samples: &StackSamples<'_>,
    begin: u8,
    end: u8,
    with_residual: bool,
    coords: &[PixelCoord],
) -> Vec<PixelEstimate> {
    map_pixels(
        coords,
        || Vec::with_capacity(samples.len()),
        |points, p| estimate(samples, begin, end, with_residual, points, p),
    )
}

/// Fit `z = m t + b` over samples strictly inside `(begin, end)`.
///
/// Fewer than two samples, coincident exposure times or a negative slope make
/// the pixel bad; the negative slope is still written out.
pub(super) fn estimate(
    samples: &StackSamples<'_>,
    begin: u8,
    end: u8,
    with_residual: bool,
    points: &mut Vec<[f64; 2]>,
    p: PixelCoord,
) -> PixelEstimate {
    points.clear();
    for j in 0..samples.len() {
        let z = samples.value(j, p);
        if z > begin && z < end {
            points.push([samples.times[j], z as f64]);
        }
    }
    let valid = points.len();
    if valid < 2 {
        return PixelEstimate::bad(valid);
    }
    let Some(fit) = fit_line(points, with_residual) else {
        return PixelEstimate::bad(valid);
    };
    let slope = fit.line.m as f32;
    PixelEstimate {
        radiance: slope,
        valid,
        residual: fit.residual.map(|r| r as f32),
        bad: slope < 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::LdrImage;

    fn run(values: &[u8], times: &[f64], with_residual: bool) -> PixelEstimate {
        let images: Vec<LdrImage> = values.iter().map(|&v| LdrImage::filled_gray(1, 1, v)).collect();
        let samples = StackSamples {
            images: &images,
            times: times.to_vec(),
            log_times: times.iter().map(|t| t.ln()).collect(),
            channel: 0,
        };
        let mut points = Vec::new();
        estimate(&samples, 0, 255, with_residual, &mut points, PixelCoord::new(0, 0))
    }

    #[test]
    fn slope_is_the_radiance() {
        let est = run(&[30, 60, 120], &[1.0, 2.0, 4.0], true);
        assert!(!est.bad);
        assert_eq!(est.valid, 3);
        assert!((est.radiance - 30.0).abs() < 1e-4);
        assert!(est.residual.unwrap() < 1e-6);
    }

    #[test]
    fn clipped_samples_are_skipped() {
        // the 255 reading is outside (0, 255) and must not pull the slope down
        let est = run(&[40, 80, 255], &[1.0, 2.0, 8.0], false);
        assert_eq!(est.valid, 2);
        assert!((est.radiance - 40.0).abs() < 1e-4);
        assert_eq!(est.residual, None);
    }

    #[test]
    fn single_sample_is_bad() {
        let est = run(&[0, 90, 255], &[1.0, 2.0, 4.0], true);
        assert_eq!(est, PixelEstimate::bad(1));
    }

    #[test]
    fn negative_slope_is_written_but_bad() {
        let est = run(&[120, 60], &[1.0, 2.0], false);
        assert!(est.bad);
        assert!((est.radiance + 60.0).abs() < 1e-4);
    }
}
