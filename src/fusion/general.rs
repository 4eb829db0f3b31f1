//! Weighted log-domain estimator for an arbitrary (tabulated) response.
use super::{map_pixels, PixelEstimate, StackSamples};
use crate::response::ResponseCurve;
use crate::types::PixelCoord;
use crate::weighting::WeightTable;

pub(super) fn estimate_all(
    samples: &StackSamples<'_>,
    log_curve: &ResponseCurve,
    table: &WeightTable,
    coords: &[PixelCoord],
) -> Vec<PixelEstimate> {
    map_pixels(coords, || (), |_, p| estimate(samples, log_curve, table, p))
}

/// `exp(Σ w(z_j)(g(z_j) - ln t_j) / Σ w(z_j))`, bad when no sample has weight.
pub(super) fn estimate(
    samples: &StackSamples<'_>,
    log_curve: &ResponseCurve,
    table: &WeightTable,
    p: PixelCoord,
) -> PixelEstimate {
    let mut numerator = 0.0f64;
    let mut denominator = 0.0f64;
    let mut used = 0usize;
    for j in 0..samples.len() {
        let z = samples.value(j, p);
        let w = table.weight(z) as f64;
        if w > 0.0 {
            numerator += w * (log_curve.eval(z) as f64 - samples.log_times[j]);
            denominator += w;
            used += 1;
        }
    }
    if used == 0 {
        return PixelEstimate::bad(0);
    }
    PixelEstimate {
        radiance: (numerator / denominator).exp() as f32,
        valid: used,
        residual: None,
        bad: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::LdrImage;

    fn stack_of(values: &[u8], times: &[f64]) -> (Vec<LdrImage>, Vec<f64>) {
        let images = values.iter().map(|&v| LdrImage::filled_gray(1, 1, v)).collect();
        (images, times.to_vec())
    }

    #[test]
    fn consistent_log_response_yields_exact_radiance() {
        // g(z) = ln(z / 50): a pixel of radiance 2 reads 100 at t=1, 200 at t=2
        let mut values = [0.0f32; 256];
        for (z, v) in values.iter_mut().enumerate().skip(1) {
            *v = (z as f32 / 50.0).ln();
        }
        let curve = ResponseCurve::new(values);
        let (images, times) = stack_of(&[100, 200], &[1.0, 2.0]);
        let samples = StackSamples {
            images: &images,
            log_times: times.iter().map(|t| t.ln()).collect(),
            times,
            channel: 0,
        };
        let est = estimate(&samples, &curve, &WeightTable::default(), PixelCoord::new(0, 0));
        assert!(!est.bad);
        assert_eq!(est.valid, 2);
        assert!((est.radiance - 2.0).abs() < 1e-4, "radiance {}", est.radiance);
    }

    #[test]
    fn fully_clipped_pixel_is_bad() {
        let curve = ResponseCurve::linear(1.0, 0.0);
        let (images, times) = stack_of(&[255, 255, 0], &[1.0, 2.0, 4.0]);
        let samples = StackSamples {
            images: &images,
            log_times: times.iter().map(|t| t.ln()).collect(),
            times,
            channel: 0,
        };
        let est = estimate(&samples, &curve, &WeightTable::default(), PixelCoord::new(0, 0));
        assert_eq!(est, PixelEstimate::bad(0));
    }
}
