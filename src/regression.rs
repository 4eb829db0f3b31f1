//! Closed-form least-squares line fit through 2-D points.

/// `y = m x + b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub m: f64,
    pub b: f64,
}

impl Line {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.m * x + self.b
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "y = {}x + {}", self.m, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit {
    pub line: Line,
    /// Sum of squared vertical errors, only when requested.
    pub residual: Option<f64>,
}

/// Fit a line through `points` (`[x, y]`) with the normal equations.
///
/// Returns `None` for fewer than two points or when all `x` coincide. The
/// residual costs a second pass over the points and is only computed when
/// `with_residual` is set.
pub fn fit_line(points: &[[f64; 2]], with_residual: bool) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for &[x, y] in points {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }
    let denom = n * sxx - sx * sx;
    if !denom.is_finite() || denom.abs() <= 1e-12 * (n * sxx).abs().max(f64::MIN_POSITIVE) {
        return None;
    }
    let m = (n * sxy - sx * sy) / denom;
    let b = (sy - m * sx) / n;
    let line = Line { m, b };

    let residual = with_residual.then(|| {
        points
            .iter()
            .map(|&[x, y]| {
                let e = y - line.eval(x);
                e * e
            })
            .sum::<f64>()
    });
    Some(LineFit { line, residual })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let pts: Vec<[f64; 2]> = [0.5, 1.0, 2.0, 4.0, 8.0]
            .iter()
            .map(|&x| [x, 3.25 * x - 1.5])
            .collect();
        let fit = fit_line(&pts, true).expect("fit");
        assert!((fit.line.m - 3.25).abs() < 1e-12);
        assert!((fit.line.b + 1.5).abs() < 1e-12);
        assert!(fit.residual.unwrap() < 1e-18);
    }

    #[test]
    fn two_points_define_the_line() {
        let fit = fit_line(&[[1.0, 10.0], [2.0, 20.0]], false).unwrap();
        assert!((fit.line.m - 10.0).abs() < 1e-12);
        assert!(fit.line.b.abs() < 1e-12);
        assert_eq!(fit.residual, None);
    }

    #[test]
    fn residual_of_noisy_points() {
        // best fit through (0,0), (1,1), (2,0) is y = 1/3
        let fit = fit_line(&[[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]], true).unwrap();
        assert!(fit.line.m.abs() < 1e-12);
        assert!((fit.line.b - 1.0 / 3.0).abs() < 1e-12);
        assert!((fit.residual.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(fit_line(&[[1.0, 2.0]], true).is_none());
        assert!(fit_line(&[[3.0, 2.0], [3.0, 5.0], [3.0, 1.0]], false).is_none());
    }

    #[test]
    fn large_exposure_times_keep_precision() {
        // microsecond-scale abscissae
        let pts = [[1000.0, 12.0], [4000.0, 48.0], [16000.0, 192.0]];
        let fit = fit_line(&pts, false).unwrap();
        assert!((fit.line.m - 0.012).abs() < 1e-12);
    }
}
