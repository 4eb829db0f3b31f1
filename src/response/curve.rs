//! Tabulated camera response: one value per 8-bit sample.
use crate::error::{HdrError, Result};
use crate::weighting::LEVELS;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Immutable 256-entry response table.
///
/// Values are whatever the producer stored: the solver emits exponentiated
/// log-exposures, the fuser's general estimator reads log-exposures (see
/// [`ResponseCurve::to_log_domain`]).
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCurve {
    values: [f32; LEVELS],
}

impl ResponseCurve {
    pub fn new(values: [f32; LEVELS]) -> Self {
        Self { values }
    }

    /// `LEVELS` values evenly spaced from `min` (index 0) to `max` (index 255).
    ///
    /// # Panics
    /// When `min >= max`.
    pub fn linear(max: f32, min: f32) -> Self {
        assert!(min < max, "linear curve needs min < max ({min} >= {max})");
        let step = (max - min) / (LEVELS - 1) as f32;
        let mut values = [0.0f32; LEVELS];
        for (i, v) in values.iter_mut().enumerate() {
            *v = min + step * i as f32;
        }
        values[LEVELS - 1] = max;
        Self { values }
    }

    #[inline]
    pub fn eval(&self, value: u8) -> f32 {
        self.values[value as usize]
    }

    pub fn values(&self) -> &[f32; LEVELS] {
        &self.values
    }

    /// Natural log of every entry. Non-positive entries map to `-inf`/NaN, so
    /// only apply this to exponentiated curves.
    pub fn to_log_domain(&self) -> Self {
        let mut values = self.values;
        for v in values.iter_mut() {
            *v = v.ln();
        }
        Self { values }
    }

    /// Load a curve stored as 256 newline-separated numbers.
    ///
    /// A missing line, an unparsable token or a value `<= 0` rejects the whole
    /// file; no partial curve is produced.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HdrError::io(path, e))?;
        Self::parse(&text).map_err(|(line, reason)| HdrError::CurveFormat {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    fn parse(text: &str) -> std::result::Result<Self, (usize, String)> {
        let mut values = [0.0f32; LEVELS];
        let mut lines = text.lines();
        for (i, slot) in values.iter_mut().enumerate() {
            let line_no = i + 1;
            let line = lines
                .next()
                .ok_or_else(|| (line_no, format!("expected {LEVELS} lines, found {i}")))?;
            let token = line.trim();
            let value: f32 = token
                .parse()
                .map_err(|_| (line_no, format!("not a number: {token:?}")))?;
            if !(value > 0.0) || !value.is_finite() {
                return Err((line_no, format!("value must be positive, got {value}")));
            }
            *slot = value;
        }
        Ok(Self { values })
    }

    /// Write the curve in the format read by [`ResponseCurve::load_from_file`].
    pub fn write_to<W: Write>(&self, sink: &mut W) -> std::io::Result<()> {
        for v in &self.values {
            writeln!(sink, "{v}")?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::image::io::ensure_parent_dir(path)?;
        let mut buf = Vec::with_capacity(LEVELS * 12);
        self.write_to(&mut buf).map_err(|e| HdrError::io(path, e))?;
        fs::write(path, buf).map_err(|e| HdrError::io(path, e))
    }
}

impl TryFrom<Vec<f32>> for ResponseCurve {
    type Error = HdrError;

    fn try_from(values: Vec<f32>) -> Result<Self> {
        let len = values.len();
        let values: [f32; LEVELS] = values
            .try_into()
            .map_err(|_| HdrError::CurveLength(len))?;
        Ok(Self { values })
    }
}

impl fmt::Display for ResponseCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.values {
            writeln!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve_text(value_at: impl Fn(usize) -> String) -> String {
        (0..LEVELS).map(|i| value_at(i) + "\n").collect()
    }

    #[test]
    fn linear_curve_spans_bounds_uniformly() {
        let c = ResponseCurve::linear(5.1, 0.0);
        assert_eq!(c.eval(0), 0.0);
        assert_eq!(c.eval(255), 5.1);
        let step = 5.1 / 255.0;
        for i in 1..LEVELS {
            let d = c.values()[i] - c.values()[i - 1];
            assert!((d - step).abs() < 1e-5, "step {i}: {d}");
        }
    }

    #[test]
    fn linear_curve_with_offset() {
        let c = ResponseCurve::linear(3.0, -2.0);
        assert_eq!(c.eval(0), -2.0);
        assert_eq!(c.eval(255), 3.0);
    }

    #[test]
    fn vec_of_wrong_length_is_rejected() {
        assert!(matches!(
            ResponseCurve::try_from(vec![1.0; 255]),
            Err(HdrError::CurveLength(255))
        ));
        assert!(ResponseCurve::try_from(vec![1.0; 256]).is_ok());
    }

    #[test]
    fn parse_accepts_positive_values() {
        let text = curve_text(|i| format!("{}", 0.5 + i as f32));
        let c = ResponseCurve::parse(&text).unwrap();
        assert_eq!(c.eval(0), 0.5);
        assert_eq!(c.eval(255), 255.5);
    }

    #[test]
    fn parse_rejects_bad_files() {
        let short = curve_text(|i| format!("{}", i + 1))
            .lines()
            .take(255)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(ResponseCurve::parse(&short).unwrap_err().0, 256);

        let zero = curve_text(|i| if i == 3 { "0".into() } else { "1.0".into() });
        assert_eq!(ResponseCurve::parse(&zero).unwrap_err().0, 4);

        let negative = curve_text(|i| if i == 200 { "-2.5".into() } else { "1.0".into() });
        assert_eq!(ResponseCurve::parse(&negative).unwrap_err().0, 201);

        let garbage = curve_text(|i| if i == 0 { "abc".into() } else { "1.0".into() });
        assert_eq!(ResponseCurve::parse(&garbage).unwrap_err().0, 1);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let mut values = [0.0f32; LEVELS];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (0.013 * i as f32 + 0.25).exp();
        }
        let c = ResponseCurve::new(values);
        let back = ResponseCurve::parse(&c.to_string()).unwrap();
        for i in 0..LEVELS {
            assert!((back.values()[i] - c.values()[i]).abs() <= 1e-6 * c.values()[i]);
        }
        let logs = back.to_log_domain();
        assert!((logs.eval(0) - 0.25).abs() < 1e-5);
    }
}
