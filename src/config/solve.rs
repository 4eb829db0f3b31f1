use super::{build_stack, load_json};
use crate::error::{HdrError, Result};
use crate::response::SolverParams;
use crate::stack::ExposureStack;
use crate::types::ExposurePair;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SolveOutputConfig {
    /// Curve file; the curve goes to stdout when absent.
    pub curve: Option<PathBuf>,
    /// `pixel_value  exposure` debug points.
    pub points: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SolveToolConfig {
    pub images: Vec<ExposurePair>,
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub solver: SolverParams,
    /// Fixed seed for reproducible sampling.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub output: SolveOutputConfig,
}

impl SolveToolConfig {
    pub fn stack(&self) -> ExposureStack {
        build_stack(&self.images, self.input_dir.as_ref())
    }

    pub fn validate(&self) -> Result<()> {
        if self.images.len() < 2 {
            return Err(HdrError::Config(format!(
                "at least 2 images are required, got {}",
                self.images.len()
            )));
        }
        if let Some(bad) = self.images.iter().find(|p| !(p.exposure > 0.0)) {
            return Err(HdrError::Config(format!(
                "exposure of {} must be positive, got {}",
                bad.path.display(),
                bad.exposure
            )));
        }
        if self.solver.num_samples == 0 {
            return Err(HdrError::Config("num_samples must be positive".to_string()));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<SolveToolConfig> {
    let config: SolveToolConfig = load_json(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighting::WeightingFunc;

    #[test]
    fn parses_minimal_and_full_configs() {
        let minimal: SolveToolConfig = serde_json::from_str(
            r#"{"images": [{"path": "a.png", "exposure": 1.0}, {"path": "b.png", "exposure": 2.0}]}"#,
        )
        .unwrap();
        assert_eq!(minimal.solver, SolverParams::default());
        assert!(minimal.output.curve.is_none());
        minimal.validate().unwrap();

        let full: SolveToolConfig = serde_json::from_str(
            r#"{
                "images": [{"path": "a.png", "exposure": 1000}, {"path": "b.png", "exposure": 4000}],
                "input_dir": "/stack",
                "num_samples": 500,
                "smoothing": 3.0,
                "channel": 1,
                "weighting": "hat_10",
                "seed": 9,
                "output": {"curve": "curve.txt", "points": "points.txt"}
            }"#,
        )
        .unwrap();
        assert_eq!(full.solver.num_samples, 500);
        assert_eq!(full.solver.weighting, WeightingFunc::Hat10);
        assert_eq!(full.seed, Some(9));
        assert_eq!(full.stack()[1].path(), Path::new("/stack/b.png"));
    }

    #[test]
    fn rejects_single_image() {
        let cfg: SolveToolConfig =
            serde_json::from_str(r#"{"images": [{"path": "a.png", "exposure": 1.0}]}"#).unwrap();
        assert!(matches!(cfg.validate(), Err(HdrError::Config(_))));
    }
}
