use super::{build_stack, load_json};
use crate::error::{HdrError, Result};
use crate::fusion::FusionParams;
use crate::stack::ExposureStack;
use crate::types::ExposurePair;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How stored curve values relate to log-exposure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveDomain {
    /// Values are log-exposures and are used as-is.
    #[default]
    Log,
    /// Values are exponentiated (solver output); the log is taken on load.
    Exponential,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Linear,
    Tabular {
        curve: PathBuf,
        #[serde(default)]
        domain: CurveDomain,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct FuseOutputConfig {
    /// `.pfm`, `.exr` or `.hdr`
    pub hdr: PathBuf,
    #[serde(default)]
    pub sample_counts: Option<PathBuf>,
    #[serde(default)]
    pub residuals: Option<PathBuf>,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FuseToolConfig {
    pub strategy: StrategyConfig,
    pub images: Vec<ExposurePair>,
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    /// Values in `[0, toe_size]` are excluded.
    #[serde(default)]
    pub toe_size: u32,
    /// Values in `[255 - shoulder_size, 255]` are excluded.
    #[serde(default)]
    pub shoulder_size: u32,
    #[serde(default)]
    pub channel: usize,
    #[serde(default)]
    pub matte: Option<PathBuf>,
    pub output: FuseOutputConfig,
}

impl FuseToolConfig {
    pub fn stack(&self) -> ExposureStack {
        let mut stack = build_stack(&self.images, self.input_dir.as_ref());
        stack.sort_by_exposure();
        stack
    }

    /// `(valid_begin, valid_end)` after applying toe and shoulder.
    pub fn valid_range(&self) -> Result<(u8, u8)> {
        if self.toe_size > 255 || self.shoulder_size > 255 {
            return Err(HdrError::Config(format!(
                "toe/shoulder sizes must be within 0..=255, got {} / {}",
                self.toe_size, self.shoulder_size
            )));
        }
        let begin = self.toe_size as u8;
        let end = 255 - self.shoulder_size as u8;
        if begin >= end {
            return Err(HdrError::Config(format!(
                "empty valid range [{begin}, {end}]"
            )));
        }
        Ok((begin, end))
    }

    pub fn fusion_params(&self) -> Result<FusionParams> {
        let (valid_begin, valid_end) = self.valid_range()?;
        Ok(FusionParams {
            valid_begin,
            valid_end,
            channel: self.channel,
            sample_counts: self.output.sample_counts.is_some(),
            residuals: self.output.residuals.is_some(),
        })
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
        self.valid_range().map(|_| ())
    }
}

pub fn load_config(path: &Path) -> Result<FuseToolConfig> {
    let config: FuseToolConfig = load_json(path)?;
    config.validate()?;
    Ok(config)
}
