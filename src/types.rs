//! Plain data shared by the solver and the fuser.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One exposure of the stack: an image reference and the time it was exposed for.
///
/// Exposure times only need to be consistent across a stack (seconds or
/// microseconds both work). They must be positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExposurePair {
    pub path: PathBuf,
    pub exposure: f64,
}

impl ExposurePair {
    pub fn new(path: impl Into<PathBuf>, exposure: f64) -> Self {
        Self {
            path: path.into(),
            exposure,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn log_exposure(&self) -> f64 {
        self.exposure.ln()
    }
}

/// Integer pixel coordinate in image space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: usize,
    pub y: usize,
}

impl PixelCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Irradiance fitted for one sampled position during the curve solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelSample {
    pub x: usize,
    pub y: usize,
    pub irradiance: f32,
}
