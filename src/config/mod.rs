//! JSON run configurations of the command-line tools.
pub mod fuse;
pub mod solve;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HdrError, Result};
use crate::stack::ExposureStack;
use crate::types::ExposurePair;

/// Read and deserialize a JSON config file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| HdrError::io(path, e))?;
    serde_json::from_str(&data)
        .map_err(|e| HdrError::Config(format!("failed to parse config {}: {e}", path.display())))
}

/// Build the stack from config entries, resolving paths against `input_dir`.
pub(crate) fn build_stack(images: &[ExposurePair], input_dir: Option<&PathBuf>) -> ExposureStack {
    let stack = ExposureStack::new(images.to_vec());
    match input_dir {
        Some(dir) => stack.rooted_at(dir),
        None => stack,
    }
}
