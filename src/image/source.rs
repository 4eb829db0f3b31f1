//! Where exposure images come from.
//!
//! The solver and the fuser only ask for "the image behind this path"; the
//! disk source decodes files, the memory source serves prebuilt buffers
//! (synthetic stacks, callers that already hold the stack in memory).
use super::io::{load_ldr_image, LdrImage};
use crate::error::{HdrError, Result};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<LdrImage>;
}

/// Decodes images from the filesystem on every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskImageSource;

impl ImageSource for DiskImageSource {
    fn load(&self, path: &Path) -> Result<LdrImage> {
        let img = load_ldr_image(path)?;
        debug!(
            "loaded {} ({}x{}, {} channel(s))",
            path.display(),
            img.width(),
            img.height(),
            img.channels()
        );
        Ok(img)
    }
}

/// In-memory images keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<PathBuf, LdrImage>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, image: LdrImage) {
        self.images.insert(path.into(), image);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, image: LdrImage) -> Self {
        self.insert(path, image);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&self, path: &Path) -> Result<LdrImage> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| HdrError::ImageLoad {
                path: path.to_path_buf(),
                message: "no such image in memory source".to_string(),
            })
    }
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn load(&self, path: &Path) -> Result<LdrImage> {
        (**self).load(path)
    }
}
