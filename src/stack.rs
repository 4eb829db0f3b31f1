//! Exposure stack: the list of (image, exposure time) pairs shared by the
//! solver and the fuser, plus the checks every consumer needs.
use crate::error::{HdrError, Result};
use crate::image::{ImageSource, LdrImage};
use crate::types::ExposurePair;
use log::debug;
use std::ops::Deref;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExposureStack {
    pairs: Vec<ExposurePair>,
}

/// Shared geometry of a validated stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackInfo {
    pub width: usize,
    pub height: usize,
    /// Smallest channel count found across the stack.
    pub min_channels: usize,
}

impl ExposureStack {
    pub fn new(pairs: Vec<ExposurePair>) -> Self {
        Self { pairs }
    }

    pub fn push(&mut self, pair: ExposurePair) {
        self.pairs.push(pair);
    }

    pub fn pairs(&self) -> &[ExposurePair] {
        &self.pairs
    }

    /// Resolve relative image paths against `dir`.
    pub fn rooted_at(mut self, dir: &Path) -> Self {
        for pair in &mut self.pairs {
            if pair.path.is_relative() {
                pair.path = dir.join(&pair.path);
            }
        }
        self
    }

    /// Order pairs by increasing exposure time.
    pub fn sort_by_exposure(&mut self) {
        self.pairs.sort_by(|a, b| a.exposure.total_cmp(&b.exposure));
    }

    /// True when there are at least two pairs with distinct exposure times,
    /// all of them positive.
    pub fn is_well_posed(&self) -> bool {
        if self.pairs.iter().any(|p| !(p.exposure > 0.0) || !p.exposure.is_finite()) {
            return false;
        }
        let first = match self.pairs.first() {
            Some(p) => p.exposure,
            None => return false,
        };
        self.pairs.iter().any(|p| p.exposure != first)
    }

    /// Load every image once and check that they share width and height.
    pub fn probe<S: ImageSource + ?Sized>(&self, images: &S) -> Result<StackInfo> {
        let mut pairs = self.pairs.iter();
        let first = pairs
            .next()
            .ok_or_else(|| HdrError::Config("exposure stack is empty".to_string()))?;
        let img = images.load(first.path())?;
        let mut info = StackInfo {
            width: img.width(),
            height: img.height(),
            min_channels: img.channels(),
        };
        for pair in pairs {
            let img = images.load(pair.path())?;
            check_dimensions(pair.path(), &img, (info.width, info.height))?;
            info.min_channels = info.min_channels.min(img.channels());
        }
        Ok(info)
    }

    /// Load the whole stack, checking geometry and that `channel` exists in
    /// every image.
    pub fn load_all<S: ImageSource + ?Sized>(
        &self,
        images: &S,
        channel: usize,
    ) -> Result<Vec<LdrImage>> {
        let mut out: Vec<LdrImage> = Vec::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            let img = images.load(pair.path())?;
            if let Some(first) = out.first() {
                check_dimensions(pair.path(), &img, first.dimensions())?;
            }
            check_channel(pair.path(), &img, channel)?;
            debug!("stack image {} exposure={}", pair.path.display(), pair.exposure);
            out.push(img);
        }
        Ok(out)
    }
}

impl Deref for ExposureStack {
    type Target = [ExposurePair];

    fn deref(&self) -> &[ExposurePair] {
        &self.pairs
    }
}

impl FromIterator<ExposurePair> for ExposureStack {
    fn from_iter<I: IntoIterator<Item = ExposurePair>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

pub(crate) fn check_dimensions(
    path: &Path,
    img: &LdrImage,
    expected: (usize, usize),
) -> Result<()> {
    if img.dimensions() != expected {
        return Err(HdrError::DimensionMismatch {
            path: path.to_path_buf(),
            expected,
            found: img.dimensions(),
        });
    }
    Ok(())
}

pub(crate) fn check_channel(path: &Path, img: &LdrImage, channel: usize) -> Result<()> {
    if channel >= img.channels() {
        return Err(HdrError::MissingChannel {
            path: path.to_path_buf(),
            channel,
            channels: img.channels(),
        });
    }
    Ok(())
}
