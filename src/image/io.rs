//! Disk I/O for exposure images, HDR results and JSON reports.
//!
//! - `load_ldr_image`: decode a PNG/JPEG/TIFF/... into an owned 8-bit buffer,
//!   keeping its channel layout.
//! - `save_gray_u8`: write a single-channel 8-bit buffer (sample-count maps).
//! - `save_hdr`: write an `ImageF32` as PFM, or as EXR/HDR through `image`.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8, ImageView};
use crate::error::{HdrError, Result};
use image::{DynamicImage, GrayImage, Rgb, Rgb32FImage};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Owned interleaved 8-bit image with borrowed view conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LdrImage {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl LdrImage {
    /// Wrap raw interleaved samples. `data.len()` must equal `width * height * channels`.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height * channels,
            "LdrImage buffer size does not match {width}x{height}x{channels}"
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Single-channel image filled with `value`.
    pub fn filled_gray(width: usize, height: usize, value: u8) -> Self {
        Self::new(width, height, 1, vec![value; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[(y * self.width + x) * self.channels + channel]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: u8) {
        let i = (y * self.width + x) * self.channels + channel;
        self.data[i] = value;
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::packed(self.width, self.height, self.channels, &self.data)
    }
}

/// Load an image from disk as 8-bit samples, preserving its channel count.
///
/// 16-bit and float inputs are converted to 8 bits by the decoder.
pub fn load_ldr_image(path: &Path) -> Result<LdrImage> {
    let img = image::open(path).map_err(|e| HdrError::ImageLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let width = img.width() as usize;
    let height = img.height() as usize;
    let (channels, data) = match img.color().channel_count() {
        1 => (1, img.into_luma8().into_raw()),
        2 => (2, img.into_luma_alpha8().into_raw()),
        3 => (3, img.into_rgb8().into_raw()),
        _ => (4, img.into_rgba8().into_raw()),
    };
    Ok(LdrImage::new(width, height, channels, data))
}

/// Save a single-channel 8-bit buffer (PNG, TIFF, ... by extension).
pub fn save_gray_u8(buffer: &LdrImage, path: &Path) -> Result<()> {
    if buffer.channels != 1 {
        return Err(HdrError::ImageSave {
            path: path.to_path_buf(),
            message: format!("expected 1 channel, got {}", buffer.channels),
        });
    }
    ensure_parent_dir(path)?;
    let image = GrayImage::from_raw(
        buffer.width as u32,
        buffer.height as u32,
        buffer.data.clone(),
    )
    .ok_or_else(|| HdrError::ImageSave {
        path: path.to_path_buf(),
        message: "failed to create image buffer".to_string(),
    })?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| HdrError::ImageSave {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Save a float image. `.pfm` is written as a grayscale portable float map;
/// any other extension goes through the `image` encoders (EXR, Radiance HDR)
/// with the value replicated into three channels.
pub fn save_hdr(image: &ImageF32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let is_pfm = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pfm"));
    if is_pfm {
        let mut sink = create_output(path)?;
        write_pfm(image, &mut sink)
            .and_then(|_| sink.flush())
            .map_err(|e| HdrError::io(path, e))
    } else {
        let mut out = Rgb32FImage::new(image.w as u32, image.h as u32);
        for (y, row) in image.rows().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                out.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
            }
        }
        DynamicImage::ImageRgb32F(out)
            .save(path)
            .map_err(|e| HdrError::ImageSave {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Grayscale PFM: `Pf` header, negative scale for little-endian, rows stored
/// bottom to top.
pub fn write_pfm<W: Write>(image: &ImageF32, sink: &mut W) -> std::io::Result<()> {
    write!(sink, "Pf\n{} {}\n-1.0\n", image.w, image.h)?;
    for y in (0..image.h).rev() {
        for &v in image.row(y) {
            sink.write_all(&v.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        HdrError::Config(format!("failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json).map_err(|e| HdrError::io(path, e))
}

/// Open `path` for buffered writing, creating parent directories.
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| HdrError::io(path, e))?;
    Ok(BufWriter::new(file))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| HdrError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pfm_header_and_row_order() {
        let mut img = ImageF32::new(2, 2);
        img.set(0, 0, 1.0);
        img.set(1, 1, 4.0);
        let mut buf = Vec::new();
        write_pfm(&img, &mut buf).unwrap();

        let header = b"Pf\n2 2\n-1.0\n";
        assert_eq!(&buf[..header.len()], header);
        let body = &buf[header.len()..];
        assert_eq!(body.len(), 4 * 4);
        // first stored row is the bottom one (y = 1)
        assert_eq!(f32::from_le_bytes(body[4..8].try_into().unwrap()), 4.0);
        assert_eq!(f32::from_le_bytes(body[8..12].try_into().unwrap()), 1.0);
    }

    #[test]
    fn gray_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.png");
        let mut img = LdrImage::filled_gray(3, 2, 0);
        img.set(2, 1, 0, 7);
        save_gray_u8(&img, &path).unwrap();
        let back = load_ldr_image(&path).unwrap();
        assert_eq!(back, img);
    }
}
