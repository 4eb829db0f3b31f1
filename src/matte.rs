//! Pixel selection for fusion: the whole frame or the white part of a matte.
use crate::error::{HdrError, Result};
use crate::image::LdrImage;
use crate::types::PixelCoord;

/// Every pixel of a `width × height` frame in row-major order.
pub fn all_pixels(width: usize, height: usize) -> Vec<PixelCoord> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            out.push(PixelCoord::new(x, y));
        }
    }
    out
}

/// Pixels whose three matte channels are all 255.
///
/// The matte must be a 3-channel image of the stack's size.
pub fn select_from_matte(matte: &LdrImage, width: usize, height: usize) -> Result<Vec<PixelCoord>> {
    if matte.dimensions() != (width, height) || matte.channels() != 3 {
        return Err(HdrError::Matte(format!(
            "expected a {width}x{height} RGB matte, got {}x{} with {} channel(s)",
            matte.width(),
            matte.height(),
            matte.channels()
        )));
    }
    let view = matte.as_view();
    let mut out = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if view.pixel(x, y).iter().all(|&v| v == 255) {
                out.push(PixelCoord::new(x, y));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_frame_selection() {
        let px = all_pixels(3, 2);
        assert_eq!(px.len(), 6);
        assert_eq!(px[4], PixelCoord::new(1, 1));
    }

    #[test]
    fn only_pure_white_is_selected() {
        let mut matte = LdrImage::new(3, 2, 3, vec![0; 18]);
        for c in 0..3 {
            matte.set(2, 1, c, 255);
        }
        // almost white is not enough
        matte.set(0, 0, 0, 255);
        matte.set(0, 0, 1, 255);
        matte.set(0, 0, 2, 254);
        let sel = select_from_matte(&matte, 3, 2).unwrap();
        assert_eq!(sel, vec![PixelCoord::new(2, 1)]);
    }

    #[test]
    fn wrong_matte_layout_is_rejected() {
        let gray = LdrImage::filled_gray(3, 2, 255);
        assert!(matches!(select_from_matte(&gray, 3, 2), Err(HdrError::Matte(_))));
        let rgb = LdrImage::new(2, 2, 3, vec![255; 12]);
        assert!(select_from_matte(&rgb, 3, 2).is_err());
    }
}
