/// Borrowed view of an interleaved 8-bit image.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub stride: usize, // samples between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view (`stride == w * channels`).
    pub fn packed(w: usize, h: usize, channels: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            channels,
            stride: w * channels,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[y * self.stride + x * self.channels + channel]
    }

    /// All channel samples of one pixel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = y * self.stride + x * self.channels;
        &self.data[start..start + self.channels]
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * self.channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn interleaved_access_picks_the_requested_channel() {
        // 2x1 RGB
        let data = [1u8, 2, 3, 4, 5, 6];
        let img = ImageU8::packed(2, 1, 3, &data);
        assert_eq!(img.get(1, 0, 0), 4);
        assert_eq!(img.get(0, 0, 2), 3);
        assert_eq!(img.pixel(1, 0), &[4, 5, 6]);
        assert_eq!(img.row(0).len(), 6);
        assert!(img.is_contiguous());
    }
}
