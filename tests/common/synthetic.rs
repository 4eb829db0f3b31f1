use hdr_calib::image::{LdrImage, MemoryImageSource};
use hdr_calib::{ExposurePair, ExposureStack};

pub const WIDTH: usize = 16;
pub const HEIGHT: usize = 16;
pub const TIMES: [f64; 3] = [1.0, 2.0, 4.0];

/// Scene radiance in `1..=63`, so `radiance * 4` stays below saturation.
pub fn radiance(x: usize, y: usize) -> f64 {
    1.0 + ((x + WIDTH * y) % 63) as f64
}

/// Linear sensor: `z = min(255, E t)`.
pub fn expose(time: f64) -> LdrImage {
    expose_with(time, radiance)
}

pub fn expose_with(time: f64, scene: impl Fn(usize, usize) -> f64) -> LdrImage {
    let mut data = Vec::with_capacity(WIDTH * HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            data.push((scene(x, y) * time).round().min(255.0) as u8);
        }
    }
    LdrImage::new(WIDTH, HEIGHT, 1, data)
}

pub fn image_name(time: f64) -> String {
    format!("t{time}.png")
}

pub fn stack() -> ExposureStack {
    TIMES
        .iter()
        .map(|&t| ExposurePair::new(image_name(t), t))
        .collect()
}

/// In-memory images of [`stack`], with `tweak` applied to each one.
pub fn images_with(mut tweak: impl FnMut(f64, &mut LdrImage)) -> MemoryImageSource {
    let mut images = MemoryImageSource::new();
    for &t in &TIMES {
        let mut img = expose(t);
        tweak(t, &mut img);
        images.insert(image_name(t), img);
    }
    images
}

pub fn images() -> MemoryImageSource {
    images_with(|_, _| {})
}
