//! Random choice of the pixel positions fed to the curve solve.
use crate::types::PixelCoord;
use nanorand::{Rng, WyRand};

/// Source of uniformly distributed integers in `[0, bound)`.
pub trait SampleSource {
    fn next_below(&mut self, bound: usize) -> usize;
}

/// `WyRand`-backed sampler; seed it for reproducible solves.
pub struct UniformSampler {
    rng: WyRand,
}

impl std::fmt::Debug for UniformSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformSampler").finish_non_exhaustive()
    }
}

impl UniformSampler {
    /// Sampler seeded from system entropy.
    pub fn new() -> Self {
        Self { rng: WyRand::new() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: WyRand::new_seed(seed),
        }
    }
}

impl Default for UniformSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for UniformSampler {
    #[inline]
    fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        self.rng.generate_range(0..bound)
    }
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn next_below(&mut self, bound: usize) -> usize {
        (**self).next_below(bound)
    }
}

/// Draw `count` positions uniformly (with replacement) over a `width × height` frame.
pub fn random_positions<S: SampleSource + ?Sized>(
    width: usize,
    height: usize,
    count: usize,
    source: &mut S,
) -> Vec<PixelCoord> {
    assert!(width > 0 && height > 0, "cannot sample an empty image");
    (0..count)
        .map(|_| {
            let x = source.next_below(width);
            let y = source.next_below(height);
            PixelCoord::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_stay_inside_the_frame() {
        let mut sampler = UniformSampler::seeded(7);
        let pts = random_positions(13, 5, 2000, &mut sampler);
        assert_eq!(pts.len(), 2000);
        assert!(pts.iter().all(|p| p.x < 13 && p.y < 5));
        // every column gets hit with this many draws
        for x in 0..13 {
            assert!(pts.iter().any(|p| p.x == x), "column {x} never sampled");
        }
    }

    #[test]
    fn same_seed_same_positions() {
        let a = random_positions(64, 48, 100, &mut UniformSampler::seeded(42));
        let b = random_positions(64, 48, 100, &mut UniformSampler::seeded(42));
        assert_eq!(a, b);
    }
}
