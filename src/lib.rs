#![doc = include_str!("../README.md")]

// Public modules
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fusion;
pub mod image;
pub mod matte;
pub mod response;
pub mod stack;
pub mod types;
pub mod weighting;

// Numeric building blocks, public for tools and tests.
pub mod regression;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{HdrError, Result};
pub use crate::stack::{ExposureStack, StackInfo};
pub use crate::types::{ExposurePair, PixelCoord, PixelSample};

// Curve recovery.
pub use crate::response::{ResponseCurve, ResponseSolver, SolveOutput, SolverParams, UniformSampler};

// Radiance fusion.
pub use crate::fusion::{FusionOutput, FusionParams, FusionStrategy, RadianceFuser};

pub use crate::weighting::{WeightTable, WeightingFunc};

// Run reports returned alongside results.
pub use crate::diagnostics::{FusionReport, SolveReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hdr_calib::prelude::*;
///
/// # fn main() -> hdr_calib::Result<()> {
/// let stack: ExposureStack = [
///     ExposurePair::new("short.png", 1000.0),
///     ExposurePair::new("long.png", 4000.0),
/// ]
/// .into_iter()
/// .collect();
///
/// let solver = ResponseSolver::new(&stack, SolverParams::default());
/// let solved = solver.solve(&DiskImageSource, &mut UniformSampler::new(), false)?;
///
/// let info = stack.probe(&DiskImageSource)?;
/// let pixels = hdr_calib::matte::all_pixels(info.width, info.height);
/// let fuser = RadianceFuser::new(&stack, FusionParams::default());
/// let out = fuser.fuse(FusionStrategy::General(&solved.log_curve), &DiskImageSource, &pixels)?;
/// println!("bad pixels: {}", out.bad_pixels);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{DiskImageSource, ImageSource, MemoryImageSource};
    pub use crate::{
        ExposurePair, ExposureStack, FusionParams, FusionStrategy, RadianceFuser, ResponseCurve,
        ResponseSolver, SolverParams, UniformSampler,
    };
}
