//! Serializable reports describing a solve or a fusion run.
//!
//! Reports are side-channel output: they never influence the curve or the
//! radiance map, the binaries only dump them as JSON when asked to.

pub mod report;
pub mod timing;

pub use report::{FusionReport, SolveReport};
pub use timing::{StageTiming, TimingBreakdown};
