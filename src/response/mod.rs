//! Response-curve recovery.
//!
//! - [`curve`] – the 256-entry [`ResponseCurve`] table, its text format and
//!   the linear generator.
//! - [`sampling`] – injected randomness choosing the sampled positions.
//! - [`system`] – assembly and SVD solve of the regularized least-squares
//!   system.
//! - [`solver`] – [`ResponseSolver`] tying the above to an exposure stack.

pub mod curve;
pub mod sampling;
pub mod solver;
pub mod system;

pub use curve::ResponseCurve;
pub use sampling::{random_positions, SampleSource, UniformSampler};
pub use solver::{ResponseSolver, SolveOutput, SolverParams};
pub use system::{LinearSystem, SystemBuilder, SystemSolution, ANCHOR_INDEX, ANCHOR_VALUE};
