#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod augmented;
mod classify;
mod elimination;
mod solve;

pub use augmented::Augmented;
pub use classify::{classify, SystemClass};
pub use elimination::{Elimination, EliminationPhase, ForwardStep, Solution};
pub use solve::solve;

use thiserror::Error;

/// Pivot zero threshold used throughout the elimination routines.
pub const PIVOT_EPS: f32 = 1e-4;

/// Error types for the linear-system solvers.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Augmented matrix data does not match the declared shape.
    #[error("matrix data has {actual} elements, expected {rows} rows x {cols} cols")]
    BadShape {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
        /// Actual element count.
        actual: usize,
    },

    /// Right-hand side length does not match the coefficient matrix.
    #[error("right-hand side has {rhs} entries for a {rows}-row system")]
    RhsMismatch {
        /// Coefficient matrix row count.
        rows: usize,
        /// Right-hand side length.
        rhs: usize,
    },

    /// The system has no usable pivot for some variable.
    #[error("matrix is singular to working precision")]
    Singular,
}
