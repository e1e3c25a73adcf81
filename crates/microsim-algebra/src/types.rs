//! Common error types for the algebra kernels.

use thiserror::Error;

/// Error types for the algebra kernels.
///
/// Numerical degeneracies (zero-length vectors, repeated eigenvalues) are
/// deliberately *not* errors; the solvers clamp and continue the way the
/// simulations do. Only misuse of the API surfaces here.
#[derive(Debug, Error)]
pub enum AlgebraError {
    /// Matrix data length does not match the declared dimension.
    #[error("expected a {expected}x{expected} matrix, got {actual} elements")]
    DimensionMismatch {
        /// Declared matrix dimension.
        expected: usize,
        /// Actual number of elements provided.
        actual: usize,
    },

    /// An operation was requested on an empty input.
    #[error("input must not be empty")]
    EmptyInput,

    /// A truncation rank larger than the decomposition supports.
    #[error("rank {requested} exceeds the {available} singular values available")]
    RankOutOfRange {
        /// Requested truncation rank.
        requested: usize,
        /// Number of singular triples held by the decomposition.
        available: usize,
    },
}
