#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod harris;
mod homography;
mod image;

pub use harris::{
    detect_corners, gradients, harris_response, structure_tensor, Corner, Gradients,
    StructureTensor,
};
pub use homography::{Homography, TransformClass};
pub use image::{GridImage, TestPattern};

use thiserror::Error;

/// Small-magnitude clamp shared by the projective routines.
pub const EPS: f32 = 1e-4;

/// Error types for the vision kernels.
#[derive(Debug, Error)]
pub enum VisionError {
    /// A homography could not be inverted.
    #[error("homography is singular (determinant {0})")]
    SingularHomography(f32),

    /// Response buffer length does not match the declared grid size.
    #[error("expected a {expected}x{expected} grid, got {actual} elements")]
    GridSizeMismatch {
        /// Declared grid dimension.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },
}
