#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod charpoly;
mod eigen;
mod gram_schmidt;
mod power;
mod project;
mod svd;
mod types;

pub use charpoly::CharPoly;
pub use eigen::{eigen2, eigen3, Eigen2, EigenPair2};
pub use gram_schmidt::{orthonormalize, GramSchmidt, GramSchmidtStatus, Phase, REntry};
pub use power::PowerIteration;
pub use project::{project_onto, project_onto_span};
pub use svd::{svd, Svd};
pub use types::AlgebraError;

/// Zero threshold shared by the closed-form solvers.
///
/// Matches the clamping the routines apply instead of reporting errors:
/// magnitudes below this are treated as degenerate and handled inline.
pub const EPS: f32 = 1e-4;
