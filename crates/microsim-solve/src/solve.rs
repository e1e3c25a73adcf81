//! Direct (non-stepwise) linear solve.

use crate::augmented::Augmented;
use crate::elimination::Elimination;
use crate::SolveError;

/// Solve the square system `A x = b` by Gaussian elimination with partial
/// pivoting and back substitution.
///
/// `a` is row-major n×n. Returns [`SolveError::Singular`] when some variable
/// has no usable pivot.
pub fn solve(a: &[f32], b: &[f32], n: usize) -> Result<Vec<f32>, SolveError> {
    let aug = Augmented::from_system(a, b, n)?;

    let sol = Elimination::new(aug).run();
    match sol.as_vec() {
        Some(x) => Ok(x),
        None => Err(SolveError::Singular),
    }
}
