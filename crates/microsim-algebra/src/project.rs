//! Orthogonal projection helpers.

use glam::Vec3;

/// Projection of `v` onto the direction of the unit vector `onto`.
///
/// The caller is expected to pass a unit vector; no normalization happens
/// here because the Gram-Schmidt machine always projects onto columns it has
/// already normalized.
pub fn project_onto(v: Vec3, onto: Vec3) -> Vec3 {
    onto * v.dot(onto)
}

/// Orthogonal projection of `v` onto the subspace spanned by an orthonormal
/// basis.
pub fn project_onto_span(v: Vec3, basis: &[Vec3]) -> Vec3 {
    basis
        .iter()
        .fold(Vec3::ZERO, |acc, &q| acc + project_onto(v, q))
}
