//! Closed-form eigenvalue and eigenvector solvers for 2×2 and 3×3 matrices.
//!
//! The 2×2 case is solved exactly from the trace/determinant discriminant.
//! Eigenvectors come from the null-space recipe the teaching sims use: for an
//! eigenvalue λ of `[[a, b], [c, d]]` the vector `(b, λ − a)` lies in the
//! eigenspace whenever `b` is non-negligible, with the second-row solution
//! `(λ − d, c)` and axis-aligned fallbacks otherwise. The 3×3 case reports the real roots of the characteristic
//! polynomial (see [`crate::CharPoly`]); eigenvectors in 3D are left to the
//! caller since the sims only display the spectrum.

use glam::{Mat2, Mat3, Vec2};

use crate::charpoly::{trace2, CharPoly};
use crate::EPS;

/// One real eigenpair of a 2×2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair2 {
    /// The eigenvalue.
    pub value: f32,
    /// A unit eigenvector.
    pub vector: Vec2,
}

/// Eigen-decomposition of a 2×2 matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Eigen2 {
    /// Two real eigenpairs, dominant (largest |λ|) first.
    Real([EigenPair2; 2]),
    /// A complex-conjugate pair re ± i·im.
    Complex {
        /// Real part shared by both eigenvalues.
        re: f32,
        /// Imaginary magnitude, positive.
        im: f32,
    },
}

/// Eigen-decomposition of a 2×2 matrix, closed form.
///
/// Real eigenpairs are sorted by absolute eigenvalue so the dominant pair
/// comes first (the convention the power-iteration sim compares against).
/// For symmetric input the two eigenvectors are orthogonal.
pub fn eigen2(m: &Mat2) -> Eigen2 {
    let trace = trace2(m);
    let det = m.determinant();
    let discriminant = trace * trace - 4.0 * det;

    if discriminant < 0.0 {
        return Eigen2::Complex {
            re: trace / 2.0,
            im: (-discriminant).sqrt() / 2.0,
        };
    }

    let sqrt_d = discriminant.sqrt();
    let lambda1 = (trace + sqrt_d) / 2.0;
    let lambda2 = (trace - sqrt_d) / 2.0;

    let (dominant, minor) = if lambda1.abs() >= lambda2.abs() {
        (lambda1, lambda2)
    } else {
        (lambda2, lambda1)
    };

    Eigen2::Real([
        EigenPair2 {
            value: dominant,
            vector: eigenvector2(m, dominant),
        },
        EigenPair2 {
            value: minor,
            vector: eigenvector2(m, minor),
        },
    ])
}

/// A unit eigenvector of a 2×2 matrix for the given eigenvalue.
fn eigenvector2(m: &Mat2, lambda: f32) -> Vec2 {
    let a = m.x_axis.x;
    let c = m.x_axis.y;
    let b = m.y_axis.x;
    let d = m.y_axis.y;

    // Solve the first row of (A - λI)v = 0 when it constrains v, otherwise
    // the second row, otherwise any vector works.
    let v = if b.abs() > EPS {
        Vec2::new(b, lambda - a)
    } else if (a - lambda).abs() > EPS {
        Vec2::Y
    } else if c.abs() > EPS {
        Vec2::new(lambda - d, c)
    } else {
        Vec2::X
    };

    let mag = v.length();
    if mag > EPS {
        v / mag
    } else {
        v
    }
}

/// Real eigenvalues of a 3×3 matrix, descending.
///
/// Located numerically on the characteristic polynomial; a matrix with one
/// real and two complex eigenvalues yields a single entry.
pub fn eigen3(m: &Mat3) -> Vec<f32> {
    CharPoly::of_mat3(m).real_roots()
}
