//! Characteristic polynomials of 2×2 and 3×3 matrices.
//!
//! The polynomial is stored with coefficients ordered from the constant term
//! up, so `coeffs[i]` multiplies λⁱ. For a 2×2 matrix the polynomial is
//!
//! ```text
//! p(λ) = λ² − tr(A)·λ + det(A)
//! ```
//!
//! and for a 3×3 matrix
//!
//! ```text
//! p(λ) = −λ³ + tr(A)·λ² − m(A)·λ + det(A)
//! ```
//!
//! where m(A) is the sum of the three principal 2×2 minors. Real roots are
//! located numerically by a Newton-method scan over evenly spaced starting
//! points, which is robust enough for the well-conditioned teaching matrices
//! this crate targets.

use glam::{Mat2, Mat3};

/// Convergence tolerance for the Newton step size.
const NEWTON_STEP_TOL: f32 = 1e-8;
/// Residual bound for accepting a converged point as a root.
const ROOT_RESIDUAL_TOL: f32 = 0.01;
/// Two roots closer than this are considered the same root.
const ROOT_DEDUP_TOL: f32 = 0.01;

/// A polynomial with real coefficients, constant term first.
#[derive(Debug, Clone, PartialEq)]
pub struct CharPoly {
    coeffs: Vec<f32>,
}

impl CharPoly {
    /// Characteristic polynomial of a 2×2 matrix.
    pub fn of_mat2(m: &Mat2) -> Self {
        Self {
            coeffs: vec![m.determinant(), -trace2(m), 1.0],
        }
    }

    /// Characteristic polynomial of a 3×3 matrix.
    pub fn of_mat3(m: &Mat3) -> Self {
        let trace = m.x_axis.x + m.y_axis.y + m.z_axis.z;
        let minor_sum = (m.x_axis.x * m.y_axis.y - m.y_axis.x * m.x_axis.y)
            + (m.x_axis.x * m.z_axis.z - m.z_axis.x * m.x_axis.z)
            + (m.y_axis.y * m.z_axis.z - m.z_axis.y * m.y_axis.z);
        Self {
            coeffs: vec![m.determinant(), -minor_sum, trace, -1.0],
        }
    }

    /// The coefficients, constant term first.
    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }

    /// Evaluate p(λ) by Horner's rule.
    pub fn eval(&self, lambda: f32) -> f32 {
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * lambda + c)
    }

    /// Evaluate the derivative p′(λ).
    pub fn eval_derivative(&self, lambda: f32) -> f32 {
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (i, &c)| acc * lambda + i as f32 * c)
    }

    /// All distinct real roots found by a Newton scan over [-10, 10).
    ///
    /// Roots are returned in descending order, at most `degree` of them.
    /// Starting points where the derivative vanishes or Newton fails to
    /// converge are skipped silently; complex roots are never reported.
    pub fn real_roots(&self) -> Vec<f32> {
        let degree = self.coeffs.len().saturating_sub(1);
        let mut roots: Vec<f32> = Vec::new();

        let mut start = -10.0f32;
        while start < 10.0 {
            if let Some(root) = self.newton(start) {
                if !roots.iter().any(|r| (r - root).abs() < ROOT_DEDUP_TOL) {
                    roots.push(root);
                }
            }
            start += 0.5;
        }

        roots.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        roots.truncate(degree);
        roots
    }

    fn newton(&self, x0: f32) -> Option<f32> {
        let mut x = x0;
        for _ in 0..50 {
            let fx = self.eval(x);
            let fpx = self.eval_derivative(x);
            if fpx.abs() < 1e-10 {
                return None;
            }
            let x_new = x - fx / fpx;
            if (x_new - x).abs() < NEWTON_STEP_TOL {
                if self.eval(x_new).abs() < ROOT_RESIDUAL_TOL {
                    return Some(x_new);
                }
                return None;
            }
            x = x_new;
        }
        None
    }
}

pub(crate) fn trace2(m: &Mat2) -> f32 {
    m.x_axis.x + m.y_axis.y
}
