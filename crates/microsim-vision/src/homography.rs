//! Planar homographies between quadrilaterals.
//!
//! The 4-point estimate is built from the closed-form projective map of the
//! unit square onto a quadrilateral: for source and destination quads the
//! full homography is the composition `H = H_dst · H_src⁻¹`. This is the
//! direct construction the homography demo uses instead of a least-squares
//! DLT, and it is exact for exactly four correspondences.
//!
//! Matrices are [`glam::Mat3`], column-major; points are homogenized as
//! `(x, y, 1)` and divided by the (ε-clamped) third coordinate on the way
//! out.

use glam::{Mat3, Vec2, Vec3};

use crate::{VisionError, EPS};

/// Classification of a homography by its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformClass {
    /// Rotation (+ translation): orthogonal upper 2×2, no scale or shear.
    Euclidean,
    /// Axis-aligned scaling (+ translation).
    Scale,
    /// General affine map: last row is (0, 0, 1) but the 2×2 block is free.
    Affine,
    /// Full projective map with perspective terms.
    Projective,
}

/// A 3×3 projective transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(Mat3);

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Mat3::IDENTITY);

    /// Wrap an existing matrix.
    pub fn from_matrix(m: Mat3) -> Self {
        Self(m)
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Mat3 {
        &self.0
    }

    /// The closed-form map of the unit square onto a quadrilateral.
    ///
    /// Corners are ordered counter-clockwise from the image of (0,0). A
    /// degenerate quad drives the construction determinant toward zero; it
    /// is clamped at [`EPS`] so the result stays finite (the demo keeps
    /// rendering a collapsed quad rather than failing).
    pub fn from_unit_square(quad: &[Vec2; 4]) -> Self {
        let [p0, p1, p2, p3] = *quad;

        let dx1 = p1.x - p2.x;
        let dx2 = p3.x - p2.x;
        let dx3 = p0.x - p1.x + p2.x - p3.x;

        let dy1 = p1.y - p2.y;
        let dy2 = p3.y - p2.y;
        let dy3 = p0.y - p1.y + p2.y - p3.y;

        let mut det = dx1 * dy2 - dy1 * dx2;
        if det.abs() < EPS {
            det = EPS;
        }

        let a13 = (dx3 * dy2 - dy3 * dx2) / det;
        let a23 = (dx1 * dy3 - dy1 * dx3) / det;

        let a11 = p1.x - p0.x + a13 * p1.x;
        let a21 = p3.x - p0.x + a23 * p3.x;
        let a31 = p0.x;

        let a12 = p1.y - p0.y + a13 * p1.y;
        let a22 = p3.y - p0.y + a23 * p3.y;
        let a32 = p0.y;

        Self(Mat3::from_cols(
            Vec3::new(a11, a12, a13),
            Vec3::new(a21, a22, a23),
            Vec3::new(a31, a32, 1.0),
        ))
    }

    /// The homography taking one quadrilateral onto another, from four
    /// corresponding corners.
    pub fn from_quad_to_quad(src: &[Vec2; 4], dst: &[Vec2; 4]) -> Result<Self, VisionError> {
        let h_src = Self::from_unit_square(src);
        let h_dst = Self::from_unit_square(dst);
        Ok(Self(h_dst.0 * h_src.inverse()?.0))
    }

    /// The inverse transform.
    pub fn inverse(&self) -> Result<Self, VisionError> {
        let det = self.0.determinant();
        if det.abs() < EPS {
            return Err(VisionError::SingularHomography(det));
        }
        Ok(Self(self.0.inverse()))
    }

    /// Apply to a point, with the projective division ε-clamped the way the
    /// demo clamps it (a point crossing the horizon stays finite).
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let h = self.0 * Vec3::new(p.x, p.y, 1.0);
        let mut w = h.z;
        if w.abs() < EPS {
            w = EPS;
        }
        Vec2::new(h.x / w, h.y / w)
    }

    /// Classify the transform from its (normalized) coefficients.
    pub fn classify(&self) -> TransformClass {
        let mut m = self.0;
        if m.z_axis.z.abs() > EPS {
            m *= 1.0 / m.z_axis.z;
        }

        // perspective terms live in the third row
        let is_affine = m.x_axis.z.abs() < 0.001 && m.y_axis.z.abs() < 0.001;
        let is_rotation =
            (m.x_axis.x - m.y_axis.y).abs() < 0.1 && (m.y_axis.x + m.x_axis.y).abs() < 0.1;
        let is_scale = m.y_axis.x.abs() < 0.01 && m.x_axis.y.abs() < 0.01;

        if !is_affine {
            TransformClass::Projective
        } else if is_rotation && is_scale {
            TransformClass::Euclidean
        } else if is_scale {
            TransformClass::Scale
        } else {
            TransformClass::Affine
        }
    }
}
