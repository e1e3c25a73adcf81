//! Harris corner detection on small grid images.
//!
//! The pipeline the corner-detection sim walks through, kept explicit so
//! each stage can be inspected:
//!
//! 1. Sobel gradients over the interior, accumulated as the per-pixel
//!    products Ix², IxIy, Iy².
//! 2. The structure tensor M of a pixel: the 3×3 window sum of those
//!    products. Its eigenvalues separate flat regions (both small), edges
//!    (one large) and corners (both large).
//! 3. The Harris response R = det(M) − k·tr(M)², thresholded relative to
//!    the maximum response and cleaned up with 3×3 non-maximum suppression.

use crate::image::GridImage;
use crate::VisionError;

/// Per-pixel gradient products of an image.
#[derive(Debug, Clone)]
pub struct Gradients {
    size: usize,
    ixx: Vec<f32>,
    ixy: Vec<f32>,
    iyy: Vec<f32>,
}

impl Gradients {
    /// Grid dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    fn at(&self, row: usize, col: usize) -> (f32, f32, f32) {
        let i = row * self.size + col;
        (self.ixx[i], self.ixy[i], self.iyy[i])
    }

    fn at_clamped(&self, row: isize, col: isize) -> (f32, f32, f32) {
        let r = row.clamp(0, self.size as isize - 1) as usize;
        let c = col.clamp(0, self.size as isize - 1) as usize;
        self.at(r, c)
    }
}

/// The 2×2 local-gradient covariance of one pixel, summed over a 3×3 window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureTensor {
    /// Σ Ix².
    pub ixx: f32,
    /// Σ IxIy.
    pub ixy: f32,
    /// Σ Iy².
    pub iyy: f32,
}

impl StructureTensor {
    /// Eigenvalues of the tensor, (λ1, λ2) with λ1 ≥ λ2.
    ///
    /// The tensor is symmetric positive semi-definite, so a negative
    /// discriminant can only come from rounding; it is clamped to zero.
    pub fn eigenvalues(&self) -> (f32, f32) {
        let trace = self.ixx + self.iyy;
        let det = self.ixx * self.iyy - self.ixy * self.ixy;
        let discriminant = (trace * trace - 4.0 * det).max(0.0);
        let sqrt_d = discriminant.sqrt();
        let l1 = (trace + sqrt_d) / 2.0;
        let l2 = (trace - sqrt_d) / 2.0;
        (l1.max(l2), l1.min(l2))
    }

    /// det(M) − k·tr(M)².
    pub fn harris(&self, k: f32) -> f32 {
        let det = self.ixx * self.iyy - self.ixy * self.ixy;
        let trace = self.ixx + self.iyy;
        det - k * trace * trace
    }
}

/// A detected corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Row of the corner pixel.
    pub row: usize,
    /// Column of the corner pixel.
    pub col: usize,
    /// Harris response at the pixel.
    pub response: f32,
}

/// Sobel gradient products of an image, zero on the 1-pixel border.
///
/// An image without an interior (smaller than 3x3) has no gradients and
/// yields an all-zero map.
pub fn gradients(img: &GridImage) -> Gradients {
    let n = img.size();
    let mut g = Gradients {
        size: n,
        ixx: vec![0.0; n * n],
        ixy: vec![0.0; n * n],
        iyy: vec![0.0; n * n],
    };
    if n < 3 {
        return g;
    }

    for row in 1..n - 1 {
        for col in 1..n - 1 {
            let p = |dr: isize, dc: isize| img.get(
                (row as isize + dr) as usize,
                (col as isize + dc) as usize,
            );

            let ix = (-p(-1, -1) + p(-1, 1) - 2.0 * p(0, -1) + 2.0 * p(0, 1) - p(1, -1)
                + p(1, 1))
                / 8.0;
            let iy = (-p(-1, -1) - 2.0 * p(-1, 0) - p(-1, 1)
                + p(1, -1)
                + 2.0 * p(1, 0)
                + p(1, 1))
                / 8.0;

            let i = row * n + col;
            g.ixx[i] = ix * ix;
            g.ixy[i] = ix * iy;
            g.iyy[i] = iy * iy;
        }
    }
    g
}

/// Structure tensor at a pixel: 3×3 window sum with border clamping.
pub fn structure_tensor(grads: &Gradients, row: usize, col: usize) -> StructureTensor {
    let mut t = StructureTensor {
        ixx: 0.0,
        ixy: 0.0,
        iyy: 0.0,
    };
    if grads.size == 0 {
        return t;
    }
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            let (xx, xy, yy) = grads.at_clamped(row as isize + dr, col as isize + dc);
            t.ixx += xx;
            t.ixy += xy;
            t.iyy += yy;
        }
    }
    t
}

/// Harris response over the whole grid; the 2-pixel border is zero.
pub fn harris_response(grads: &Gradients, k: f32) -> Vec<f32> {
    let n = grads.size;
    let mut response = vec![0.0f32; n * n];
    if n < 5 {
        return response;
    }

    for row in 2..n - 2 {
        for col in 2..n - 2 {
            response[row * n + col] = structure_tensor(grads, row, col).harris(k);
        }
    }
    response
}

/// Threshold a response map relative to its maximum and keep strict 3×3
/// local maxima.
///
/// `rel_threshold` is the fraction of the peak response (the sim slider's
/// percentage divided by 100).
pub fn detect_corners(
    response: &[f32],
    size: usize,
    rel_threshold: f32,
) -> Result<Vec<Corner>, VisionError> {
    if response.len() != size * size {
        return Err(VisionError::GridSizeMismatch {
            expected: size,
            actual: response.len(),
        });
    }
    if size < 5 {
        return Ok(Vec::new());
    }

    let mut max_r = 0.0f32;
    for row in 2..size - 2 {
        for col in 2..size - 2 {
            max_r = max_r.max(response[row * size + col]);
        }
    }
    let threshold = max_r * rel_threshold;

    let mut corners = Vec::new();
    for row in 2..size - 2 {
        for col in 2..size - 2 {
            let r = response[row * size + col];
            if r < threshold {
                continue;
            }

            let mut is_max = true;
            'window: for dr in -1isize..=1 {
                for dc in -1isize..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let nr = (row as isize + dr) as usize;
                    let nc = (col as isize + dc) as usize;
                    if response[nr * size + nc] >= r {
                        is_max = false;
                        break 'window;
                    }
                }
            }

            if is_max {
                corners.push(Corner {
                    row,
                    col,
                    response: r,
                });
            }
        }
    }
    Ok(corners)
}
