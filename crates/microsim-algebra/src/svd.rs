//! Toy singular value decomposition of small square matrices.
//!
//! Singular triples are extracted one at a time: power iteration with
//! alternating `u = A·v` / `v = Aᵀ·u` normalization sweeps finds the dominant
//! pair, then the matrix is deflated by `A ← A − σ·u·vᵀ` and the process
//! repeats. This is the textbook educational scheme the image-compression
//! sims animate; it is not meant to compete with a production SVD, but on
//! the 16×16 grids those sims use it recovers the spectrum to display
//! precision and makes the deflation step visible.
//!
//! Matrices are row-major `&[f32]` slices of length n².

use rand::Rng;

use crate::types::AlgebraError;
use crate::EPS;

/// Power-iteration sweeps per singular triple.
const SWEEPS: usize = 50;

/// Result of the toy SVD: σ values with their left/right unit vectors.
#[derive(Debug, Clone)]
pub struct Svd {
    n: usize,
    singular_values: Vec<f32>,
    u: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

/// Decompose a row-major n×n matrix.
///
/// The starting vector of each power iteration is random, so callers pass
/// their own (typically seeded) RNG for reproducibility. Singular values
/// come out non-negative and (up to iteration accuracy) non-increasing.
pub fn svd(a: &[f32], n: usize, rng: &mut impl Rng) -> Result<Svd, AlgebraError> {
    if n == 0 {
        return Err(AlgebraError::EmptyInput);
    }
    if a.len() != n * n {
        return Err(AlgebraError::DimensionMismatch {
            expected: n,
            actual: a.len(),
        });
    }

    let mut work = a.to_vec();
    let mut singular_values = Vec::with_capacity(n);
    let mut us = Vec::with_capacity(n);
    let mut vs = Vec::with_capacity(n);

    for _ in 0..n {
        let mut v: Vec<f32> = (0..n).map(|_| rng.random::<f32>()).collect();
        normalize(&mut v);

        for _ in 0..SWEEPS {
            let mut u = mat_vec(&work, n, &v);
            if !normalize(&mut u) {
                break;
            }
            v = mat_t_vec(&work, n, &u);
            if !normalize(&mut v) {
                break;
            }
        }

        let av = mat_vec(&work, n, &v);
        let sigma = av.iter().map(|x| x * x).sum::<f32>().sqrt();

        let u: Vec<f32> = if sigma > EPS {
            av.iter().map(|x| x / sigma).collect()
        } else {
            vec![0.0; n]
        };

        // deflate: A <- A - sigma * u * v^T
        for i in 0..n {
            for j in 0..n {
                work[i * n + j] -= sigma * u[i] * v[j];
            }
        }

        singular_values.push(sigma);
        us.push(u);
        vs.push(v);
    }

    Ok(Svd {
        n,
        singular_values,
        u: us,
        v: vs,
    })
}

impl Svd {
    /// Matrix dimension.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The singular values, dominant first.
    pub fn singular_values(&self) -> &[f32] {
        &self.singular_values
    }

    /// The k-th left singular vector.
    pub fn left_vector(&self, k: usize) -> &[f32] {
        &self.u[k]
    }

    /// The k-th right singular vector.
    pub fn right_vector(&self, k: usize) -> &[f32] {
        &self.v[k]
    }

    /// Rank-`rank` truncated reconstruction Σ σₖ·uₖ·vₖᵀ, row-major.
    pub fn reconstruct(&self, rank: usize) -> Result<Vec<f32>, AlgebraError> {
        if rank > self.singular_values.len() {
            return Err(AlgebraError::RankOutOfRange {
                requested: rank,
                available: self.singular_values.len(),
            });
        }

        let n = self.n;
        let mut out = vec![0.0f32; n * n];
        for k in 0..rank {
            let sigma = self.singular_values[k];
            for i in 0..n {
                for j in 0..n {
                    out[i * n + j] += sigma * self.u[k][i] * self.v[k][j];
                }
            }
        }
        Ok(out)
    }

    /// Frobenius-norm error of the rank-`rank` reconstruction against the
    /// original matrix.
    pub fn reconstruction_error(&self, a: &[f32], rank: usize) -> Result<f32, AlgebraError> {
        if a.len() != self.n * self.n {
            return Err(AlgebraError::DimensionMismatch {
                expected: self.n,
                actual: a.len(),
            });
        }
        let rec = self.reconstruct(rank)?;
        Ok(a.iter()
            .zip(rec.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt())
    }

    /// Fraction of squared singular-value mass captured by the first `rank`
    /// values, in [0, 1]. This is the scree-plot "energy" curve.
    pub fn energy(&self, rank: usize) -> f32 {
        let total: f32 = self.singular_values.iter().map(|s| s * s).sum();
        if total < EPS {
            return 1.0;
        }
        let kept: f32 = self
            .singular_values
            .iter()
            .take(rank)
            .map(|s| s * s)
            .sum();
        kept / total
    }
}

fn mat_vec(a: &[f32], n: usize, x: &[f32]) -> Vec<f32> {
    (0..n)
        .map(|i| (0..n).map(|j| a[i * n + j] * x[j]).sum())
        .collect()
}

fn mat_t_vec(a: &[f32], n: usize, x: &[f32]) -> Vec<f32> {
    (0..n)
        .map(|j| (0..n).map(|i| a[i * n + j] * x[i]).sum())
        .collect()
}

/// Normalize in place; returns false (leaving the input unchanged) when the
/// norm is below tolerance.
fn normalize(x: &mut [f32]) -> bool {
    let norm = x.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm < EPS {
        return false;
    }
    for v in x.iter_mut() {
        *v /= norm;
    }
    true
}
