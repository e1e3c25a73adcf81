//! Row-major augmented matrix storage.

use crate::SolveError;

/// An augmented matrix `[A | b]`, row-major, with the right-hand side in the
/// last column.
#[derive(Debug, Clone, PartialEq)]
pub struct Augmented {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Augmented {
    /// Build from row-major data; `cols` counts the augmented column.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self, SolveError> {
        if data.len() != rows * cols {
            return Err(SolveError::BadShape {
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from a square coefficient matrix and a right-hand side.
    pub fn from_system(a: &[f32], b: &[f32], n: usize) -> Result<Self, SolveError> {
        if a.len() != n * n {
            return Err(SolveError::BadShape {
                rows: n,
                cols: n,
                actual: a.len(),
            });
        }
        if b.len() != n {
            return Err(SolveError::RhsMismatch { rows: n, rhs: b.len() });
        }

        let mut data = Vec::with_capacity(n * (n + 1));
        for i in 0..n {
            data.extend_from_slice(&a[i * n..(i + 1) * n]);
            data.push(b[i]);
        }
        Ok(Self {
            data,
            rows: n,
            cols: n + 1,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, augmented column included.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of unknowns (columns excluding the right-hand side).
    pub fn unknowns(&self) -> usize {
        self.cols - 1
    }

    /// Element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Add `factor` times row `src` to row `dst`.
    pub(crate) fn add_scaled_row(&mut self, dst: usize, src: usize, factor: f32) {
        for j in 0..self.cols {
            let v = self.get(src, j) * factor;
            self.data[dst * self.cols + j] += v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_system_layout() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0];
        let aug = Augmented::from_system(&a, &b, 2).unwrap();
        assert_eq!(aug.row(0), &[1.0, 2.0, 5.0]);
        assert_eq!(aug.row(1), &[3.0, 4.0, 6.0]);
        assert_eq!(aug.unknowns(), 2);
    }

    #[test]
    fn test_bad_shape_rejected() {
        assert!(Augmented::new(vec![1.0; 5], 2, 3).is_err());
        assert!(Augmented::from_system(&[1.0; 4], &[1.0; 3], 2).is_err());
    }

    #[test]
    fn test_swap_and_scale() {
        let mut aug = Augmented::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        aug.swap_rows(0, 1);
        assert_eq!(aug.row(0), &[4.0, 5.0, 6.0]);
        aug.add_scaled_row(1, 0, -0.25);
        assert_eq!(aug.row(1), &[0.0, 0.75, 1.5]);
    }
}
