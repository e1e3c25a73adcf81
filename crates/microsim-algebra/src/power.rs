//! Power iteration on 2×2 matrices, one step at a time.
//!
//! Keeps the per-iteration history the visualizations plot: the unit vector
//! after every multiply-and-normalize step and the current Rayleigh-quotient
//! eigenvalue estimate.

use glam::{Mat2, Vec2};

use crate::EPS;

/// Default iteration cap, matching the sim's slider maximum.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Stepwise power iteration for the dominant eigenpair of a 2×2 matrix.
#[derive(Debug, Clone)]
pub struct PowerIteration {
    matrix: Mat2,
    vector: Vec2,
    rayleigh: f32,
    iteration: usize,
    max_iterations: usize,
    history: Vec<Vec2>,
}

impl PowerIteration {
    /// Start a new iteration from the given (not necessarily unit) vector.
    pub fn new(matrix: Mat2, initial: Vec2) -> Self {
        let start = initial.normalize_or_zero();
        Self {
            matrix,
            vector: start,
            rayleigh: 0.0,
            iteration: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            history: vec![start],
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// The current iterate, a unit vector.
    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    /// Current Rayleigh-quotient estimate of the dominant eigenvalue.
    pub fn rayleigh(&self) -> f32 {
        self.rayleigh
    }

    /// Number of steps taken so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Every iterate produced so far, starting vector included.
    pub fn history(&self) -> &[Vec2] {
        &self.history
    }

    /// One multiply-and-normalize step.
    ///
    /// Returns `false` when the iteration cap has been reached and nothing
    /// was done. A collapse to the zero vector (possible only when the
    /// matrix itself is degenerate) keeps the previous iterate.
    pub fn step(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            return false;
        }

        let y = self.matrix * self.vector;
        let mag = y.length();
        if mag > EPS {
            self.vector = y / mag;
        }

        let ax = self.matrix * self.vector;
        let xt_ax = self.vector.dot(ax);
        let xt_x = self.vector.length_squared();
        self.rayleigh = xt_ax / xt_x;

        self.iteration += 1;
        self.history.push(self.vector);
        true
    }

    /// Run up to `n` steps, stopping early at the iteration cap.
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            if !self.step() {
                break;
            }
        }
    }

    /// Angle in degrees between the current iterate and a reference
    /// direction, sign-insensitive (an eigenvector and its negation are the
    /// same direction). Returns 90 when either vector is degenerate.
    pub fn angle_error_deg(&self, reference: Vec2) -> f32 {
        let ref_mag = reference.length();
        if ref_mag < 0.01 {
            return 90.0;
        }
        let v_mag = self.vector.length();
        if v_mag < 0.01 {
            return 90.0;
        }

        let dot = (self.vector / v_mag).dot(reference / ref_mag).abs();
        dot.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eigen2, Eigen2};
    use approx::assert_relative_eq;

    #[test]
    fn test_converges_to_dominant_eigenpair() {
        let m = Mat2::from_cols_array(&[2.0, 1.0, 1.0, 2.0]);
        let mut it = PowerIteration::new(m, Vec2::new(1.0, 0.3));
        it.run(30);

        assert_relative_eq!(it.rayleigh(), 3.0, epsilon = 1e-4);

        let Eigen2::Real(pairs) = eigen2(&m) else {
            panic!("symmetric matrix must have real eigenpairs");
        };
        assert!(it.angle_error_deg(pairs[0].vector) < 0.1);
    }

    #[test]
    fn test_iterates_stay_unit_length() {
        let m = Mat2::from_cols_array(&[3.0, 0.5, 0.5, 1.0]);
        let mut it = PowerIteration::new(m, Vec2::X);
        it.run(10);
        for v in it.history() {
            assert_relative_eq!(v.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_iteration_cap() {
        let m = Mat2::IDENTITY;
        let mut it = PowerIteration::new(m, Vec2::X).with_max_iterations(3);
        it.run(10);
        assert_eq!(it.iteration(), 3);
        assert!(!it.step());
        assert_eq!(it.history().len(), 4);
    }

    #[test]
    fn test_angle_error_sign_insensitive() {
        let m = Mat2::from_cols_array(&[2.0, 1.0, 1.0, 2.0]);
        let mut it = PowerIteration::new(m, Vec2::new(0.2, 1.0));
        it.run(30);
        let Eigen2::Real(pairs) = eigen2(&m) else {
            panic!("symmetric matrix must have real eigenpairs");
        };
        let err_pos = it.angle_error_deg(pairs[0].vector);
        let err_neg = it.angle_error_deg(-pairs[0].vector);
        assert_relative_eq!(err_pos, err_neg, epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_reference_is_90_degrees() {
        let it = PowerIteration::new(Mat2::IDENTITY, Vec2::X);
        assert_relative_eq!(it.angle_error_deg(Vec2::ZERO), 90.0);
    }
}
