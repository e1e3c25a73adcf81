//! Newton's method run alongside gradient descent for comparison.
//!
//! On a quadratic surface the Newton update θ ← θ − H⁻¹∇L lands on the
//! stationary point in a single step, which is the whole teaching point.
//! Where the Hessian is not positive definite (the saddle, parts of the
//! banana valley) the update falls back to a plain gradient step so the
//! iterate keeps descending instead of jumping toward the saddle.

use glam::{Mat2, Vec2};

use crate::descent::DescentConfig;
use crate::surface::LossSurface;

/// A Newton's-method run with the same stepwise interface as
/// [`crate::GradientDescent`].
#[derive(Debug, Clone)]
pub struct NewtonDescent {
    surface: LossSurface,
    config: DescentConfig,
    theta: Vec2,
    path: Vec<Vec2>,
    iteration: usize,
    converged: bool,
}

impl NewtonDescent {
    /// Start a run at `start`.
    pub fn new(surface: LossSurface, start: Vec2, config: DescentConfig) -> Self {
        Self {
            surface,
            config,
            theta: start,
            path: vec![start],
            iteration: 0,
            converged: false,
        }
    }

    /// One Newton step, or a gradient step where the Hessian is not
    /// positive definite. Returns false once converged.
    pub fn step(&mut self) -> bool {
        if self.converged {
            return false;
        }

        let grad = self.surface.gradient(self.theta);
        let hessian = self.surface.hessian(self.theta);

        let delta = if positive_definite(&hessian) {
            hessian.inverse() * grad
        } else {
            grad * self.config.learning_rate
        };

        self.theta -= delta;
        self.theta = self.theta.clamp(
            Vec2::splat(-self.config.bound),
            Vec2::splat(self.config.bound),
        );
        self.iteration += 1;
        self.path.push(self.theta);
        if self.path.len() > self.config.max_history {
            self.path.remove(0);
        }

        if self.surface.gradient(self.theta).length() < self.config.convergence_threshold {
            self.converged = true;
        }
        !self.converged
    }

    /// Step until convergence or `max_steps` iterations.
    pub fn run(&mut self, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            if !self.step() {
                break;
            }
        }
        self.converged
    }

    /// Current parameters.
    pub fn theta(&self) -> Vec2 {
        self.theta
    }

    /// Trajectory so far.
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Steps taken so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Whether the gradient has fallen below the threshold.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Sylvester's criterion for a symmetric 2x2 matrix.
fn positive_definite(h: &Mat2) -> bool {
    h.x_axis.x > 0.0 && h.determinant() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GradientDescent;

    #[test]
    fn test_one_step_on_quadratic_bowl() {
        let mut newton = NewtonDescent::new(
            LossSurface::QuadraticBowl,
            Vec2::new(-2.0, 2.0),
            DescentConfig::default(),
        );
        newton.step();
        assert!(newton.theta().length() < 1e-5);
        assert_eq!(newton.iteration(), 1);
    }

    #[test]
    fn test_beats_gradient_descent_on_bowl() {
        let start = Vec2::new(-2.0, 2.0);
        let mut newton =
            NewtonDescent::new(LossSurface::QuadraticBowl, start, DescentConfig::default());
        let mut gd =
            GradientDescent::new(LossSurface::QuadraticBowl, start, DescentConfig::default());
        newton.run(100);
        gd.run(100);
        assert!(newton.converged());
        assert!(newton.iteration() < gd.iteration());
    }

    #[test]
    fn test_saddle_falls_back_to_gradient_step() {
        // Hessian at the start is indefinite, so the update must descend
        let start = Vec2::new(0.5, 0.5);
        let mut newton =
            NewtonDescent::new(LossSurface::Saddle, start, DescentConfig::default());
        let before = LossSurface::Saddle.loss(start);
        newton.step();
        assert!(LossSurface::Saddle.loss(newton.theta()) < before);
    }

    #[test]
    fn test_converges_on_rosenbrock() {
        let mut newton = NewtonDescent::new(
            LossSurface::Rosenbrock,
            Vec2::new(-2.0, 2.0),
            DescentConfig::default(),
        );
        assert!(newton.run(200));
        assert!(newton.theta().distance(Vec2::ONE) < 1e-2);
    }
}
