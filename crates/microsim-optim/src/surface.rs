//! Fixed 2D loss surfaces with analytic gradients and Hessians.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

/// The selectable loss landscapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossSurface {
    /// f(θ) = θ₁² + θ₂².
    QuadraticBowl,
    /// The banana valley (a−θ₁)² + b(θ₂−θ₁²)² with a = 1, b = 5. The mild
    /// b keeps the valley walkable at the default learning rate.
    Rosenbrock,
    /// θ₁² − θ₂² + θ₂⁴/20, a saddle at the origin with distant minima in
    /// the θ₂ direction.
    Saddle,
}

const ROSENBROCK_A: f32 = 1.0;
const ROSENBROCK_B: f32 = 5.0;

impl LossSurface {
    /// Evaluate the loss at `theta`.
    pub fn loss(&self, theta: Vec2) -> f32 {
        let (t1, t2) = (theta.x, theta.y);
        match self {
            LossSurface::QuadraticBowl => t1 * t1 + t2 * t2,
            LossSurface::Rosenbrock => {
                let inner = t2 - t1 * t1;
                (ROSENBROCK_A - t1) * (ROSENBROCK_A - t1) + ROSENBROCK_B * inner * inner
            }
            LossSurface::Saddle => t1 * t1 - t2 * t2 + 0.5 * t2 * t2 * t2 * t2 / 10.0,
        }
    }

    /// Analytic gradient at `theta`.
    pub fn gradient(&self, theta: Vec2) -> Vec2 {
        let (t1, t2) = (theta.x, theta.y);
        match self {
            LossSurface::QuadraticBowl => Vec2::new(2.0 * t1, 2.0 * t2),
            LossSurface::Rosenbrock => {
                let inner = t2 - t1 * t1;
                Vec2::new(
                    -2.0 * (ROSENBROCK_A - t1) - 4.0 * ROSENBROCK_B * t1 * inner,
                    2.0 * ROSENBROCK_B * inner,
                )
            }
            LossSurface::Saddle => {
                Vec2::new(2.0 * t1, -2.0 * t2 + 2.0 * t2 * t2 * t2 / 10.0)
            }
        }
    }

    /// Analytic Hessian at `theta`.
    pub fn hessian(&self, theta: Vec2) -> Mat2 {
        let (t1, t2) = (theta.x, theta.y);
        match self {
            LossSurface::QuadraticBowl => Mat2::from_diagonal(Vec2::splat(2.0)),
            LossSurface::Rosenbrock => {
                let b = ROSENBROCK_B;
                let h11 = 2.0 - 4.0 * b * (t2 - t1 * t1) + 8.0 * b * t1 * t1;
                let h12 = -4.0 * b * t1;
                Mat2::from_cols(Vec2::new(h11, h12), Vec2::new(h12, 2.0 * b))
            }
            LossSurface::Saddle => {
                Mat2::from_diagonal(Vec2::new(2.0, -2.0 + 0.6 * t2 * t2))
            }
        }
    }

    /// The displayed minimum (for the saddle this is the stationary point
    /// at the origin rather than a true minimum).
    pub fn minimum(&self) -> Vec2 {
        match self {
            LossSurface::QuadraticBowl | LossSurface::Saddle => Vec2::ZERO,
            LossSurface::Rosenbrock => Vec2::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SURFACES: [LossSurface; 3] = [
        LossSurface::QuadraticBowl,
        LossSurface::Rosenbrock,
        LossSurface::Saddle,
    ];

    /// Central-difference check of the analytic gradient.
    fn verify_gradient(surface: LossSurface, theta: Vec2) {
        let h = 1e-3;
        let grad = surface.gradient(theta);
        let num_x = (surface.loss(theta + Vec2::new(h, 0.0))
            - surface.loss(theta - Vec2::new(h, 0.0)))
            / (2.0 * h);
        let num_y = (surface.loss(theta + Vec2::new(0.0, h))
            - surface.loss(theta - Vec2::new(0.0, h)))
            / (2.0 * h);
        assert_relative_eq!(grad.x, num_x, epsilon = 1e-2, max_relative = 1e-2);
        assert_relative_eq!(grad.y, num_y, epsilon = 1e-2, max_relative = 1e-2);
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        for surface in SURFACES {
            verify_gradient(surface, Vec2::new(-2.0, 2.0));
            verify_gradient(surface, Vec2::new(0.5, -1.5));
        }
    }

    #[test]
    fn test_gradient_vanishes_at_stationary_point() {
        for surface in SURFACES {
            let g = surface.gradient(surface.minimum());
            assert_relative_eq!(g.length(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rosenbrock_minimum_value() {
        assert_relative_eq!(LossSurface::Rosenbrock.loss(Vec2::ONE), 0.0);
    }

    #[test]
    fn test_saddle_hessian_indefinite_at_origin() {
        let h = LossSurface::Saddle.hessian(Vec2::ZERO);
        assert!(h.x_axis.x > 0.0);
        assert!(h.y_axis.y < 0.0);
    }
}
