//! Stepwise gradient descent with the path and loss history the
//! visualization reads.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::LossSurface;

/// Descent parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescentConfig {
    /// Step size α.
    pub learning_rate: f32,
    /// Descent stops once the gradient magnitude falls below this.
    pub convergence_threshold: f32,
    /// Parameters are clamped to ±bound after each step.
    pub bound: f32,
    /// Oldest path and loss entries are dropped past this length.
    pub max_history: usize,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            convergence_threshold: 1e-4,
            bound: 3.0,
            max_history: 200,
        }
    }
}

/// Map a log-scale slider notch to a learning rate, one decade per ten
/// notches: v = 0 gives 1.0, v = -10 gives 0.1, v = -30 gives 0.001.
pub fn learning_rate_from_slider(v: i32) -> f32 {
    10.0f32.powf(v as f32 / 10.0)
}

/// One gradient-descent run advanced a step at a time.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    surface: LossSurface,
    config: DescentConfig,
    theta: Vec2,
    path: Vec<Vec2>,
    loss_history: Vec<f32>,
    iteration: usize,
    converged: bool,
}

impl GradientDescent {
    /// Start a run at `start`; the initial point and loss are recorded.
    pub fn new(surface: LossSurface, start: Vec2, config: DescentConfig) -> Self {
        let loss = surface.loss(start);
        Self {
            surface,
            config,
            theta: start,
            path: vec![start],
            loss_history: vec![loss],
            iteration: 0,
            converged: false,
        }
    }

    /// Take one step: θ ← θ − α∇L, clamped to the configured bounds.
    /// Returns false once converged, at which point the state no longer
    /// changes.
    pub fn step(&mut self) -> bool {
        if self.converged {
            return false;
        }

        let grad = self.surface.gradient(self.theta);
        self.theta -= grad * self.config.learning_rate;
        self.theta = self.theta.clamp(
            Vec2::splat(-self.config.bound),
            Vec2::splat(self.config.bound),
        );
        self.iteration += 1;

        self.path.push(self.theta);
        self.loss_history.push(self.surface.loss(self.theta));
        if self.path.len() > self.config.max_history {
            self.path.remove(0);
        }
        if self.loss_history.len() > self.config.max_history {
            self.loss_history.remove(0);
        }

        if grad.length() < self.config.convergence_threshold {
            self.converged = true;
        }
        !self.converged
    }

    /// Step until convergence or `max_steps` iterations, whichever first.
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

    /// Current loss.
    pub fn loss(&self) -> f32 {
        self.surface.loss(self.theta)
    }

    /// Recent trajectory, capped at the configured history length.
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Recent losses, parallel to [`Self::path`].
    pub fn loss_history(&self) -> &[f32] {
        &self.loss_history
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
