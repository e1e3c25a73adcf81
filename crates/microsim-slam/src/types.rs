//! Poses, landmarks, constraint edges and the scenario configuration.
//!
//! Covariances are the simplified diagonal-plus-cross form the
//! visualization draws as ellipses, not full SE(2) uncertainty.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A planar robot pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2 {
    /// World x.
    pub x: f32,
    /// World y.
    pub y: f32,
    /// Heading in radians.
    pub theta: f32,
}

impl Pose2 {
    /// Build a pose from a position and heading.
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// The position part.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance between the position parts.
    pub fn distance(&self, other: &Pose2) -> f32 {
        self.position().distance(other.position())
    }
}

/// A simplified 2x2 position covariance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cov2 {
    /// Variance along x.
    pub xx: f32,
    /// Variance along y.
    pub yy: f32,
    /// Cross term.
    pub xy: f32,
}

impl Cov2 {
    /// Uncertainty scalar used for display and for monotonicity checks.
    pub fn trace(&self) -> f32 {
        self.xx + self.yy
    }
}

/// A mapped point feature with its true and estimated position.
#[derive(Debug, Clone)]
pub struct Landmark {
    /// Index into the graph's landmark list.
    pub id: usize,
    /// Ground-truth position.
    pub true_pos: Vec2,
    /// Current map estimate.
    pub est_pos: Vec2,
    /// Estimate covariance.
    pub cov: Cov2,
}

/// Relative-motion constraint between consecutive poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdometryEdge {
    /// Earlier pose index.
    pub from: usize,
    /// Later pose index.
    pub to: usize,
}

/// A range-bearing observation of a landmark from a pose, stored as the
/// measured offset in world-aligned coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkEdge {
    /// Observing pose index.
    pub pose: usize,
    /// Observed landmark id.
    pub landmark: usize,
    /// Measured landmark offset from the pose.
    pub measurement: Vec2,
}

/// A recognized revisit: the current pose measures its offset to an
/// earlier pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopClosureEdge {
    /// Current (later) pose index.
    pub from: usize,
    /// Matched earlier pose index.
    pub to: usize,
    /// Measured offset from `from` to `to`.
    pub measurement: Vec2,
}

/// Noise levels and world bounds for the scripted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlamConfig {
    /// Translation noise per move, standard deviation.
    pub odometry_noise: f32,
    /// Heading noise per move, standard deviation in radians.
    pub heading_noise: f32,
    /// Landmark observation noise, standard deviation.
    pub landmark_noise: f32,
    /// Loop-closure measurement noise, standard deviation.
    pub loop_closure_noise: f32,
    /// Length of each scripted move.
    pub step_length: f32,
    /// Heading increment per scripted move, in radians.
    pub turn_rate: f32,
    /// Smallest reachable x.
    pub min_x: f32,
    /// Largest reachable x.
    pub max_x: f32,
    /// Smallest reachable y.
    pub min_y: f32,
    /// Largest reachable y.
    pub max_y: f32,
}

impl Default for SlamConfig {
    fn default() -> Self {
        Self {
            odometry_noise: 5.0,
            heading_noise: 0.1,
            landmark_noise: 3.0,
            loop_closure_noise: 2.0,
            step_length: 40.0,
            turn_rate: 0.4,
            min_x: 100.0,
            max_x: 800.0,
            min_y: 100.0,
            max_y: 500.0,
        }
    }
}

impl SlamConfig {
    /// The center of the configured world, where the run starts.
    pub fn start(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
