#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod fusion;
mod kalman;

pub use fusion::{FusionConfig, FusionSim};
pub use kalman::{KalmanConfig, KalmanFilter, MotionModel};

/// Determinant clamp for the 2×2 innovation inverse.
pub(crate) const DET_EPS: f32 = 1e-6;
