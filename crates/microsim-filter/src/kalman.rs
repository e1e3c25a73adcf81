//! A 4-state linear Kalman filter over planar position and velocity.
//!
//! State is `[x, y, vx, vy]`; only position is observed. The predict and
//! update equations are the standard ones:
//!
//! ```text
//! predict:  x ← F·x              P ← F·P·Fᵀ + Q
//! update:   y = z − H·x          S = H·P·Hᵀ + R
//!           K = P·Hᵀ·S⁻¹         x ← x + K·y
//!           P ← (I − K·H)·P
//! ```
//!
//! Because H = [I₂ 0], the update works directly on the 2×2 position block
//! of P instead of materializing rectangular matrices. P is re-symmetrized
//! after each update to keep rounding from accumulating skew.

use glam::{Mat2, Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::DET_EPS;

/// Motion model driving the state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionModel {
    /// Position integrates velocity; velocity persists.
    ConstantVelocity,
    /// Like constant velocity but with a 0.98 per-step velocity decay.
    ConstantAcceleration,
    /// Velocity is discarded every step.
    RandomWalk,
}

impl MotionModel {
    /// The state-transition matrix for this model at time step `dt`.
    pub fn transition(&self, dt: f32) -> Mat4 {
        match self {
            MotionModel::ConstantVelocity => Mat4::from_cols(
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::new(dt, 0.0, 1.0, 0.0),
                Vec4::new(0.0, dt, 0.0, 1.0),
            ),
            MotionModel::ConstantAcceleration => Mat4::from_cols(
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::new(dt, 0.0, 0.98, 0.0),
                Vec4::new(0.0, dt, 0.0, 0.98),
            ),
            MotionModel::RandomWalk => Mat4::from_cols(
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::ZERO,
                Vec4::ZERO,
            ),
        }
    }
}

/// Noise and timing parameters of the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalmanConfig {
    /// Process-noise intensity q.
    pub process_noise: f32,
    /// Measurement noise standard deviation r.
    pub measurement_noise: f32,
    /// Time step.
    pub dt: f32,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            process_noise: 0.5,
            measurement_noise: 20.0,
            dt: 1.0,
        }
    }
}

/// The filter state: estimate, covariance and the cached model matrices.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    x: Vec4,
    p: Mat4,
    f: Mat4,
    q: Mat4,
    r: Mat2,
    config: KalmanConfig,
}

impl KalmanFilter {
    /// Initial covariance: large positional uncertainty (100) and moderate
    /// velocity uncertainty (10), as the sims start.
    pub fn new(initial: Vec4, config: KalmanConfig, model: MotionModel) -> Self {
        let mut filter = Self {
            x: initial,
            p: Mat4::from_cols(
                Vec4::new(100.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 100.0, 0.0, 0.0),
                Vec4::new(0.0, 0.0, 10.0, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 10.0),
            ),
            f: model.transition(config.dt),
            q: Mat4::ZERO,
            r: Mat2::ZERO,
            config,
        };
        filter.rebuild_noise();
        filter
    }

    /// Swap the motion model, keeping state and covariance.
    pub fn set_model(&mut self, model: MotionModel) {
        self.f = model.transition(self.config.dt);
    }

    /// Update the noise parameters and rebuild Q and R.
    pub fn set_noise(&mut self, process_noise: f32, measurement_noise: f32) {
        self.config.process_noise = process_noise;
        self.config.measurement_noise = measurement_noise;
        self.rebuild_noise();
    }

    /// Replace Q with a diagonal (used by the fusion scenario, which swells
    /// process noise when dead reckoning is the only velocity source).
    pub fn set_q_diag(&mut self, diag: Vec4) {
        self.q = Mat4::from_diagonal(diag);
    }

    /// Replace the measurement noise covariance directly.
    pub fn set_r(&mut self, r: Mat2) {
        self.r = r;
    }

    /// The white-acceleration discretization of Q at intensity q:
    /// position blocks q·dt³/3, cross terms q·dt²/2, velocity blocks q·dt.
    fn rebuild_noise(&mut self) {
        let q = self.config.process_noise;
        let dt = self.config.dt;
        let q_pos = q * dt * dt * dt / 3.0;
        let q_cross = q * dt * dt / 2.0;
        let q_vel = q * dt;
        self.q = Mat4::from_cols(
            Vec4::new(q_pos, 0.0, q_cross, 0.0),
            Vec4::new(0.0, q_pos, 0.0, q_cross),
            Vec4::new(q_cross, 0.0, q_vel, 0.0),
            Vec4::new(0.0, q_cross, 0.0, q_vel),
        );

        let r = self.config.measurement_noise;
        self.r = Mat2::from_cols(Vec2::new(r * r, 0.0), Vec2::new(0.0, r * r));
    }

    /// Current state estimate `[x, y, vx, vy]`.
    pub fn state(&self) -> Vec4 {
        self.x
    }

    /// Estimated position.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x.x, self.x.y)
    }

    /// Estimated velocity.
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.z, self.x.w)
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &Mat4 {
        &self.p
    }

    /// Positional uncertainty: the trace of the position block of P.
    pub fn position_variance(&self) -> f32 {
        self.p.x_axis.x + self.p.y_axis.y
    }

    /// Time update.
    pub fn predict(&mut self) {
        self.x = self.f * self.x;
        self.p = self.f * self.p * self.f.transpose() + self.q;
    }

    /// Measurement update with an observed position.
    pub fn update(&mut self, z: Vec2) {
        // innovation against the position block
        let y = z - self.position();

        // S = P_pos + R, inverted with a clamped determinant so a collapsed
        // covariance cannot produce NaNs mid-animation
        let p = self.p.to_cols_array_2d(); // p[col][row]
        let s = Mat2::from_cols(
            Vec2::new(p[0][0] + self.r.x_axis.x, p[0][1]),
            Vec2::new(p[1][0], p[1][1] + self.r.y_axis.y),
        );
        let mut det = s.determinant();
        if det.abs() < DET_EPS {
            det = DET_EPS;
        }
        let s_inv = Mat2::from_cols(
            Vec2::new(s.y_axis.y / det, -s.x_axis.y / det),
            Vec2::new(-s.y_axis.x / det, s.x_axis.x / det),
        );

        // K = P·Hᵀ·S⁻¹: P·Hᵀ is the first two columns of P (4×2)
        let mut k = [[0.0f32; 2]; 4];
        let s_arr = s_inv.to_cols_array_2d(); // s_arr[col][row]
        for i in 0..4 {
            for j in 0..2 {
                k[i][j] = p[0][i] * s_arr[j][0] + p[1][i] * s_arr[j][1];
            }
        }

        // x ← x + K·y
        self.x += Vec4::new(
            k[0][0] * y.x + k[0][1] * y.y,
            k[1][0] * y.x + k[1][1] * y.y,
            k[2][0] * y.x + k[2][1] * y.y,
            k[3][0] * y.x + k[3][1] * y.y,
        );

        // P ← (I − K·H)·P, with H = [I₂ 0]
        let mut new_p = [[0.0f32; 4]; 4]; // row-major scratch
        for i in 0..4 {
            for j in 0..4 {
                new_p[i][j] = p[j][i] - k[i][0] * p[j][0] - k[i][1] * p[j][1];
            }
        }

        // re-symmetrize
        let mut cols = [[0.0f32; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                cols[j][i] = (new_p[i][j] + new_p[j][i]) / 2.0;
            }
        }
        self.p = Mat4::from_cols_array_2d(&cols);
    }

    /// Blend a velocity-like measurement into the estimate, the way the
    /// fusion sim folds IMU readings in: `v ← (1−w)·v + w·measured`.
    pub fn nudge_velocity(&mut self, measured: Vec2, weight: f32) {
        self.x.z = self.x.z * (1.0 - weight) + measured.x * weight;
        self.x.w = self.x.w * (1.0 - weight) + measured.y * weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn symmetric(m: &Mat4, tol: f32) -> bool {
        let a = m.to_cols_array_2d();
        for i in 0..4 {
            for j in 0..4 {
                if (a[i][j] - a[j][i]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_predict_integrates_velocity() {
        let mut kf = KalmanFilter::new(
            Vec4::new(0.0, 0.0, 2.0, -1.0),
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        kf.predict();
        assert_relative_eq!(kf.position().x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(kf.position().y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_predict_grows_uncertainty() {
        let mut kf = KalmanFilter::new(
            Vec4::ZERO,
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        let before = kf.position_variance();
        kf.predict();
        assert!(kf.position_variance() > before);
    }

    #[test]
    fn test_update_shrinks_uncertainty() {
        let mut kf = KalmanFilter::new(
            Vec4::ZERO,
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        kf.predict();
        let before = kf.position_variance();
        kf.update(Vec2::new(5.0, 5.0));
        assert!(kf.position_variance() < before);
    }

    #[test]
    fn test_update_moves_toward_measurement() {
        let mut kf = KalmanFilter::new(
            Vec4::ZERO,
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        kf.predict();
        kf.update(Vec2::new(10.0, 0.0));
        let x = kf.position().x;
        assert!(x > 0.0 && x < 10.0, "estimate should move part-way: {x}");
    }

    #[test]
    fn test_covariance_stays_symmetric() {
        let mut kf = KalmanFilter::new(
            Vec4::ZERO,
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        for i in 0..50 {
            kf.predict();
            kf.update(Vec2::new(i as f32, i as f32 * 0.5));
            assert!(symmetric(kf.covariance(), 1e-4));
        }
    }

    #[test]
    fn test_tracks_constant_velocity_target() {
        let mut kf = KalmanFilter::new(
            Vec4::ZERO,
            KalmanConfig {
                process_noise: 0.1,
                measurement_noise: 5.0,
                dt: 1.0,
            },
            MotionModel::ConstantVelocity,
        );

        let mut rng = StdRng::seed_from_u64(21);
        let noise = Normal::new(0.0f32, 5.0).unwrap();
        let vel = Vec2::new(2.0, 1.0);

        let mut truth = Vec2::ZERO;
        for _ in 0..200 {
            truth += vel;
            kf.predict();
            let z = truth + Vec2::new(noise.sample(&mut rng), noise.sample(&mut rng));
            kf.update(z);
        }

        // estimate should beat the raw measurement noise
        assert!(kf.position().distance(truth) < 5.0);
        assert!(kf.velocity().distance(vel) < 0.5);
    }

    #[test]
    fn test_random_walk_drops_velocity() {
        let mut kf = KalmanFilter::new(
            Vec4::new(0.0, 0.0, 3.0, 3.0),
            KalmanConfig::default(),
            MotionModel::RandomWalk,
        );
        kf.predict();
        assert_relative_eq!(kf.velocity().x, 0.0);
        assert_relative_eq!(kf.velocity().y, 0.0);
        // and the position does not move
        assert_relative_eq!(kf.position().x, 0.0);
    }

    #[test]
    fn test_nudge_velocity_blend() {
        let mut kf = KalmanFilter::new(
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            KalmanConfig::default(),
            MotionModel::ConstantVelocity,
        );
        kf.nudge_velocity(Vec2::new(2.0, 0.0), 0.3);
        assert_relative_eq!(kf.velocity().x, 1.3, epsilon = 1e-6);
        assert_relative_eq!(kf.velocity().y, 0.7, epsilon = 1e-6);
    }
}
