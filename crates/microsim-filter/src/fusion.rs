//! GPS + IMU sensor-fusion toy model.
//!
//! A robot drives a wobbling circle. Two imperfect sensors watch it: a GPS
//! that reports noisy absolute position at a low rate, and an IMU that
//! reports velocity with a slowly drifting bias at every step. Three
//! estimators run side by side so their errors can be compared:
//!
//! * GPS-only: hold the latest fix.
//! * IMU-only: dead reckoning, which drifts without bound.
//! * Fused: a [`KalmanFilter`] that dead-reckons on IMU velocity between
//!   fixes and corrects with each GPS fix.
//!
//! Error histories are kept for plotting and for RMS comparison.

use glam::{Vec2, Vec4};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::kalman::{KalmanConfig, KalmanFilter, MotionModel};

const MAX_HISTORY: usize = 200;

/// Scenario parameters; defaults match the sim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// GPS position noise standard deviation.
    pub gps_noise: f32,
    /// Steps between GPS fixes.
    pub gps_interval: u32,
    /// Growth rate of the IMU velocity bias.
    pub imu_drift_rate: f32,
    /// Whether GPS fixes arrive at all.
    pub enable_gps: bool,
    /// Whether IMU readings arrive at all.
    pub enable_imu: bool,
    /// Radius of the circular reference path.
    pub path_radius: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            gps_noise: 15.0,
            gps_interval: 20,
            imu_drift_rate: 0.1,
            enable_gps: true,
            enable_imu: true,
            path_radius: 150.0,
        }
    }
}

/// The running scenario: ground truth, both raw sensors and the fused filter.
#[derive(Debug, Clone)]
pub struct FusionSim {
    config: FusionConfig,
    step: u32,
    path_angle: f32,
    true_pos: Vec2,
    true_vel: Vec2,
    gps_estimate: Option<Vec2>,
    imu_estimate: Vec2,
    imu_vel: Vec2,
    imu_bias: Vec2,
    filter: KalmanFilter,
    gps_errors: Vec<f32>,
    imu_errors: Vec<f32>,
    fused_errors: Vec<f32>,
}

impl FusionSim {
    /// Start the robot at angle zero on the reference circle. All three
    /// estimators begin at the true position.
    pub fn new(config: FusionConfig) -> Self {
        let start = path_point(0.0, config.path_radius);
        let filter = KalmanFilter::new(
            Vec4::new(start.x, start.y, 0.0, 0.0),
            KalmanConfig {
                process_noise: 0.5,
                measurement_noise: config.gps_noise,
                dt: 1.0,
            },
            MotionModel::ConstantVelocity,
        );
        Self {
            config,
            step: 0,
            path_angle: 0.0,
            true_pos: start,
            true_vel: Vec2::ZERO,
            gps_estimate: None,
            imu_estimate: start,
            imu_vel: Vec2::ZERO,
            imu_bias: Vec2::ZERO,
            filter,
            gps_errors: Vec::new(),
            imu_errors: Vec::new(),
            fused_errors: Vec::new(),
        }
    }

    /// Advance the scenario by one tick.
    pub fn step(&mut self, rng: &mut impl Rng) {
        // ground truth: a circle with two superimposed wobbles
        self.path_angle += 0.015;
        let next = path_point(self.path_angle, self.config.path_radius);
        self.true_vel = next - self.true_pos;
        self.true_pos = next;

        let imu_reading = self.sample_imu(rng);
        let gps_reading = self.sample_gps(rng);

        if let Some(v) = imu_reading {
            // dead reckoning with a low-pass on the measured velocity
            self.imu_vel = self.imu_vel * 0.95 + v * 0.05;
            self.imu_estimate += self.imu_vel;
        }
        if let Some(z) = gps_reading {
            self.gps_estimate = Some(z);
        }

        // dead reckoning alone needs wider process noise than IMU-aided runs
        let q = if self.config.enable_imu { 0.5 } else { 2.0 };
        self.filter
            .set_q_diag(Vec4::new(q, q, 0.1 * q, 0.1 * q));
        self.filter.predict();
        if let Some(v) = imu_reading {
            self.filter.nudge_velocity(v, 0.3);
        }
        if let Some(z) = gps_reading {
            self.filter.update(z);
        }

        self.record_errors();
        self.step += 1;
    }

    /// A biased velocity reading, or `None` when the IMU is disabled. The
    /// bias itself random-walks with a rate set by the config.
    fn sample_imu(&mut self, rng: &mut impl Rng) -> Option<Vec2> {
        if !self.config.enable_imu {
            return None;
        }
        if let Ok(drift) = Normal::new(0.0f32, (self.config.imu_drift_rate * 0.01).abs()) {
            self.imu_bias += Vec2::new(drift.sample(rng), drift.sample(rng));
        }
        Some(self.true_vel + self.imu_bias)
    }

    /// A noisy position fix on every `gps_interval`-th step.
    fn sample_gps(&mut self, rng: &mut impl Rng) -> Option<Vec2> {
        if !self.config.enable_gps || self.step % self.config.gps_interval.max(1) != 0 {
            return None;
        }
        match Normal::new(0.0f32, self.config.gps_noise.abs()) {
            Ok(noise) => Some(self.true_pos + Vec2::new(noise.sample(rng), noise.sample(rng))),
            Err(_) => Some(self.true_pos),
        }
    }

    fn record_errors(&mut self) {
        if let Some(z) = self.gps_estimate {
            push_capped(&mut self.gps_errors, z.distance(self.true_pos));
        }
        push_capped(&mut self.imu_errors, self.imu_estimate.distance(self.true_pos));
        push_capped(
            &mut self.fused_errors,
            self.filter.position().distance(self.true_pos),
        );
    }

    /// True robot position.
    pub fn true_position(&self) -> Vec2 {
        self.true_pos
    }

    /// The most recent GPS fix, if one has arrived.
    pub fn gps_estimate(&self) -> Option<Vec2> {
        self.gps_estimate
    }

    /// The dead-reckoned IMU position.
    pub fn imu_estimate(&self) -> Vec2 {
        self.imu_estimate
    }

    /// The fused filter estimate.
    pub fn fused_estimate(&self) -> Vec2 {
        self.filter.position()
    }

    /// Borrow the underlying filter, e.g. to read its covariance.
    pub fn filter(&self) -> &KalmanFilter {
        &self.filter
    }

    /// Root-mean-square error of holding the last GPS fix.
    pub fn gps_rms(&self) -> f32 {
        rms(&self.gps_errors)
    }

    /// Root-mean-square error of IMU dead reckoning.
    pub fn imu_rms(&self) -> f32 {
        rms(&self.imu_errors)
    }

    /// Root-mean-square error of the fused estimate.
    pub fn fused_rms(&self) -> f32 {
        rms(&self.fused_errors)
    }
}

fn path_point(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(
        radius * angle.cos() + (angle * 3.0).sin() * 20.0,
        radius * angle.sin() + (angle * 2.0).cos() * 15.0,
    )
}

fn push_capped(history: &mut Vec<f32>, value: f32) {
    history.push(value);
    if history.len() > MAX_HISTORY {
        history.remove(0);
    }
}

fn rms(errors: &[f32]) -> f32 {
    if errors.is_empty() {
        return 0.0;
    }
    (errors.iter().map(|e| e * e).sum::<f32>() / errors.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(config: FusionConfig, steps: usize, seed: u64) -> FusionSim {
        let mut sim = FusionSim::new(config);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..steps {
            sim.step(&mut rng);
        }
        sim
    }

    #[test]
    fn test_fused_beats_raw_gps() {
        let sim = run(FusionConfig::default(), 1000, 7);
        assert!(sim.gps_rms() > 0.0);
        assert!(
            sim.fused_rms() < sim.gps_rms(),
            "fused {} should beat gps {}",
            sim.fused_rms(),
            sim.gps_rms()
        );
    }

    #[test]
    fn test_imu_only_drifts() {
        let config = FusionConfig {
            enable_gps: false,
            imu_drift_rate: 0.5,
            ..Default::default()
        };
        let short = run(config.clone(), 200, 7);
        let long = run(config, 2000, 7);
        assert!(
            long.imu_estimate().distance(long.true_position())
                > short.imu_estimate().distance(short.true_position()),
            "dead reckoning error should grow over time"
        );
    }

    #[test]
    fn test_fused_stays_bounded_with_gps() {
        let sim = run(FusionConfig::default(), 2000, 13);
        let err = sim.fused_estimate().distance(sim.true_position());
        assert!(err < 3.0 * sim.config.gps_noise, "fused error {err} ran away");
    }

    #[test]
    fn test_no_gps_fix_before_enabled() {
        let config = FusionConfig {
            enable_gps: false,
            ..Default::default()
        };
        let sim = run(config, 100, 1);
        assert!(sim.gps_estimate().is_none());
        assert_eq!(sim.gps_rms(), 0.0);
    }

    #[test]
    fn test_gps_fix_cadence() {
        let mut sim = FusionSim::new(FusionConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        sim.step(&mut rng);
        // step 0 carries a fix
        assert!(sim.gps_estimate().is_some());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = FusionConfig {
            gps_noise: 25.0,
            enable_imu: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: FusionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gps_noise, 25.0);
        assert!(!back.enable_imu);
        assert_eq!(back.gps_interval, config.gps_interval);
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        let a = run(FusionConfig::default(), 300, 42);
        let b = run(FusionConfig::default(), 300, 42);
        assert_eq!(a.fused_estimate(), b.fused_estimate());
        assert_eq!(a.fused_rms(), b.fused_rms());
    }
}
