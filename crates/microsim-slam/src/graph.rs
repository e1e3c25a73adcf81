//! The pose graph and the four interactive operations that grow and
//! correct it.
//!
//! Ground truth and the estimate are kept side by side so drift is
//! measurable. Moves follow a scripted looping path, so after a couple of
//! dozen moves the robot passes near earlier poses and loop closures
//! become available. Optimization is deliberately simple: each loop
//! closure's residual is spread linearly over the poses between its
//! endpoints rather than solved as a least-squares system.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::types::{
    Cov2, Landmark, LandmarkEdge, LoopClosureEdge, OdometryEdge, Pose2, SlamConfig,
};

/// Landmarks closer than this to the true pose are re-observed instead of
/// duplicated.
const LANDMARK_REUSE_RADIUS: f32 = 100.0;
/// Earlier poses within this distance qualify as loop closures.
const LOOP_CLOSURE_RADIUS: f32 = 80.0;
/// Most recent poses excluded from loop-closure matching.
const LOOP_CLOSURE_EXCLUDE: usize = 3;
/// Fraction of each loop-closure residual distributed per optimize call.
const CORRECTION_GAIN: f32 = 0.8;

/// True and estimated trajectories plus the constraint edges between them.
#[derive(Debug, Clone)]
pub struct PoseGraph {
    config: SlamConfig,
    true_poses: Vec<Pose2>,
    est_poses: Vec<Pose2>,
    covariances: Vec<Cov2>,
    landmarks: Vec<Landmark>,
    odometry_edges: Vec<OdometryEdge>,
    landmark_edges: Vec<LandmarkEdge>,
    loop_closures: Vec<LoopClosureEdge>,
    drift: Vec2,
    optimized: bool,
}

impl PoseGraph {
    /// Start with a single pose at the world center and unit covariance.
    pub fn new(config: SlamConfig) -> Self {
        let start = config.start();
        let pose = Pose2::new(start.x, start.y, 0.0);
        Self {
            config,
            true_poses: vec![pose],
            est_poses: vec![pose],
            covariances: vec![Cov2 {
                xx: 1.0,
                yy: 1.0,
                xy: 0.0,
            }],
            landmarks: Vec::new(),
            odometry_edges: Vec::new(),
            landmark_edges: Vec::new(),
            loop_closures: Vec::new(),
            drift: Vec2::ZERO,
            optimized: false,
        }
    }

    /// Advance one scripted move.
    ///
    /// The true pose follows a loop whose heading advances by the turn rate
    /// each move, clamped to the world bounds. The estimate applies the
    /// same motion corrupted by odometry noise plus a slowly accumulating
    /// drift, and the pose covariance grows.
    pub fn move_robot(&mut self, rng: &mut impl Rng) {
        let last_true = self.true_poses[self.true_poses.len() - 1];
        let last_est = self.est_poses[self.est_poses.len() - 1];

        let angle = (self.true_poses.len() - 1) as f32 * self.config.turn_rate;
        let dx = angle.cos() * self.config.step_length;
        let dy = angle.sin() * self.config.step_length;
        let theta = dy.atan2(dx);

        self.true_poses.push(Pose2::new(
            (last_true.x + dx).clamp(self.config.min_x, self.config.max_x),
            (last_true.y + dy).clamp(self.config.min_y, self.config.max_y),
            theta,
        ));

        let noise = self.config.odometry_noise;
        self.drift += Vec2::new(gauss(rng, noise * 0.1), gauss(rng, noise * 0.1));
        self.est_poses.push(Pose2::new(
            last_est.x + dx + gauss(rng, noise) + self.drift.x * 0.1,
            last_est.y + dy + gauss(rng, noise) + self.drift.y * 0.1,
            theta + gauss(rng, self.config.heading_noise),
        ));

        let last_cov = self.covariances[self.covariances.len() - 1];
        self.covariances.push(Cov2 {
            xx: last_cov.xx + noise * 0.5,
            yy: last_cov.yy + noise * 0.5,
            xy: last_cov.xy + noise * 0.1,
        });

        self.odometry_edges.push(OdometryEdge {
            from: self.est_poses.len() - 2,
            to: self.est_poses.len() - 1,
        });
        self.optimized = false;
    }

    /// Observe a landmark from the current pose.
    ///
    /// If a mapped landmark lies within the reuse radius of the true pose
    /// it is re-observed through a noisy relative measurement.
    /// Otherwise a new landmark is spawned at a random bearing and a range
    /// between 30 and 80 units, its estimate seeded from the drifted pose.
    /// Returns the id of the landmark involved.
    pub fn observe_landmark(&mut self, rng: &mut impl Rng) -> usize {
        let idx = self.current_pose();
        let current_true = self.true_poses[idx];
        let current_est = self.est_poses[idx];

        let existing = self
            .landmarks
            .iter()
            .find(|lm| lm.true_pos.distance(current_true.position()) < LANDMARK_REUSE_RADIUS)
            .map(|lm| lm.id);

        let noise = self.config.landmark_noise;
        let id = match existing {
            Some(id) => {
                let lm = &self.landmarks[id];
                let measurement = lm.true_pos - current_true.position()
                    + Vec2::new(gauss(rng, noise), gauss(rng, noise));
                self.landmark_edges.push(LandmarkEdge {
                    pose: idx,
                    landmark: id,
                    measurement,
                });
                debug!("re-observed landmark {id} from pose {idx}");
                id
            }
            None => {
                let bearing = rng.random_range(0.0..std::f32::consts::TAU);
                let range = rng.random_range(30.0..80.0);
                let offset = Vec2::new(bearing.cos(), bearing.sin()) * range;

                let id = self.landmarks.len();
                self.landmarks.push(Landmark {
                    id,
                    true_pos: current_true.position() + offset,
                    est_pos: current_est.position()
                        + offset
                        + Vec2::new(gauss(rng, noise), gauss(rng, noise)),
                    cov: Cov2 {
                        xx: 10.0,
                        yy: 10.0,
                        xy: 0.0,
                    },
                });
                self.landmark_edges.push(LandmarkEdge {
                    pose: idx,
                    landmark: id,
                    measurement: offset,
                });
                debug!("new landmark {id} from pose {idx}");
                id
            }
        };
        self.optimized = false;
        id
    }

    /// Look for an earlier pose the robot has returned to.
    ///
    /// Matching runs on ground truth, excluding the most recent poses so a
    /// pose cannot close against its immediate predecessors. On a match a
    /// loop-closure edge with a small-noise offset measurement is recorded
    /// and returned.
    pub fn detect_loop_closure(&mut self, rng: &mut impl Rng) -> Option<LoopClosureEdge> {
        if self.true_poses.len() < LOOP_CLOSURE_EXCLUDE + 2 {
            return None;
        }

        let idx = self.current_pose();
        let current_true = self.true_poses[idx];

        let mut closest: Option<(usize, f32)> = None;
        for (i, pose) in self.true_poses[..self.true_poses.len() - LOOP_CLOSURE_EXCLUDE]
            .iter()
            .enumerate()
        {
            let d = current_true.distance(pose);
            if d < LOOP_CLOSURE_RADIUS && closest.map_or(true, |(_, best)| d < best) {
                closest = Some((i, d));
            }
        }

        let (matched, d) = closest?;
        let true_diff = self.true_poses[matched].position() - current_true.position();
        let noise = self.config.loop_closure_noise;
        let edge = LoopClosureEdge {
            from: idx,
            to: matched,
            measurement: true_diff + Vec2::new(gauss(rng, noise), gauss(rng, noise)),
        };
        self.loop_closures.push(edge);
        self.optimized = false;
        info!("loop closure: pose {idx} matched pose {matched} at distance {d:.1}");
        Some(edge)
    }

    /// Correct the trajectory against the recorded loop closures.
    ///
    /// For each closure the residual between the measured and estimated
    /// offsets is distributed linearly over the poses between the
    /// endpoints, scaled by the correction gain. Covariances of corrected
    /// poses shrink, and landmarks observed from corrected poses are
    /// re-anchored to their corrected observation. Returns false when
    /// there is nothing to optimize.
    pub fn optimize(&mut self) -> bool {
        if self.loop_closures.is_empty() {
            return false;
        }

        for lc in self.loop_closures.clone() {
            let est_diff =
                self.est_poses[lc.to].position() - self.est_poses[lc.from].position();
            let error = lc.measurement - est_diff;

            let span = lc.from - lc.to + 1;
            for i in lc.to..=lc.from {
                let t = (i - lc.to) as f32 / span as f32;
                self.est_poses[i].x += error.x * t * CORRECTION_GAIN;
                self.est_poses[i].y += error.y * t * CORRECTION_GAIN;
                self.covariances[i].xx *= 0.3;
                self.covariances[i].yy *= 0.3;
            }

            for edge in &self.landmark_edges {
                if edge.pose >= lc.to && edge.pose <= lc.from {
                    let anchored = self.est_poses[edge.pose].position() + edge.measurement;
                    let lm = &mut self.landmarks[edge.landmark];
                    lm.est_pos = anchored;
                    lm.cov.xx *= 0.5;
                    lm.cov.yy *= 0.5;
                }
            }
        }

        self.optimized = true;
        true
    }

    /// Sum of loop-closure residual magnitudes at the current estimate.
    pub fn loop_closure_residual(&self) -> f32 {
        self.loop_closures
            .iter()
            .map(|lc| {
                let est_diff =
                    self.est_poses[lc.to].position() - self.est_poses[lc.from].position();
                (lc.measurement - est_diff).length()
            })
            .sum()
    }

    /// Position error of the newest pose estimate.
    pub fn current_error(&self) -> f32 {
        let idx = self.current_pose();
        self.true_poses[idx].distance(&self.est_poses[idx])
    }

    fn current_pose(&self) -> usize {
        self.est_poses.len() - 1
    }

    /// Ground-truth trajectory.
    pub fn true_poses(&self) -> &[Pose2] {
        &self.true_poses
    }

    /// Estimated trajectory.
    pub fn est_poses(&self) -> &[Pose2] {
        &self.est_poses
    }

    /// Per-pose covariances, parallel to the trajectories.
    pub fn covariances(&self) -> &[Cov2] {
        &self.covariances
    }

    /// The landmark map.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Consecutive-pose constraints.
    pub fn odometry_edges(&self) -> &[OdometryEdge] {
        &self.odometry_edges
    }

    /// Pose-to-landmark observations.
    pub fn landmark_edges(&self) -> &[LandmarkEdge] {
        &self.landmark_edges
    }

    /// Recorded loop closures.
    pub fn loop_closures(&self) -> &[LoopClosureEdge] {
        &self.loop_closures
    }

    /// Whether the graph has been optimized since it last changed.
    pub fn is_optimized(&self) -> bool {
        self.optimized
    }
}

/// A zero-mean Gaussian sample, or zero when the deviation is degenerate.
fn gauss(rng: &mut impl Rng, std_dev: f32) -> f32 {
    match Normal::new(0.0f32, std_dev.abs()) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    fn driven_graph(moves: usize, rng: &mut StdRng) -> PoseGraph {
        let mut graph = PoseGraph::new(SlamConfig::default());
        for _ in 0..moves {
            graph.move_robot(rng);
        }
        graph
    }

    #[test]
    fn test_move_appends_pose_and_edge() {
        let mut rng = rng();
        let graph = driven_graph(5, &mut rng);
        assert_eq!(graph.true_poses().len(), 6);
        assert_eq!(graph.est_poses().len(), 6);
        assert_eq!(graph.odometry_edges().len(), 5);
        assert_eq!(
            graph.odometry_edges().last().unwrap(),
            &OdometryEdge { from: 4, to: 5 }
        );
    }

    #[test]
    fn test_covariance_grows_with_motion() {
        let mut rng = rng();
        let graph = driven_graph(10, &mut rng);
        let traces: Vec<f32> = graph.covariances().iter().map(Cov2::trace).collect();
        for pair in traces.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_true_path_stays_in_bounds() {
        let mut rng = rng();
        let graph = driven_graph(60, &mut rng);
        let config = SlamConfig::default();
        for pose in graph.true_poses() {
            assert!(pose.x >= config.min_x && pose.x <= config.max_x);
            assert!(pose.y >= config.min_y && pose.y <= config.max_y);
        }
    }

    #[test]
    fn test_new_landmark_within_observation_range() {
        let mut rng = rng();
        let mut graph = driven_graph(2, &mut rng);
        let id = graph.observe_landmark(&mut rng);
        assert_eq!(graph.landmarks().len(), 1);
        assert_eq!(graph.landmark_edges().len(), 1);

        let lm = &graph.landmarks()[id];
        let pose = graph.true_poses().last().unwrap();
        let range = lm.true_pos.distance(pose.position());
        assert!((30.0..80.0).contains(&range), "range was {range}");
    }

    #[test]
    fn test_nearby_landmark_reobserved_not_duplicated() {
        let mut rng = rng();
        let mut graph = driven_graph(2, &mut rng);
        let first = graph.observe_landmark(&mut rng);
        // still within reuse radius of the same pose
        let second = graph.observe_landmark(&mut rng);
        assert_eq!(first, second);
        assert_eq!(graph.landmarks().len(), 1);
        assert_eq!(graph.landmark_edges().len(), 2);
    }

    #[test]
    fn test_no_loop_closure_on_short_trajectory() {
        let mut rng = rng();
        let mut graph = driven_graph(3, &mut rng);
        assert!(graph.detect_loop_closure(&mut rng).is_none());
    }

    #[test]
    fn test_loop_closure_found_after_full_loop() {
        // turn_rate 0.4 closes a loop in roughly 16 moves
        let mut rng = rng();
        let mut graph = driven_graph(16, &mut rng);

        let edge = graph.detect_loop_closure(&mut rng).expect("loop expected");
        assert!(edge.to + LOOP_CLOSURE_EXCLUDE < edge.from + 1);
        let d = graph.true_poses()[edge.from].distance(&graph.true_poses()[edge.to]);
        assert!(d < LOOP_CLOSURE_RADIUS);
        assert_eq!(graph.loop_closures().len(), 1);
    }

    #[test]
    fn test_optimize_reduces_residual() {
        let mut rng = rng();
        let mut graph = driven_graph(16, &mut rng);
        graph.observe_landmark(&mut rng);
        assert!(graph.detect_loop_closure(&mut rng).is_some());

        let before = graph.loop_closure_residual();
        assert!(graph.optimize());
        let after = graph.loop_closure_residual();
        assert!(after < before, "residual {before} -> {after}");
        assert!(graph.is_optimized());
    }

    #[test]
    fn test_optimize_shrinks_covariance_in_span() {
        let mut rng = rng();
        let mut graph = driven_graph(16, &mut rng);
        let edge = graph.detect_loop_closure(&mut rng).expect("loop expected");

        let before = graph.covariances()[edge.to].trace();
        graph.optimize();
        assert!(graph.covariances()[edge.to].trace() < before);
    }

    #[test]
    fn test_optimize_without_closures_is_noop() {
        let mut rng = rng();
        let mut graph = driven_graph(5, &mut rng);
        let est_before = graph.est_poses().to_vec();
        assert!(!graph.optimize());
        assert_eq!(graph.est_poses(), &est_before[..]);
        assert!(!graph.is_optimized());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SlamConfig {
            odometry_noise: 8.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SlamConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.odometry_noise, 8.0);
        assert_eq!(back.step_length, config.step_length);
    }

    #[test]
    fn test_mutation_clears_optimized_flag() {
        let mut rng = rng();
        let mut graph = driven_graph(16, &mut rng);
        graph.detect_loop_closure(&mut rng);
        graph.optimize();
        graph.move_robot(&mut rng);
        assert!(!graph.is_optimized());
    }
}
