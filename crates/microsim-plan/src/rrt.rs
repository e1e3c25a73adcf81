//! Rapidly-exploring Random Tree planner.
//!
//! Goal-biased uniform sampling over the grid's world bounds, fixed-step
//! steering toward each sample, and a segment collision check that probes
//! the occupancy grid every few world units. The tree edges are reported so
//! the front end can draw the growth, exactly like the sim does.

use glam::Vec2;
use log::warn;
use rand::Rng;

use crate::grid::OccupancyGrid;
use crate::search::PlanResult;

/// Tuning parameters for [`rrt`]; defaults match the sim.
#[derive(Debug, Clone)]
pub struct RrtParams {
    /// Sampling attempts before giving up.
    pub max_iterations: usize,
    /// World-unit length of each tree extension.
    pub step_size: f32,
    /// Probability of sampling the goal instead of a uniform point.
    pub goal_bias: f32,
    /// Spacing of the collision probes along a candidate segment.
    pub collision_step: f32,
}

impl Default for RrtParams {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            step_size: 30.0,
            goal_bias: 0.1,
            collision_step: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    pos: Vec2,
    parent: Option<usize>,
}

/// Plan with RRT between two world positions.
///
/// The caller provides the RNG so runs are reproducible under a fixed seed.
/// When the iteration budget runs out without reaching the goal the result
/// carries the grown tree but an empty path.
pub fn rrt(
    grid: &OccupancyGrid,
    start: Vec2,
    goal: Vec2,
    params: &RrtParams,
    rng: &mut impl Rng,
) -> PlanResult {
    let mut nodes = vec![Node {
        pos: start,
        parent: None,
    }];
    let mut explored = Vec::new();

    for _ in 0..params.max_iterations {
        let sample = if rng.random::<f32>() < params.goal_bias {
            goal
        } else {
            Vec2::new(
                rng.random_range(0.0..grid.width()),
                rng.random_range(0.0..grid.height()),
            )
        };

        // nearest node by straight-line distance
        let nearest = nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance(sample)
                    .partial_cmp(&b.pos.distance(sample))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        let from = nodes[nearest].pos;
        let dir = sample - from;
        let angle = dir.y.atan2(dir.x);
        let new_pos = from + Vec2::new(angle.cos(), angle.sin()) * params.step_size;

        if segment_collides(grid, from, new_pos, params.collision_step) {
            continue;
        }

        let new_idx = nodes.len();
        nodes.push(Node {
            pos: new_pos,
            parent: Some(nearest),
        });
        explored.push(grid.pos_to_cell(new_pos));

        if new_pos.distance(goal) < params.step_size {
            nodes.push(Node {
                pos: goal,
                parent: Some(new_idx),
            });
            return PlanResult {
                path: extract_path(&nodes),
                explored,
                tree: tree_edges(&nodes),
            };
        }
    }

    warn!(
        "rrt: goal not reached after {} iterations ({} nodes grown)",
        params.max_iterations,
        nodes.len()
    );
    PlanResult {
        path: Vec::new(),
        explored,
        tree: tree_edges(&nodes),
    }
}

/// Probe the segment every `step` world units against the grid.
fn segment_collides(grid: &OccupancyGrid, a: Vec2, b: Vec2, step: f32) -> bool {
    let steps = (a.distance(b) / step).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        if grid.pos_blocked(a.lerp(b, t)) {
            return true;
        }
    }
    false
}

fn extract_path(nodes: &[Node]) -> Vec<Vec2> {
    let mut path = Vec::new();
    let mut current = nodes.len().checked_sub(1);
    while let Some(idx) = current {
        path.push(nodes[idx].pos);
        current = nodes[idx].parent;
    }
    path.reverse();
    path
}

fn tree_edges(nodes: &[Node]) -> Vec<(Vec2, Vec2)> {
    nodes
        .iter()
        .filter_map(|n| n.parent.map(|p| (nodes[p].pos, n.pos)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_reaches_goal_on_open_grid() {
        let grid = OccupancyGrid::new(40, 30, 20.0).unwrap();
        let start = Vec2::new(60.0, 300.0);
        let goal = Vec2::new(740.0, 300.0);

        let result = rrt(&grid, start, goal, &RrtParams::default(), &mut rng());
        assert!(result.reached());
        assert_eq!(*result.path.first().unwrap(), start);
        assert_eq!(*result.path.last().unwrap(), goal);
    }

    #[test]
    fn test_path_segments_collision_free() {
        let mut grid = OccupancyGrid::new(40, 30, 20.0).unwrap();
        grid.mark_rect(Vec2::new(300.0, 0.0), Vec2::new(340.0, 400.0));
        let start = Vec2::new(60.0, 300.0);
        let goal = Vec2::new(740.0, 300.0);

        let result = rrt(&grid, start, goal, &RrtParams::default(), &mut rng());
        assert!(result.reached());
        for w in result.path.windows(2) {
            assert!(
                !segment_collides(&grid, w[0], w[1], 5.0),
                "path segment crosses an obstacle"
            );
        }
    }

    #[test]
    fn test_walled_in_start_exhausts_budget() {
        let mut grid = OccupancyGrid::new(20, 20, 10.0).unwrap();
        // box the start in completely
        for col in 2..=6 {
            grid.occupy(Cell { col, row: 2 });
            grid.occupy(Cell { col, row: 6 });
        }
        for row in 2..=6 {
            grid.occupy(Cell { col: 2, row });
            grid.occupy(Cell { col: 6, row });
        }

        let params = RrtParams {
            max_iterations: 200,
            ..Default::default()
        };
        let result = rrt(
            &grid,
            Vec2::new(45.0, 45.0),
            Vec2::new(180.0, 180.0),
            &params,
            &mut rng(),
        );
        assert!(!result.reached());
    }

    #[test]
    fn test_tree_edges_rooted_at_start() {
        let grid = OccupancyGrid::new(40, 30, 20.0).unwrap();
        let start = Vec2::new(60.0, 300.0);
        let result = rrt(
            &grid,
            start,
            Vec2::new(740.0, 300.0),
            &RrtParams::default(),
            &mut rng(),
        );
        assert!(!result.tree.is_empty());
        assert!(result.tree.iter().any(|(from, _)| *from == start));
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        let grid = OccupancyGrid::new(40, 30, 20.0).unwrap();
        let start = Vec2::new(60.0, 300.0);
        let goal = Vec2::new(740.0, 300.0);

        let a = rrt(&grid, start, goal, &RrtParams::default(), &mut rng());
        let b = rrt(&grid, start, goal, &RrtParams::default(), &mut rng());
        assert_eq!(a.path, b.path);
    }
}
