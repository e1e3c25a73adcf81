//! Grid search planners: A* and Dijkstra.
//!
//! Both share one best-first machinery; Dijkstra is A* with a zero
//! heuristic. Step costs are Euclidean distances between cell centers
//! scaled by the grid resolution, and the A* heuristic is the straight-line
//! distance to the goal at the same scale, which is admissible on an
//! 8-connected grid. Both planners are therefore optimal and return
//! equal-cost paths; A* simply expands fewer cells.
//!
//! Expanded cells are recorded in expansion order so a front end can replay
//! the search wavefront.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::Vec2;

use crate::grid::{Cell, OccupancyGrid};

/// Result of a planning query.
#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    /// World-coordinate waypoints from start to goal; empty when the goal
    /// is unreachable.
    pub path: Vec<Vec2>,
    /// Cells expanded by the search, in order.
    pub explored: Vec<Cell>,
    /// Tree edges grown by a sampling planner (RRT); empty for grid search.
    pub tree: Vec<(Vec2, Vec2)>,
}

impl PlanResult {
    /// Total world-space length of the returned path.
    pub fn path_cost(&self) -> f32 {
        self.path
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Whether a path was found.
    pub fn reached(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Open-set entry ordered by lowest f-score.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenEntry {
    f: f32,
    cell: Cell,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on f; ties broken arbitrarily but deterministically
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| (self.cell.col, self.cell.row).cmp(&(other.cell.col, other.cell.row)))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search between two world positions.
pub fn astar(grid: &OccupancyGrid, start: Vec2, goal: Vec2) -> PlanResult {
    best_first(grid, start, goal, true)
}

/// Dijkstra search between two world positions.
pub fn dijkstra(grid: &OccupancyGrid, start: Vec2, goal: Vec2) -> PlanResult {
    best_first(grid, start, goal, false)
}

fn best_first(grid: &OccupancyGrid, start: Vec2, goal: Vec2, use_heuristic: bool) -> PlanResult {
    let start_cell = grid.pos_to_cell(start);
    let goal_cell = grid.pos_to_cell(goal);
    let resolution = grid.resolution();

    let heuristic = |cell: &Cell| {
        if use_heuristic {
            cell.distance(&goal_cell) * resolution
        } else {
            0.0
        }
    };

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut g_score: HashMap<Cell, f32> = HashMap::new();
    let mut closed: HashMap<Cell, ()> = HashMap::new();
    let mut explored = Vec::new();

    g_score.insert(start_cell, 0.0);
    open.push(OpenEntry {
        f: heuristic(&start_cell),
        cell: start_cell,
    });

    while let Some(OpenEntry { cell: current, .. }) = open.pop() {
        if closed.contains_key(&current) {
            continue;
        }
        closed.insert(current, ());
        explored.push(current);

        if current == goal_cell {
            return PlanResult {
                path: reconstruct(grid, &came_from, current),
                explored,
                tree: Vec::new(),
            };
        }

        let current_g = g_score[&current];
        for neighbor in grid.neighbors(current) {
            if closed.contains_key(&neighbor) {
                continue;
            }

            let tentative = current_g + current.distance(&neighbor) * resolution;
            let better = g_score
                .get(&neighbor)
                .map(|&g| tentative < g)
                .unwrap_or(true);

            if better {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                open.push(OpenEntry {
                    f: tentative + heuristic(&neighbor),
                    cell: neighbor,
                });
            }
        }
    }

    // goal unreachable
    PlanResult {
        path: Vec::new(),
        explored,
        tree: Vec::new(),
    }
}

fn reconstruct(grid: &OccupancyGrid, came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Vec2> {
    let mut cells = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        current = prev;
        cells.push(current);
    }
    cells.reverse();
    cells.into_iter().map(|c| grid.cell_center(c)).collect()
}
