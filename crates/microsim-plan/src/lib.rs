#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod grid;
mod rrt;
mod search;

pub use grid::{Cell, OccupancyGrid};
pub use rrt::{rrt, RrtParams};
pub use search::{astar, dijkstra, PlanResult};

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

/// Planner selection, one variant per algorithm toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Planner {
    /// Best-first search with a Euclidean heuristic.
    AStar,
    /// Best-first search with no heuristic.
    Dijkstra,
    /// Rapidly-exploring random tree.
    Rrt,
}

impl Planner {
    /// Run the selected planner. The RNG is only consumed by [`Planner::Rrt`];
    /// the graph searches are deterministic.
    pub fn plan(
        &self,
        grid: &OccupancyGrid,
        start: Vec2,
        goal: Vec2,
        rng: &mut impl Rng,
    ) -> PlanResult {
        match self {
            Planner::AStar => astar(grid, start, goal),
            Planner::Dijkstra => dijkstra(grid, start, goal),
            Planner::Rrt => rrt(grid, start, goal, &RrtParams::default(), rng),
        }
    }
}

/// Error types for the planners.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Grid with zero rows or columns.
    #[error("occupancy grid must have at least one cell, got {cols}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        cols: usize,
        /// Requested row count.
        rows: usize,
    },

    /// Non-positive cell resolution.
    #[error("grid resolution must be positive, got {0}")]
    BadResolution(f32),
}
