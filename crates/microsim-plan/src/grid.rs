//! Occupancy grid with world-coordinate mapping.
//!
//! The planners work on a small uniform grid of free/occupied cells; world
//! positions (the canvas coordinates of the sims) map to cells through a
//! fixed resolution in world units per cell. Positions outside the grid
//! clamp to the border cell, matching the way the sims constrain their
//! draggable start/goal markers.

use glam::Vec2;

use crate::PlanError;

/// A cell address, column-major like the sims index their grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column index.
    pub col: usize,
    /// Row index.
    pub row: usize,
}

impl Cell {
    /// Euclidean distance between cell centers, in cell units.
    pub fn distance(&self, other: &Cell) -> f32 {
        let dc = self.col as f32 - other.col as f32;
        let dr = self.row as f32 - other.row as f32;
        (dc * dc + dr * dr).sqrt()
    }
}

/// A rectangular occupancy grid.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    resolution: f32,
    occupied: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-free grid of `cols` × `rows` cells, each `resolution` world
    /// units across.
    pub fn new(cols: usize, rows: usize, resolution: f32) -> Result<Self, PlanError> {
        if cols == 0 || rows == 0 {
            return Err(PlanError::EmptyGrid { cols, rows });
        }
        if resolution <= 0.0 {
            return Err(PlanError::BadResolution(resolution));
        }
        Ok(Self {
            cols,
            rows,
            resolution,
            occupied: vec![false; cols * rows],
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// World units per cell.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Grid width in world units.
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.resolution
    }

    /// Grid height in world units.
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.resolution
    }

    /// Whether a cell is free. Out-of-range addresses count as blocked.
    pub fn is_free(&self, cell: Cell) -> bool {
        cell.col < self.cols && cell.row < self.rows && !self.occupied[cell.col * self.rows + cell.row]
    }

    /// Mark a single cell occupied.
    pub fn occupy(&mut self, cell: Cell) {
        if cell.col < self.cols && cell.row < self.rows {
            self.occupied[cell.col * self.rows + cell.row] = true;
        }
    }

    /// Rasterize a world-coordinate axis-aligned rectangle as occupied.
    pub fn mark_rect(&mut self, min: Vec2, max: Vec2) {
        let lo = self.pos_to_cell(min);
        let hi = self.pos_to_cell(max);
        for col in lo.col..=hi.col {
            for row in lo.row..=hi.row {
                self.occupied[col * self.rows + row] = true;
            }
        }
    }

    /// The cell containing a world position, clamped to the grid.
    pub fn pos_to_cell(&self, pos: Vec2) -> Cell {
        let col = (pos.x / self.resolution).floor();
        let row = (pos.y / self.resolution).floor();
        Cell {
            col: (col.max(0.0) as usize).min(self.cols - 1),
            row: (row.max(0.0) as usize).min(self.rows - 1),
        }
    }

    /// World position of a cell center.
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            cell.col as f32 * self.resolution + self.resolution / 2.0,
            cell.row as f32 * self.resolution + self.resolution / 2.0,
        )
    }

    /// Whether a world position falls in an occupied cell.
    pub fn pos_blocked(&self, pos: Vec2) -> bool {
        let col = (pos.x / self.resolution).floor();
        let row = (pos.y / self.resolution).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            // outside the grid is neither free nor an obstacle hit
            return false;
        }
        self.occupied[col as usize * self.rows + row as usize]
    }

    /// The free 8-connected neighbors of a cell.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        const DIRS: [(isize, isize); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];

        let mut out = Vec::with_capacity(8);
        for (dc, dr) in DIRS {
            let nc = cell.col as isize + dc;
            let nr = cell.row as isize + dr;
            if nc < 0 || nr < 0 {
                continue;
            }
            let neighbor = Cell {
                col: nc as usize,
                row: nr as usize,
            };
            if self.is_free(neighbor) {
                out.push(neighbor);
            }
        }
        out
    }
}
