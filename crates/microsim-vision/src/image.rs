//! Synthetic grid images for the corner-detection demos.
//!
//! Intensities follow the source sims: a flat background of 50 with bright
//! (180-200) shapes drawn on top, on a small n×n grid (16-24 cells in the
//! demos).

/// Built-in test patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPattern {
    /// 4-cell checker blocks alternating 200/50.
    Checkerboard,
    /// A single bright axis-aligned rectangle.
    Rectangle,
    /// An L-shaped bright region (concave corner included).
    LShape,
    /// A small square plus a growing triangle.
    MultipleShapes,
    /// A diamond (Manhattan-distance ball) around the center.
    Diamond,
}

/// A square single-channel intensity image, row-major f32.
#[derive(Debug, Clone, PartialEq)]
pub struct GridImage {
    size: usize,
    data: Vec<f32>,
}

impl GridImage {
    /// A constant image.
    pub fn filled(size: usize, value: f32) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Render one of the built-in patterns at the given grid size.
    pub fn generate(pattern: TestPattern, size: usize) -> Self {
        let mut img = Self::filled(size, 50.0);

        for row in 0..size {
            for col in 0..size {
                let value = match pattern {
                    TestPattern::Checkerboard => {
                        let block = 4;
                        if ((row / block) + (col / block)) % 2 == 0 {
                            200.0
                        } else {
                            50.0
                        }
                    }
                    TestPattern::Rectangle => {
                        let lo = size / 4;
                        let hi = size - size / 4 - 1;
                        if (lo..=hi).contains(&row) && (lo..=hi).contains(&col) {
                            200.0
                        } else {
                            50.0
                        }
                    }
                    TestPattern::LShape => {
                        let a = size / 5;
                        let b = size - size / 4 - 1;
                        let mid = size / 2 + size / 10;
                        let vertical = (a..=b).contains(&row) && (a..=a + size / 5).contains(&col);
                        let horizontal = (mid..=b).contains(&row) && (a..=b).contains(&col);
                        if vertical || horizontal {
                            200.0
                        } else {
                            50.0
                        }
                    }
                    TestPattern::MultipleShapes => {
                        let sq = size * 3 / 20;
                        let sq_hi = sq + size / 5;
                        let tri_lo = size * 3 / 5;
                        let tri_hi = tri_lo + size / 5;
                        let in_square = (sq..=sq_hi).contains(&row) && (sq..=sq_hi).contains(&col);
                        let in_triangle = (tri_lo..=tri_hi).contains(&row)
                            && col >= tri_lo
                            && col <= tri_lo + (row - tri_lo);
                        if in_square {
                            200.0
                        } else if in_triangle {
                            180.0
                        } else {
                            50.0
                        }
                    }
                    TestPattern::Diamond => {
                        let c = size / 2;
                        let dist = row.abs_diff(c) + col.abs_diff(c);
                        if dist <= size * 3 / 10 {
                            200.0
                        } else {
                            50.0
                        }
                    }
                };
                img.set(row, col, value);
            }
        }
        img
    }

    /// Grid dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw row-major intensities.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Intensity at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.size + col]
    }

    /// Intensity with indices clamped to the grid.
    pub fn get_clamped(&self, row: isize, col: isize) -> f32 {
        let r = row.clamp(0, self.size as isize - 1) as usize;
        let c = col.clamp(0, self.size as isize - 1) as usize;
        self.get(r, c)
    }

    /// Set intensity at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.size + col] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_blocks() {
        let img = GridImage::generate(TestPattern::Checkerboard, 16);
        assert_eq!(img.get(0, 0), 200.0);
        assert_eq!(img.get(0, 4), 50.0);
        assert_eq!(img.get(4, 4), 200.0);
    }

    #[test]
    fn test_rectangle_has_bright_interior() {
        let img = GridImage::generate(TestPattern::Rectangle, 20);
        assert_eq!(img.get(10, 10), 200.0);
        assert_eq!(img.get(0, 0), 50.0);
    }

    #[test]
    fn test_diamond_centered() {
        let img = GridImage::generate(TestPattern::Diamond, 20);
        assert_eq!(img.get(10, 10), 200.0);
        assert_eq!(img.get(0, 19), 50.0);
    }

    #[test]
    fn test_clamped_access() {
        let img = GridImage::generate(TestPattern::Rectangle, 8);
        assert_eq!(img.get_clamped(-3, -3), img.get(0, 0));
        assert_eq!(img.get_clamped(99, 99), img.get(7, 7));
    }
}
