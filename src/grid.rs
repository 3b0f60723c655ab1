use ndarray::{Array, Array2};

use crate::error::{Error, Result};

/// Validated grid dimensions. Cells are addressed row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        match width.checked_mul(height) {
            Some(total) if total > 0 => {}
            _ => return Err(Error::InvalidDimensions { width, height }),
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    pub fn index(&self, (x, y): (usize, usize)) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Top = 2,
    Bottom = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }
}

/// For every cell, the indices of its left, right, top and bottom neighbors with
/// wrap-around on both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    grid: Grid,
    neighbors: Array2<usize>,
}

impl NeighborTable {
    pub fn build(grid: Grid) -> Self {
        let width = grid.width();
        let total = grid.total_cells();

        let neighbors = Array::from_shape_fn((total, 4), |(i, d)| match d {
            0 if i % width != 0 => i - 1,
            0 => i + width - 1,
            1 if i % width != width - 1 => i + 1,
            1 => i + 1 - width,
            2 if i >= width => i - width,
            2 => i + total - width,
            3 if i < total - width => i + width,
            _ => i + width - total,
        });

        Self { grid, neighbors }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.neighbors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn neighbor(&self, cell: usize, direction: Direction) -> usize {
        self.neighbors[[cell, direction as usize]]
    }

    /// Neighbors of every cell, shape `(total_cells, 4)` in [`Direction::ALL`] order.
    pub fn as_array(&self) -> &Array2<usize> {
        &self.neighbors
    }
}
