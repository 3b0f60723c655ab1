use crate::error::{Error, Result};
use crate::grid::Grid;

pub type Rgb8 = [u8; 3];

/// Row-major RGB8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    grid: Grid,
    pixels: Vec<Rgb8>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb8>) -> Result<Self> {
        let grid = Grid::new(width, height)?;

        if pixels.len() != grid.total_cells() {
            return Err(Error::PixelCount {
                expected: grid.total_cells(),
                actual: pixels.len(),
            });
        }

        Ok(Self { grid, pixels })
    }

    pub fn from_elem(width: usize, height: usize, pixel: Rgb8) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        Self::new(width, height, vec![pixel; grid.total_cells()])
    }

    pub(crate) fn blank(grid: Grid) -> Self {
        Self {
            grid,
            pixels: vec![[0; 3]; grid.total_cells()],
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb8] {
        &mut self.pixels
    }

    pub fn get(&self, (x, y): (usize, usize)) -> Rgb8 {
        self.pixels[self.grid.index((x, y))]
    }
}
