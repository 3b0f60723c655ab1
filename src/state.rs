use ndarray::{Array, Array2, Array3, ArrayView1, Axis};
use rand::Rng;

use crate::bitmap::Bitmap;
use crate::grid::{Direction, Grid};
use crate::CHANNELS;

/// Unbounded per-channel intensities, shape `(CHANNELS, total_cells)`.
///
/// `new` is the current state and is updated in place by a step; `old` is the
/// snapshot the step reads neighbor differences from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    old: Array2<f32>,
    new: Array2<f32>,
}

impl ChannelState {
    pub fn zeros(grid: Grid) -> Self {
        let new = Array::zeros((CHANNELS, grid.total_cells()));

        Self {
            old: new.clone(),
            new,
        }
    }

    /// Channel values of `bitmap` cast to float, unscaled.
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        let pixels = bitmap.pixels();
        let new = Array::from_shape_fn((CHANNELS, pixels.len()), |(c, i)| pixels[i][c] as f32);

        Self {
            old: new.clone(),
            new,
        }
    }

    /// Every channel of every cell drawn uniformly from `0..256`.
    pub fn random<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Self {
        let mut state = Self::zeros(grid);
        state.fill_random(rng);
        state
    }

    pub fn fill_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.total_cells() {
            for c in 0..CHANNELS {
                self.new[[c, i]] = rng.gen::<u8>() as f32;
            }
        }
        self.old.assign(&self.new);
    }

    pub fn total_cells(&self) -> usize {
        self.new.ncols()
    }

    pub fn current(&self) -> &Array2<f32> {
        &self.new
    }

    pub fn previous(&self) -> &Array2<f32> {
        &self.old
    }

    pub fn channel(&self, c: usize) -> ArrayView1<'_, f32> {
        self.new.index_axis(Axis(0), c)
    }

    pub fn cell(&self, i: usize) -> [f32; CHANNELS] {
        [self.new[[0, i]], self.new[[1, i]], self.new[[2, i]]]
    }

    pub fn set_cell(&mut self, i: usize, value: [f32; CHANNELS]) {
        for (c, v) in value.iter().enumerate() {
            self.new[[c, i]] = *v;
        }
    }

    /// Sum of channel `c` over the whole grid.
    pub fn channel_sum(&self, c: usize) -> f64 {
        self.channel(c).iter().map(|&v| v as f64).sum()
    }

    /// Copies the current state into the snapshot and hands out both for a step.
    pub(crate) fn begin_step(&mut self) -> (&Array2<f32>, &mut Array2<f32>) {
        self.old.assign(&self.new);
        (&self.old, &mut self.new)
    }
}

/// Signed intensity in flight from each cell towards each neighbor, shape
/// `(total_cells, 4, CHANNELS)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxAccumulator {
    flux: Array3<f32>,
}

impl FluxAccumulator {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            flux: Array::zeros((grid.total_cells(), Direction::ALL.len(), CHANNELS)),
        }
    }

    pub fn reset(&mut self) {
        self.flux.fill(0.0);
    }

    pub fn total_cells(&self) -> usize {
        self.flux.len_of(Axis(0))
    }

    pub fn get(&self, cell: usize, direction: Direction, c: usize) -> f32 {
        self.flux[[cell, direction as usize, c]]
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.flux
    }

    pub(crate) fn as_array_mut(&mut self) -> &mut Array3<f32> {
        &mut self.flux
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_bitmap() {
        let bitmap = Bitmap::new(2, 1, vec![[1, 2, 3], [255, 0, 128]]).unwrap();
        let state = ChannelState::from_bitmap(&bitmap);

        assert_eq!(state.total_cells(), 2);
        assert_eq!(state.cell(0), [1.0, 2.0, 3.0]);
        assert_eq!(state.cell(1), [255.0, 0.0, 128.0]);
        assert_eq!(state.current(), state.previous());
    }

    #[test]
    fn test_random_fills_every_cell_in_byte_range() {
        let grid = Grid::new(16, 16).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let state = ChannelState::random(grid, &mut rng);

        assert!(state
            .current()
            .iter()
            .all(|&v| v >= 0.0 && v < 256.0 && v.fract() == 0.0));
        // 768 draws from 0..256 are never all equal in practice
        let first = state.current()[[0, 0]];
        assert!(state.current().iter().any(|&v| v != first));
    }

    #[test]
    fn test_random_is_reproducible() {
        let grid = Grid::new(5, 3).unwrap();
        let a = ChannelState::random(grid, &mut StdRng::seed_from_u64(42));
        let b = ChannelState::random(grid, &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn test_channel_sum() {
        let bitmap = Bitmap::from_elem(3, 3, [10, 20, 30]).unwrap();
        let state = ChannelState::from_bitmap(&bitmap);

        assert_abs_diff_eq!(state.channel_sum(0), 90.0);
        assert_abs_diff_eq!(state.channel_sum(1), 180.0);
        assert_abs_diff_eq!(state.channel_sum(2), 270.0);
    }

    #[test]
    fn test_flux_starts_at_zero() {
        let flux = FluxAccumulator::zeros(Grid::new(4, 2).unwrap());

        assert_eq!(flux.as_array().dim(), (8, 4, CHANNELS));
        assert!(flux.as_array().iter().all(|&f| f == 0.0));
    }
}
