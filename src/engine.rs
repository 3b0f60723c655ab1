use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::flux;
use crate::grid::{Grid, NeighborTable};
use crate::params::SimulationParameters;
use crate::quantize::quantize_into;
use crate::schedule::TickScheduler;
use crate::state::{ChannelState, FluxAccumulator};

/// Receives every presented frame.
pub trait Host {
    fn present(&mut self, frame: &Bitmap);
}

impl<F: FnMut(&Bitmap)> Host for F {
    fn present(&mut self, frame: &Bitmap) {
        self(frame)
    }
}

/// Owns the simulation buffers and drives them from host ticks.
#[derive(Debug, Clone)]
pub struct Engine {
    params: SimulationParameters,
    neighbors: NeighborTable,
    state: ChannelState,
    flux: FluxAccumulator,
    scheduler: TickScheduler,
    frame: Bitmap,
    rng: StdRng,
}

impl Engine {
    /// Start from `bitmap` with an entropy-seeded noise source.
    pub fn new(bitmap: &Bitmap, params: SimulationParameters) -> Self {
        Self::with_rng(bitmap, params, StdRng::from_entropy())
    }

    /// Start from `bitmap`; the same seed and parameters give the same frames.
    pub fn with_seed(bitmap: &Bitmap, params: SimulationParameters, seed: u64) -> Self {
        Self::with_rng(bitmap, params, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(bitmap: &Bitmap, params: SimulationParameters, rng: StdRng) -> Self {
        let grid = bitmap.grid();
        info!(width = grid.width(), height = grid.height(), "configured from bitmap");

        Self::from_state(grid, ChannelState::from_bitmap(bitmap), params, rng)
    }

    /// Start from a `width`x`height` grid of random colors.
    pub fn random(
        width: usize,
        height: usize,
        params: SimulationParameters,
        seed: Option<u64>,
    ) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = ChannelState::random(grid, &mut rng);
        info!(width, height, "configured with random colors");

        Ok(Self::from_state(grid, state, params, rng))
    }

    fn from_state(
        grid: Grid,
        state: ChannelState,
        params: SimulationParameters,
        rng: StdRng,
    ) -> Self {
        let mut engine = Self {
            params,
            neighbors: NeighborTable::build(grid),
            state,
            flux: FluxAccumulator::zeros(grid),
            scheduler: TickScheduler::new(),
            frame: Bitmap::blank(grid),
            rng,
        };
        quantize_into(&engine.state, &mut engine.frame);
        engine
    }

    /// Replace the simulated image. The neighbor table is rebuilt only when the
    /// dimensions change.
    pub fn configure(&mut self, bitmap: &Bitmap) {
        let grid = bitmap.grid();

        if grid != self.neighbors.grid() {
            debug!(width = grid.width(), height = grid.height(), "rebuilding neighbor table");
            self.neighbors = NeighborTable::build(grid);
            self.frame = Bitmap::blank(grid);
        }

        self.state = ChannelState::from_bitmap(bitmap);
        self.flux = FluxAccumulator::zeros(grid);
        self.scheduler.reset();
        quantize_into(&self.state, &mut self.frame);

        info!(width = grid.width(), height = grid.height(), "configured from bitmap");
    }

    /// Refill every cell with random colors and clear the flux.
    pub fn reset_random(&mut self) {
        self.state.fill_random(&mut self.rng);
        self.flux.reset();
        quantize_into(&self.state, &mut self.frame);

        info!(cells = self.state.total_cells(), "reset to random colors");
    }

    /// Run one simulation step regardless of the tick rate.
    pub fn step(&mut self) {
        flux::step(
            &mut self.state,
            &mut self.flux,
            &self.neighbors,
            &self.params,
            &mut self.rng,
        );
    }

    fn advance(&mut self) -> u32 {
        let steps = self.scheduler.advance(self.params.steps_per_tick);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// Advance according to `steps_per_tick` and return the quantized frame.
    pub fn tick(&mut self) -> &Bitmap {
        let steps = self.advance();
        quantize_into(&self.state, &mut self.frame);
        trace!(steps, "tick");

        &self.frame
    }

    /// Like [`Engine::tick`], handing the frame to `host`. Returns the number of
    /// steps run.
    pub fn tick_with<H: Host + ?Sized>(&mut self, host: &mut H) -> u32 {
        let steps = self.advance();
        quantize_into(&self.state, &mut self.frame);
        trace!(steps, "tick");
        host.present(&self.frame);

        steps
    }

    /// Like [`Engine::tick`], writing the frame into `out`, which must have the
    /// engine's dimensions.
    pub fn tick_into(&mut self, out: &mut Bitmap) -> u32 {
        assert_eq!(out.grid(), self.grid());

        let steps = self.advance();
        quantize_into(&self.state, &mut self.frame);
        out.pixels_mut().copy_from_slice(self.frame.pixels());
        trace!(steps, "tick");

        steps
    }

    pub fn grid(&self) -> Grid {
        self.neighbors.grid()
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn parameters_mut(&mut self) -> &mut SimulationParameters {
        &mut self.params
    }

    pub fn set_parameters(&mut self, params: SimulationParameters) {
        debug!(?params, "parameters replaced");
        self.params = params;
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    pub fn flux(&self) -> &FluxAccumulator {
        &self.flux
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    /// The last presented frame.
    pub fn frame(&self) -> &Bitmap {
        &self.frame
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::Coupling;
    use crate::CHANNELS;
    use approx::assert_relative_eq;

    fn lively() -> SimulationParameters {
        SimulationParameters {
            flux_inertia: 0.6,
            temperature: 1.0,
            random_factor: 0.5,
            channel_to_channel: [[0.2, 0.0, -0.3], [0.1, 0.4, 0.0], [0.0, -0.2, 0.3]].into(),
            steps_per_tick: 1.0,
        }
    }

    #[test]
    fn test_random_rejects_empty_grid() {
        assert!(Engine::random(0, 3, SimulationParameters::default(), Some(1)).is_err());
        assert!(Engine::random(3, 0, SimulationParameters::default(), Some(1)).is_err());
    }

    #[test]
    fn test_initial_frame_is_the_bitmap() {
        let bitmap = Bitmap::new(2, 1, vec![[1, 2, 3], [4, 5, 6]]).unwrap();
        let engine = Engine::with_seed(&bitmap, SimulationParameters::default(), 0);

        assert_eq!(engine.frame(), &bitmap);
    }

    #[test]
    fn test_uniform_2x2_scenario() {
        let bitmap = Bitmap::from_elem(2, 2, [100, 100, 100]).unwrap();
        let params = SimulationParameters {
            random_factor: 0.0,
            channel_to_channel: Coupling::zero(),
            steps_per_tick: 3.0,
            ..Default::default()
        };
        let mut engine = Engine::with_seed(&bitmap, params, 0);

        for _ in 0..10 {
            assert_eq!(engine.tick(), &bitmap);
        }
    }

    #[test]
    fn test_tick_with_presents_every_tick() {
        let mut engine = Engine::random(4, 4, lively(), Some(3)).unwrap();
        engine.parameters_mut().steps_per_tick = 0.25;

        let mut presented = 0;
        let mut steps = 0;
        let mut host = |frame: &Bitmap| {
            assert_eq!(frame.pixels().len(), 16);
            presented += 1;
        };

        for _ in 0..8 {
            steps += engine.tick_with(&mut host);
        }

        assert_eq!(presented, 8);
        assert_eq!(steps, 2);
    }

    #[test]
    fn test_tick_into_matches_tick() {
        let mut a = Engine::random(5, 3, lively(), Some(11)).unwrap();
        let mut b = a.clone();
        let mut out = Bitmap::from_elem(5, 3, [0, 0, 0]).unwrap();

        for _ in 0..4 {
            assert_eq!(b.tick_into(&mut out), 1);
            assert_eq!(a.tick(), &out);
            assert_eq!(b.frame(), &out);
        }
    }

    #[test]
    fn test_seeded_engines_match() {
        let run = || {
            let mut engine = Engine::random(6, 6, lively(), Some(5)).unwrap();
            engine.reset_random();
            for _ in 0..6 {
                engine.tick();
            }
            engine.frame().clone()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_noise_draws_do_not_depend_on_random_factor() {
        let draw_after_step = |random_factor: f32| {
            let params = SimulationParameters {
                random_factor,
                ..lively()
            };
            let mut engine = Engine::random(5, 4, params, Some(21)).unwrap();
            engine.step();
            engine.reset_random();
            engine.state().clone()
        };

        assert_eq!(draw_after_step(0.0), draw_after_step(0.7));
    }

    #[test]
    fn test_reset_random_clears_flux() {
        let mut engine = Engine::random(4, 3, lively(), Some(8)).unwrap();
        for _ in 0..3 {
            engine.step();
        }
        assert!(engine.flux().as_array().iter().any(|&f| f != 0.0));

        engine.reset_random();

        assert!(engine.flux().as_array().iter().all(|&f| f == 0.0));
        assert!(engine
            .state()
            .current()
            .iter()
            .all(|&v| v >= 0.0 && v < 256.0));
    }

    #[test]
    fn test_configure_rebuilds_topology_on_resize() {
        let mut engine = Engine::random(4, 4, lively(), Some(2)).unwrap();
        engine.step();

        let bitmap = Bitmap::from_elem(3, 2, [9, 8, 7]).unwrap();
        engine.configure(&bitmap);

        assert_eq!(engine.grid(), bitmap.grid());
        assert_eq!(engine.neighbors().len(), 6);
        assert_eq!(engine.flux().total_cells(), 6);
        assert_eq!(engine.frame(), &bitmap);

        let params = SimulationParameters {
            random_factor: 0.0,
            ..lively()
        };
        engine.set_parameters(params);
        let before: Vec<f64> = (0..CHANNELS).map(|c| engine.state().channel_sum(c)).collect();
        for _ in 0..5 {
            engine.tick();
        }
        for c in 0..CHANNELS {
            assert_relative_eq!(engine.state().channel_sum(c), before[c], max_relative = 1e-4);
        }
    }
}
