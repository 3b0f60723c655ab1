use cgmath::vec3;
use rand::Rng;

use crate::grid::NeighborTable;
use crate::params::SimulationParameters;
use crate::state::{ChannelState, FluxAccumulator};
use crate::CHANNELS;

/// `+1`, `-1` or `0`. Unlike `f32::signum`, zero maps to zero.
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Advance `state` by one step.
///
/// For every cell and direction the retained flux is decayed by `flux_inertia`,
/// pushed by `temperature * channel_to_channel[src][dst] * sign(old[src][n] - old[src][i])`
/// summed over source channels, perturbed by `temperature * random_factor * U(-1, 1)`
/// and then moved from the cell to its neighbor. Flux always leaves one cell and
/// enters exactly one other, so each channel's total is conserved.
///
/// Values are not clamped.
pub fn step<R: Rng + ?Sized>(
    state: &mut ChannelState,
    flux: &mut FluxAccumulator,
    neighbors: &NeighborTable,
    params: &SimulationParameters,
    rng: &mut R,
) {
    assert_eq!(state.total_cells(), neighbors.len());
    assert_eq!(flux.total_cells(), neighbors.len());

    let (old, new) = state.begin_step();
    let flux = flux.as_array_mut();

    let inertia = params.flux_inertia;
    let temperature = params.temperature;
    let noise = temperature * params.random_factor;

    for (i, row) in neighbors.as_array().outer_iter().enumerate() {
        for (d, &n) in row.iter().enumerate() {
            let signs = vec3(
                sign(old[[0, n]] - old[[0, i]]),
                sign(old[[1, n]] - old[[1, i]]),
                sign(old[[2, n]] - old[[2, i]]),
            );
            let drive = params.channel_to_channel.drive(signs) * temperature;

            for dst in 0..CHANNELS {
                let f = &mut flux[[i, d, dst]];

                *f *= inertia;
                *f += drive[dst];
                *f += noise * rng.gen_range(-1.0f32..=1.0);

                new[[dst, i]] -= *f;
                new[[dst, n]] += *f;
            }
        }
    }
}
