//! Animates a bitmap by moving color intensity between neighboring pixels.
//!
//! Every pixel owns a flux accumulator towards each of its four neighbors on a
//! wrap-around grid. A step decays those accumulators, pushes them by the sign of
//! the neighbor difference through a 3x3 channel coupling matrix, adds noise and
//! moves the flux from the cell to the neighbor. The [`Engine`] drives steps from
//! host ticks and quantizes the result back to RGB8.

pub mod bitmap;
pub mod engine;
pub mod error;
pub mod flux;
pub mod grid;
pub mod params;
pub mod quantize;
pub mod schedule;
pub mod state;

pub use bitmap::{Bitmap, Rgb8};
pub use engine::{Engine, Host};
pub use error::{Error, Result};
pub use grid::{Direction, Grid, NeighborTable};
pub use params::{Coupling, SimulationParameters};
pub use schedule::TickScheduler;
pub use state::{ChannelState, FluxAccumulator};

/// Number of color channels (R, G, B).
pub const CHANNELS: usize = 3;
