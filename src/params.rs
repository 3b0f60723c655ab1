use cgmath::{Matrix3, SquareMatrix, Vector3, Zero};
use serde::{Deserialize, Serialize};

use crate::CHANNELS;

/// Cross-channel coupling, `channel_to_channel[src][dst]`.
///
/// A positive coefficient makes `dst` flow towards the neighbor where `src` is
/// larger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f32; 3]; 3]", into = "[[f32; 3]; 3]")]
pub struct Coupling(Matrix3<f32>);

impl Coupling {
    pub fn zero() -> Self {
        Coupling(Matrix3::zero())
    }

    /// Every channel drives only itself.
    pub fn diagonal(value: f32) -> Self {
        Coupling(Matrix3::from_value(value))
    }

    pub fn get(&self, src: usize, dst: usize) -> f32 {
        self.0[src][dst]
    }

    pub fn set(&mut self, src: usize, dst: usize, value: f32) {
        self.0[src][dst] = value;
    }

    /// Contribution to every destination channel given the per-source-channel
    /// signs of the neighbor difference.
    pub fn drive(&self, signs: Vector3<f32>) -> Vector3<f32> {
        // column `src` holds row `src` of channel_to_channel
        self.0 * signs
    }
}

impl Default for Coupling {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[[f32; CHANNELS]; CHANNELS]> for Coupling {
    fn from(m: [[f32; CHANNELS]; CHANNELS]) -> Self {
        Coupling(m.into())
    }
}

impl From<Coupling> for [[f32; CHANNELS]; CHANNELS] {
    fn from(c: Coupling) -> Self {
        c.0.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Fraction of the previous flux kept before new contributions are added.
    pub flux_inertia: f32,
    pub temperature: f32,
    pub random_factor: f32,
    pub channel_to_channel: Coupling,
    /// Steps per host tick. Below 1 means one step every `ceil(1 / rate)` ticks.
    pub steps_per_tick: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            flux_inertia: 0.5,
            temperature: 1.0,
            random_factor: 0.0,
            channel_to_channel: Coupling::zero(),
            steps_per_tick: 0.1,
        }
    }
}
