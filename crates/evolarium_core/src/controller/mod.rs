//! Feed-forward neural controller.
//!
//! The genome is an ordered list of dense layers. Input width is fixed at
//! [`SENSOR_COUNT`] and output width at [`ACTION_COUNT`]; hidden widths come
//! from [`ControllerConfig`]. Every operation checks that the layer shapes
//! chain and fails with [`SimError`](crate::error::SimError) otherwise.

pub mod crossover;
pub mod forward;
pub mod mutation;

use crate::config::ControllerConfig;
use crate::error::Result;
use evolarium_data::{Controller, Layer};
use rand::Rng;
use rand_distr::StandardNormal;

pub const INPUT_LABELS: [&str; 16] = [
    "Energy",
    "FoodDist",
    "FoodBearing",
    "AgentDist",
    "ObstacleDist",
    "PosX",
    "PosY",
    "Heading",
    "TargetDist",
    "TargetBearing",
    "RedKey",
    "GoldKey",
    "DoorOpen",
    "Tool",
    "FoodLeft",
    "TreeDist",
];

pub const OUTPUT_LABELS: [&str; 4] = ["Forward", "TurnLeft", "TurnRight", "Eat"];

pub const SENSOR_COUNT: usize = INPUT_LABELS.len();
pub const ACTION_COUNT: usize = OUTPUT_LABELS.len();

/// Weights and biases are kept inside `[-WEIGHT_LIMIT, WEIGHT_LIMIT]`.
pub const WEIGHT_LIMIT: f32 = 5.0;

pub trait ControllerLogic: Sized {
    fn new_random(config: &ControllerConfig) -> Self;
    fn new_random_with_rng<R: Rng>(config: &ControllerConfig, rng: &mut R) -> Self;
    /// Checks that the layers chain from sensors to actions.
    fn validate(&self) -> Result<()>;
    fn forward(&self, inputs: &[f32]) -> Result<[f32; ACTION_COUNT]>;
    /// Applies Gaussian noise to each gene with probability `rate`.
    /// Returns the number of genes changed.
    fn mutate_with_rng<R: Rng>(&mut self, rate: f64, sigma: f64, rng: &mut R) -> usize;
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self>;
}

impl ControllerLogic for Controller {
    fn new_random(config: &ControllerConfig) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_random_with_rng(config, &mut rng)
    }

    fn new_random_with_rng<R: Rng>(config: &ControllerConfig, rng: &mut R) -> Self {
        let mut widths = Vec::with_capacity(config.hidden_layers.len() + 2);
        widths.push(SENSOR_COUNT);
        widths.extend(config.hidden_layers.iter().copied());
        widths.push(ACTION_COUNT);

        let layers = widths
            .windows(2)
            .map(|pair| random_layer(pair[0], pair[1], config, rng))
            .collect();
        Controller { layers }
    }

    fn validate(&self) -> Result<()> {
        forward::validate_shape(self)
    }

    fn forward(&self, inputs: &[f32]) -> Result<[f32; ACTION_COUNT]> {
        forward::forward(self, inputs)
    }

    fn mutate_with_rng<R: Rng>(&mut self, rate: f64, sigma: f64, rng: &mut R) -> usize {
        mutation::mutate(self, rate, sigma, rng)
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        crossover::uniform(self, other, rng)
    }
}

fn random_layer<R: Rng>(
    inputs: usize,
    outputs: usize,
    config: &ControllerConfig,
    rng: &mut R,
) -> Layer {
    let mut layer = Layer::zeroed(inputs, outputs);
    for w in &mut layer.weights {
        let z: f32 = rng.sample(StandardNormal);
        *w = (z * config.init_weight_std).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
    }
    for b in &mut layer.biases {
        let z: f32 = rng.sample(StandardNormal);
        *b = (z * config.init_bias_std).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
    }
    layer
}
