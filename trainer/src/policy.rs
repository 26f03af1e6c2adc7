//! Dense feed-forward policy used as a trainable decision-maker

use game_core::{Action, DecisionMaker, InvalidAction, Observation, Params};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inputs per observation: paddle y, ball y, horizontal distance
pub const INPUTS: usize = 3;
pub const OUTPUTS: usize = Action::COUNT;

/// One fully connected layer, weights stored row-major by output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    inputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn random<R: Rng + ?Sized>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        Self {
            inputs,
            weights: (0..inputs * outputs)
                .map(|_| rng.gen_range(-1.0..=1.0))
                .collect(),
            biases: (0..outputs).map(|_| rng.gen_range(-1.0..=1.0)).collect(),
        }
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .chunks(self.inputs.max(1))
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }

    fn params_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.weights.iter_mut().chain(self.biases.iter_mut())
    }
}

/// `3 -> [hidden] -> 3` tanh network; the strongest output picks the action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyNet {
    /// Multiplier applied to raw observation values before the first layer
    input_scale: f32,
    layers: Vec<Layer>,
}

impl PolicyNet {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, hidden: Option<usize>) -> Self {
        let layers = match hidden {
            Some(width) if width > 0 => vec![
                Layer::random(INPUTS, width, rng),
                Layer::random(width, OUTPUTS, rng),
            ],
            _ => vec![Layer::random(INPUTS, OUTPUTS, rng)],
        };
        Self {
            input_scale: 1.0 / Params::FIELD_WIDTH,
            layers,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Width of the hidden layer, if any
    pub fn hidden(&self) -> Option<usize> {
        (self.layers.len() > 1).then(|| self.layers[0].outputs())
    }

    /// Shapes chain from `INPUTS` to `OUTPUTS` and every weight is finite
    pub fn is_well_formed(&self) -> bool {
        let mut width = INPUTS;
        for layer in &self.layers {
            if layer.inputs != width || layer.weights.len() != layer.inputs * layer.outputs() {
                return false;
            }
            width = layer.outputs();
        }
        !self.layers.is_empty()
            && width == OUTPUTS
            && self.input_scale.is_finite()
            && self
                .layers
                .iter()
                .all(|l| l.weights.iter().chain(&l.biases).all(|v| v.is_finite()))
    }

    pub fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        let scaled: Vec<f32> = inputs.iter().map(|x| x * self.input_scale).collect();
        self.layers
            .iter()
            .fold(scaled, |activation, layer| layer.forward(&activation))
    }

    /// Perturb each parameter with probability `rate` by up to `power`
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64, power: f32) {
        // NaN passes through clamp, and gen_bool panics on it
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        let power = power.abs();
        for param in self.layers.iter_mut().flat_map(|layer| layer.params_mut()) {
            if rng.gen_bool(rate) {
                *param += rng.gen_range(-power..=power);
            }
        }
    }
}

impl DecisionMaker for PolicyNet {
    fn decide(&mut self, obs: &Observation) -> Result<Action, InvalidAction> {
        Action::from_scores(&self.forward(&obs.as_inputs()))
    }

    fn name(&self) -> &str {
        "policy-net"
    }
}
