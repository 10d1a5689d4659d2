//! Feed-forward neural controller evolved by the bundled optimizer.
//!
//! A brain is a stack of [`Mlp`] layers with tanh activation. It supports the
//! genetic operators the population needs: mutation and weighted crossover.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::controller::Controller;

pub mod mlp;

pub use mlp::Mlp;

/// A multi-layer perceptron mapping radar readings to turn/throttle outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// `layer_sizes` lists every layer width including input and output and
    /// must hold at least two entries.
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale))
            .collect();

        Self { layers }
    }

    /// Number of inputs the first layer accepts.
    pub fn num_inputs(&self) -> usize {
        self.layers.first().map_or(0, Mlp::input_size)
    }

    /// Number of outputs the last layer produces.
    pub fn num_outputs(&self) -> usize {
        self.layers.last().map_or(0, Mlp::output_size)
    }

    /// Full layer widths, input to output, or `None` when the layers do not
    /// chain (a layer's input width differs from the previous output width).
    pub fn layer_sizes(&self) -> Option<Vec<usize>> {
        let first = self.layers.first()?;
        let mut sizes = vec![first.input_size()];
        for layer in &self.layers {
            if !layer.is_well_formed() || sizes.last() != Some(&layer.input_size()) {
                return None;
            }
            sizes.push(layer.output_size());
        }
        Some(sizes)
    }

    /// Runs a forward pass through all layers.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Creates a child by weighted averaging of two parents with the same topology.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover_weighted(layer1, layer2, weight1))
            .collect();

        Self { layers }
    }

    /// Mutates every layer.
    pub fn mutate(&mut self, rate: f32, scale: f32) {
        for layer in &mut self.layers {
            layer.mutate(rate, scale);
        }
    }
}

impl Controller for Brain {
    fn activate(&self, inputs: &Array1<f32>) -> Array1<f32> {
        self.think(inputs)
    }
}
