//! Dense tanh layer used to build controller networks.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single fully connected layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases drawn from `[-scale, scale]`.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-scale, scale)),
            biases: Array1::random(output_size, Uniform::new(-scale, scale)),
        }
    }

    /// Input width.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Output width.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Whether the bias vector matches the weight matrix.
    pub fn is_well_formed(&self) -> bool {
        self.biases.len() == self.weights.nrows()
    }

    /// Forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Perturbs each parameter with probability `rate` by uniform noise in
    /// `[-scale, scale)`.
    pub fn mutate(&mut self, rate: f32, scale: f32) {
        if scale <= 0.0 {
            return;
        }
        let mut rng = rand::rng();
        let mut perturb = |v: f32| {
            if rng.random::<f32>() < rate {
                v + rng.random_range(-scale..scale)
            } else {
                v
            }
        };
        self.weights.mapv_inplace(&mut perturb);
        self.biases.mapv_inplace(&mut perturb);
    }

    /// Blends two parents parameter by parameter: `weight1 * a + (1 - weight1) * b`.
    pub fn crossover_weighted(parent1: &Mlp, parent2: &Mlp, weight1: f32) -> Self {
        let weight2 = 1.0 - weight1;
        Self {
            weights: &parent1.weights * weight1 + &parent2.weights * weight2,
            biases: &parent1.biases * weight1 + &parent2.biases * weight2,
        }
    }
}
