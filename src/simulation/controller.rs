//! The policy interface between the simulation and the optimizer.

use ndarray::Array1;

/// Number of outputs the simulation reads from a controller.
pub const NUM_OUTPUTS: usize = 3;

/// Maps one sensor vector to one output vector.
///
/// Inputs are ordered like `Params::ray_angles`. Outputs must have exactly
/// [`NUM_OUTPUTS`] entries: turn channel A, turn channel B, throttle.
pub trait Controller: Sync {
    /// Evaluates the policy.
    fn activate(&self, inputs: &Array1<f32>) -> Array1<f32>;
}

/// Adapts a plain function or closure into a [`Controller`].
pub struct FnController<F>(pub F);

impl<F> Controller for FnController<F>
where
    F: Fn(&Array1<f32>) -> Array1<f32> + Sync,
{
    fn activate(&self, inputs: &Array1<f32>) -> Array1<f32> {
        (self.0)(inputs)
    }
}

/// Always returns the same outputs regardless of sensors.
#[derive(Debug, Clone)]
pub struct ConstantController(pub [f32; NUM_OUTPUTS]);

impl Controller for ConstantController {
    fn activate(&self, _inputs: &Array1<f32>) -> Array1<f32> {
        Array1::from_vec(self.0.to_vec())
    }
}
