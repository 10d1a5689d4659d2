//! One simulation tick for a whole cohort: move, sense, score, steer.

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::controller::Controller;
use super::evolution::CandidateId;
use super::params::Params;
use super::track::Classifier;

/// Running fitness total for one candidate during one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessAccumulator {
    /// Candidate this score belongs to.
    pub id: CandidateId,
    /// Current total.
    pub value: f64,
}

impl FitnessAccumulator {
    /// A zeroed accumulator.
    pub fn new(id: CandidateId) -> Self {
        Self { id, value: 0.0 }
    }
}

/// True when the agent progressed less than `eps` this tick. The bound is exclusive.
#[inline]
pub fn is_stagnant(prev_distance: f32, distance: f32, eps: f32) -> bool {
    (distance - prev_distance).abs() < eps
}

/// Turns raw controller outputs into `(steering, throttle)`.
///
/// Steering is the difference of the two turn channels times the steer gain.
/// Throttle is forward only; negative outputs become zero.
#[inline]
pub fn decode_outputs(outputs: &Array1<f32>, params: &Params) -> (f32, f32) {
    let steering = (outputs[0] - outputs[1]) * params.steer_gain;
    let throttle = outputs[2].max(0.0) * params.throttle_gain;
    (steering, throttle)
}

/// Advances a single agent and updates its fitness. Returns whether the agent
/// is still alive afterwards.
///
/// An agent that crashes during this tick keeps the fitness it had before the
/// tick and is not steered again.
pub fn step_agent<C, M>(
    agent: &mut Agent,
    controller: &C,
    fitness: &mut FitnessAccumulator,
    mask: &M,
    params: &Params,
) -> bool
where
    C: Controller + ?Sized,
    M: Classifier + ?Sized,
{
    if !agent.alive {
        return false;
    }

    let prev = agent.distance;
    agent.advance(mask, params);
    if !agent.alive {
        return false;
    }

    if is_stagnant(prev, agent.distance, params.stagnation_eps) {
        fitness.value -= params.stagnation_penalty;
    }

    // Speed and heading chosen here only move the agent on the next tick.
    let outputs = controller.activate(&agent.sensors);
    let (steering, throttle) = decode_outputs(&outputs, params);
    agent.steer(steering, throttle, params);

    fitness.value += f64::from(agent.speed) * params.speed_weight
        + f64::from(agent.distance) * params.distance_weight;

    true
}

/// Advances every alive agent by one tick and returns how many are still alive.
///
/// `agents`, `controllers` and `fitness` are parallel slices. Agents never
/// interact, so they are updated in parallel.
pub fn step_cohort<C, M>(
    agents: &mut [Agent],
    controllers: &[&C],
    fitness: &mut [FitnessAccumulator],
    mask: &M,
    params: &Params,
) -> usize
where
    C: Controller + ?Sized,
    M: Classifier + ?Sized,
{
    agents
        .par_iter_mut()
        .zip(fitness.par_iter_mut())
        .zip(controllers.par_iter())
        .map(|((agent, fitness), controller)| step_agent(agent, *controller, fitness, mask, params))
        .filter(|&alive| alive)
        .count()
}
