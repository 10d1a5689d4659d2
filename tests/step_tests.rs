#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::{Array1, array};
use neuro_racer::simulation::agent::Agent;
use neuro_racer::simulation::controller::{ConstantController, Controller, FnController};
use neuro_racer::simulation::params::Params;
use neuro_racer::simulation::step::{
    FitnessAccumulator, decode_outputs, is_stagnant, step_agent, step_cohort,
};
use neuro_racer::simulation::track::TrackMask;

fn free_track(params: &Params) -> TrackMask {
    TrackMask::from_fn(
        params.world_width as usize,
        params.world_height as usize,
        |_, _| false,
    )
    .unwrap()
}

fn solid_track(params: &Params) -> TrackMask {
    TrackMask::from_fn(
        params.world_width as usize,
        params.world_height as usize,
        |_, _| true,
    )
    .unwrap()
}

#[test]
fn test_stagnation_threshold_is_exclusive() {
    assert!(is_stagnant(10.0, 10.05, 0.1));
    assert!(!is_stagnant(10.0, 10.2, 0.1));
    assert!(!is_stagnant(0.0, 0.1, 0.1));
    assert!(is_stagnant(3.0, 3.0, 0.1));
}

#[test]
fn test_decode_outputs() {
    let params = Params::default();

    let (steering, throttle) = decode_outputs(&array![0.5, -0.5, 0.8], &params);
    assert!((steering - 10.0).abs() < 1e-5);
    assert!((throttle - 4.0).abs() < 1e-5);

    let (steering, throttle) = decode_outputs(&array![0.0, 0.3, -0.7], &params);
    assert!((steering + 3.0).abs() < 1e-5);
    assert_eq!(throttle, 0.0);
}

#[test]
fn test_straight_line_distance() {
    let params = Params::default();
    let mask = free_track(&params);
    let controller = ConstantController([0.0, 0.0, 1.0]);
    let mut agent = Agent::new(&params);
    let mut fitness = FitnessAccumulator::new(0);

    for _ in 0..10 {
        assert!(step_agent(&mut agent, &controller, &mut fitness, &mask, &params));
    }

    assert_eq!(agent.distance, 10.0 * params.max_speed);
    assert_eq!(agent.heading, params.start_heading);
    assert_eq!(agent.speed, params.max_speed);
    // Each tick earns 5 * 0.1 for speed plus 1% of the distance so far.
    assert!((fitness.value - 7.75).abs() < 1e-9);
}

#[test]
fn test_stagnation_penalty_applied() {
    let params = Params::default();
    let mask = free_track(&params);
    let controller = ConstantController([0.0, 0.0, 0.0]);
    let mut agent = Agent::new(&params);
    let mut fitness = FitnessAccumulator::new(0);

    // First tick still moves at the spawn speed, then the agent stops.
    step_agent(&mut agent, &controller, &mut fitness, &mask, &params);
    assert!((fitness.value - 0.05).abs() < 1e-9);
    assert_eq!(agent.speed, 0.0);

    step_agent(&mut agent, &controller, &mut fitness, &mask, &params);
    assert!(fitness.value.abs() < 1e-9);

    step_agent(&mut agent, &controller, &mut fitness, &mask, &params);
    assert!((fitness.value + 0.05).abs() < 1e-9);
}

#[test]
fn test_controller_sees_current_sensors() {
    let params = Params::default();
    let mask = free_track(&params);
    let controller = FnController(|inputs: &Array1<f32>| {
        assert_eq!(inputs.len(), 5);
        assert!(inputs.iter().all(|&s| s > 0.0));
        array![0.0, 0.0, 1.0]
    });
    let mut agent = Agent::new(&params);
    let mut fitness = FitnessAccumulator::new(0);

    assert!(step_agent(&mut agent, &controller, &mut fitness, &mask, &params));
}

#[test]
fn test_fitness_frozen_at_pre_death_value() {
    let params = Params::default();
    let free = free_track(&params);
    let solid = solid_track(&params);
    let controller = ConstantController([0.0, 0.0, 1.0]);
    let mut agent = Agent::new(&params);
    let mut fitness = FitnessAccumulator::new(7);

    for _ in 0..3 {
        step_agent(&mut agent, &controller, &mut fitness, &free, &params);
    }
    let before_death = fitness.value;

    assert!(!step_agent(&mut agent, &controller, &mut fitness, &solid, &params));
    assert!(!agent.alive);
    assert_eq!(fitness.value, before_death);

    let frozen = agent.clone();
    for _ in 0..3 {
        assert!(!step_agent(&mut agent, &controller, &mut fitness, &free, &params));
    }
    assert_eq!(agent, frozen);
    assert_eq!(fitness.value, before_death);
    assert_eq!(fitness.id, 7);
}

#[test]
fn test_step_cohort_counts_survivors() {
    let params = Params::default();
    let mask = free_track(&params);
    let controller = ConstantController([0.0, 0.0, 1.0]);
    let controllers: Vec<&dyn Controller> = vec![&controller, &controller, &controller];

    let mut agents = vec![Agent::new(&params); 3];
    agents[1].alive = false;
    let mut fitness: Vec<FitnessAccumulator> = (0..3).map(FitnessAccumulator::new).collect();

    let alive = step_cohort(&mut agents, &controllers, &mut fitness, &mask, &params);

    assert_eq!(alive, 2);
    assert_eq!(agents[0].distance, 5.0);
    assert_eq!(agents[1].distance, 0.0);
    assert_eq!(fitness[1].value, 0.0);
    assert_eq!(fitness[0].value, fitness[2].value);
}

#[test]
fn test_step_cohort_all_crash() {
    let params = Params::default();
    let mask = solid_track(&params);
    let controller = ConstantController([1.0, 0.0, 1.0]);
    let controllers = [&controller, &controller];
    let mut agents = vec![Agent::new(&params); 2];
    let mut fitness = vec![FitnessAccumulator::new(0), FitnessAccumulator::new(1)];

    let alive = step_cohort(&mut agents, &controllers, &mut fitness, &mask, &params);

    assert_eq!(alive, 0);
    assert!(fitness.iter().all(|f| f.value == 0.0));
    // The crash happens before steering, so the heading is untouched.
    assert!(agents.iter().all(|a| a.heading == params.start_heading));
}
