use serde::{Deserialize, Serialize};

/// Simulation parameters that control agent kinematics, sensing and fitness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// World width in world units.
    pub world_width: f32,
    /// World height in world units.
    pub world_height: f32,
    /// Side length of the (square) agent body.
    pub agent_size: f32,
    /// Spawn position (top-left corner of the body).
    pub start_x: f32,
    /// Spawn position (top-left corner of the body).
    pub start_y: f32,
    /// Spawn heading in degrees.
    pub start_heading: f32,
    /// Spawn speed.
    pub start_speed: f32,
    /// Ray angle offsets in degrees, relative to the heading.
    /// The order here is the order of the controller inputs.
    pub ray_angles: Vec<f32>,
    /// Maximum ray length in world units.
    pub ray_range: u32,
    /// Ray lengths are divided by this before being fed to the controller.
    pub sensor_divisor: f32,
    /// Upper speed clamp.
    pub max_speed: f32,
    /// Multiplier on the differential turn outputs (degrees per tick).
    pub steer_gain: f32,
    /// Multiplier on the throttle output.
    pub throttle_gain: f32,
    /// Fitness reward per unit of speed per tick.
    pub speed_weight: f64,
    /// Fitness reward per unit of cumulative distance per tick.
    pub distance_weight: f64,
    /// Per-tick progress below which an agent counts as stagnant.
    pub stagnation_eps: f32,
    /// Fitness subtracted for a stagnant tick.
    pub stagnation_penalty: f64,
    /// Maximum ticks per generation.
    pub frame_cap: u32,
    /// RGB colour of track border pixels.
    pub border_color: [u8; 3],
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 1000.0,
            world_height: 600.0,
            agent_size: 30.0,
            start_x: 100.0,
            start_y: 300.0,
            start_heading: -40.0,
            start_speed: 5.0,
            ray_angles: vec![-90.0, -45.0, 0.0, 45.0, 90.0],
            ray_range: 300,
            sensor_divisor: 100.0,
            max_speed: 5.0,
            steer_gain: 10.0,
            throttle_gain: 5.0,
            speed_weight: 0.1,
            distance_weight: 0.01,
            stagnation_eps: 0.1,
            stagnation_penalty: 0.1,
            frame_cap: 900,
            border_color: [127, 127, 127],
        }
    }
}

impl Params {
    /// Number of sensor readings an agent produces each tick.
    pub fn num_sensors(&self) -> usize {
        self.ray_angles.len()
    }

    /// Largest legal x coordinate of the agent's top-left corner.
    pub fn max_x(&self) -> f32 {
        self.world_width - self.agent_size
    }

    /// Largest legal y coordinate of the agent's top-left corner.
    pub fn max_y(&self) -> f32 {
        self.world_height - self.agent_size
    }
}

/// Parameters for the bundled population optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    /// Candidates per generation.
    pub population_size: usize,
    /// Controller input count. Must match the number of ray angles.
    pub num_inputs: usize,
    /// Controller output count (turn left, turn right, throttle).
    pub num_outputs: usize,
    /// Hidden layer sizes of the MLP controller.
    pub hidden_layers: Vec<usize>,
    /// Initial weights and biases are drawn from `[-init_scale, init_scale]`.
    pub init_scale: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub mutation_scale_min: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub mutation_scale_max: f32,
    /// Probability that any single weight is perturbed during mutation.
    pub mutation_rate: f32,
    /// Probability that a child is bred by crossover rather than cloned.
    pub crossover_prob: f32,
    /// Number of top candidates copied unchanged into the next generation.
    pub elitism: usize,
    /// Fraction of the ranked population allowed to reproduce.
    pub survival_threshold: f32,
    /// Number of generations to evaluate.
    pub max_generations: usize,
    /// Stop early once a generation's best fitness reaches this value.
    pub fitness_threshold: Option<f64>,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            population_size: 30,
            num_inputs: 5,
            num_outputs: 3,
            hidden_layers: vec![8],
            init_scale: 1.0,
            mutation_scale_min: 0.002,
            mutation_scale_max: 0.2,
            mutation_rate: 0.8,
            crossover_prob: 0.5,
            elitism: 2,
            survival_threshold: 0.2,
            max_generations: 50,
            fitness_threshold: None,
        }
    }
}

impl OptimizerParams {
    /// Full MLP layer sizes, input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.num_inputs);
        sizes.extend(self.hidden_layers.iter().copied());
        sizes.push(self.num_outputs);
        sizes
    }
}
