//! JSON configuration file holding simulation and optimizer parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::controller::NUM_OUTPUTS;
use super::error::ConfigError;
use super::params::{OptimizerParams, Params};

/// Controller input count this simulation is built around.
pub const NUM_INPUTS: usize = 5;

/// Complete run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulation constants.
    pub simulation: Params,
    /// Optimizer settings.
    pub optimizer: OptimizerParams,
}

impl Config {
    /// Reads and validates a config file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the config as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks controller arity and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        let opt = &self.optimizer;

        if sim.ray_angles.len() != NUM_INPUTS {
            return Err(ConfigError::InputArity {
                expected: NUM_INPUTS,
                actual: sim.ray_angles.len(),
            });
        }
        if opt.num_inputs != sim.num_sensors() {
            return Err(ConfigError::InputArity {
                expected: sim.num_sensors(),
                actual: opt.num_inputs,
            });
        }
        if opt.num_outputs != NUM_OUTPUTS {
            return Err(ConfigError::OutputArity {
                expected: NUM_OUTPUTS,
                actual: opt.num_outputs,
            });
        }

        if sim.agent_size <= 0.0 {
            return Err(ConfigError::Invalid("agent_size must be positive"));
        }
        if sim.world_width <= sim.agent_size || sim.world_height <= sim.agent_size {
            return Err(ConfigError::Invalid("world must be larger than the agent"));
        }
        if sim.sensor_divisor <= 0.0 {
            return Err(ConfigError::Invalid("sensor_divisor must be positive"));
        }
        if sim.max_speed < 0.0 {
            return Err(ConfigError::Invalid("max_speed must not be negative"));
        }
        if sim.frame_cap == 0 {
            return Err(ConfigError::Invalid("frame_cap must be at least 1"));
        }

        if opt.population_size < 2 {
            return Err(ConfigError::Invalid("population_size must be at least 2"));
        }
        if opt.hidden_layers.contains(&0) {
            return Err(ConfigError::Invalid("hidden layers must not be empty"));
        }
        if opt.init_scale <= 0.0 {
            return Err(ConfigError::Invalid("init_scale must be positive"));
        }
        if opt.mutation_scale_min <= 0.0 || opt.mutation_scale_max < opt.mutation_scale_min {
            return Err(ConfigError::Invalid(
                "mutation scale range must be positive and ordered",
            ));
        }
        if !(0.0..=1.0).contains(&opt.mutation_rate) || !(0.0..=1.0).contains(&opt.crossover_prob)
        {
            return Err(ConfigError::Invalid(
                "mutation_rate and crossover_prob must be probabilities",
            ));
        }
        if !(opt.survival_threshold > 0.0 && opt.survival_threshold <= 1.0) {
            return Err(ConfigError::Invalid("survival_threshold must be in (0, 1]"));
        }
        if opt.max_generations == 0 {
            return Err(ConfigError::Invalid("max_generations must be at least 1"));
        }

        Ok(())
    }
}
