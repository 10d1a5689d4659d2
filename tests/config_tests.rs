#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::io::Write;

use neuro_racer::simulation::config::Config;
use neuro_racer::simulation::error::ConfigError;

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.simulation.frame_cap, 900);
    assert_eq!(config.optimizer.population_size, 30);
    assert_eq!(config.optimizer.max_generations, 50);
}

#[test]
fn test_ray_count_must_match_inputs() {
    let mut config = Config::default();
    config.simulation.ray_angles = vec![-45.0, 0.0, 45.0];

    let result = config.validate();

    assert!(matches!(
        result,
        Err(ConfigError::InputArity {
            expected: 5,
            actual: 3
        })
    ));
}

#[test]
fn test_optimizer_inputs_must_match_sensors() {
    let mut config = Config::default();
    config.optimizer.num_inputs = 6;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InputArity {
            expected: 5,
            actual: 6
        })
    ));
}

#[test]
fn test_output_arity_is_fixed() {
    let mut config = Config::default();
    config.optimizer.num_outputs = 2;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutputArity {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let mut config = Config::default();
    config.optimizer.population_size = 1;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.simulation.frame_cap = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.optimizer.mutation_rate = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.optimizer.mutation_scale_max = 0.001;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.simulation.sensor_divisor = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = Config::default();
    config.simulation.frame_cap = 450;
    config.optimizer.hidden_layers = vec![6, 4];
    config.optimizer.fitness_threshold = Some(120.0);

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded.simulation.frame_cap, 450);
    assert_eq!(loaded.simulation.ray_angles, config.simulation.ray_angles);
    assert_eq!(loaded.optimizer.hidden_layers, vec![6, 4]);
    assert_eq!(loaded.optimizer.fitness_threshold, Some(120.0));
}

#[test]
fn test_partial_file_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"optimizer": {{"population_size": 10}}}}"#).unwrap();

    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.optimizer.population_size, 10);
    assert_eq!(config.optimizer.num_inputs, 5);
    assert_eq!(config.simulation.world_width, 1000.0);
}

#[test]
fn test_invalid_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"simulation": {{"ray_angles": [0.0]}}}}"#).unwrap();
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(ConfigError::InputArity { .. })
    ));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Config::load_from_file("/no/such/config.json"),
        Err(ConfigError::Io { .. })
    ));
}
