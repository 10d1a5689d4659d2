#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::Point;
use neuro_racer::simulation::agent::{Agent, cast_ray};
use neuro_racer::simulation::params::Params;
use neuro_racer::simulation::track::{Cell, Classifier, TrackMask};

/// Border-free surface of a fixed size.
struct OpenField {
    width: i32,
    height: i32,
}

impl Classifier for OpenField {
    fn classify(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            Cell::OutOfBounds
        } else {
            Cell::Free
        }
    }
}

fn open_field(params: &Params) -> OpenField {
    OpenField {
        width: params.world_width as i32,
        height: params.world_height as i32,
    }
}

/// Agent whose centre sits at `(500.5, 300.5)` facing along +x and standing still.
fn centred_agent(params: &Params) -> Agent {
    let mut agent = Agent::new(params);
    agent.pos[0] = 485.5;
    agent.pos[1] = 285.5;
    agent.heading = 0.0;
    agent.speed = 0.0;
    agent
}

#[test]
fn test_new_agent_uses_start_pose() {
    let params = Params::default();
    let agent = Agent::new(&params);

    assert_eq!(agent.pos[0], 100.0);
    assert_eq!(agent.pos[1], 300.0);
    assert_eq!(agent.heading, -40.0);
    assert_eq!(agent.speed, 5.0);
    assert_eq!(agent.distance, 0.0);
    assert!(agent.alive);
    assert_eq!(agent.sensors.len(), params.num_sensors());
}

#[test]
fn test_steer_clamps_speed() {
    let params = Params::default();
    let mut agent = Agent::new(&params);

    agent.steer(0.0, 12.0, &params);
    assert_eq!(agent.speed, params.max_speed);

    agent.steer(0.0, -3.0, &params);
    assert_eq!(agent.speed, 0.0);

    agent.steer(7.5, 2.5, &params);
    assert_eq!(agent.speed, 2.5);
    assert_eq!(agent.heading, -32.5);
}

#[test]
fn test_heading_is_not_normalised() {
    let params = Params::default();
    let mut agent = Agent::new(&params);
    for _ in 0..50 {
        agent.steer(10.0, 0.0, &params);
    }
    assert_eq!(agent.heading, 460.0);
}

#[test]
fn test_advance_moves_along_heading() {
    let params = Params::default();
    let field = open_field(&params);
    let mut agent = centred_agent(&params);
    agent.speed = 4.0;

    agent.advance(&field, &params);

    assert!((agent.pos[0] - 489.5).abs() < 1e-4);
    assert!((agent.pos[1] - 285.5).abs() < 1e-4);
    assert_eq!(agent.distance, 4.0);
    assert!(agent.alive);
}

#[test]
fn test_position_is_clamped_to_world() {
    let params = Params::default();
    let field = open_field(&params);
    let mut agent = Agent::new(&params);
    agent.pos[0] = 990.0;
    agent.pos[1] = 300.0;
    agent.heading = 0.0;

    agent.advance(&field, &params);

    // Leaving the world is not a crash, the body is pulled back inside.
    assert!(agent.alive);
    assert_eq!(agent.pos[0], params.max_x());
    assert_eq!(agent.pos[1], 300.0);
    assert_eq!(agent.distance, 5.0);

    agent.pos[0] = -20.0;
    agent.pos[1] = -20.0;
    agent.speed = 0.0;
    agent.advance(&field, &params);
    assert_eq!(agent.pos[0], 0.0);
    assert_eq!(agent.pos[1], 0.0);
}

#[test]
fn test_sensors_follow_ray_angle_order() {
    let params = Params::default();
    // Horizontal wall below the agent.
    let mask = TrackMask::from_fn(1000, 600, |_, y| y >= 400).unwrap();
    let mut agent = centred_agent(&params);

    agent.advance(&mask, &params);

    let expected = [3.0, 3.0, 3.0, 1.41, 1.0];
    assert_eq!(agent.sensors.len(), expected.len());
    for (reading, expected) in agent.sensors.iter().zip(expected) {
        assert!(
            (reading - expected).abs() < 1e-5,
            "reading {reading} != {expected}"
        );
    }
}

#[test]
fn test_sensors_are_capped_at_ray_range() {
    let params = Params::default();
    let field = open_field(&params);
    let mut agent = centred_agent(&params);

    agent.advance(&field, &params);

    for reading in &agent.sensors {
        assert_eq!(*reading, params.ray_range as f32 / params.sensor_divisor);
    }
}

#[test]
fn test_border_ahead_kills_on_first_tick() {
    let params = Params::default();
    // The spawn centre (115, 315) is free, the centre after one step is not.
    let mask = TrackMask::from_fn(1000, 600, |x, _| x >= 117).unwrap();
    let mut agent = Agent::new(&params);

    agent.advance(&mask, &params);

    assert!(!agent.alive);
    assert_eq!(agent.distance, 5.0);
}

#[test]
fn test_dead_agent_is_frozen() {
    let params = Params::default();
    let field = open_field(&params);
    let mut agent = Agent::new(&params);
    agent.alive = false;
    let before = agent.clone();

    for _ in 0..5 {
        agent.advance(&field, &params);
    }

    assert_eq!(agent, before);
}

#[test]
fn test_cast_ray_stops_at_world_edge() {
    let params = Params::default();
    let field = open_field(&params);

    let length = cast_ray(&field, Point::new(990.5, 10.5), 0.0, &params);

    assert_eq!(length, 10);
}

#[test]
fn test_cast_ray_uses_world_bounds_not_mask_bounds() {
    let params = Params::default();
    // Surface reaching far past the 1000 x 600 world.
    let field = OpenField {
        width: 5000,
        height: 5000,
    };

    assert_eq!(cast_ray(&field, Point::new(990.5, 10.5), 0.0, &params), 10);
    assert_eq!(cast_ray(&field, Point::new(10.5, 590.5), 90.0, &params), 10);

    let mut agent = centred_agent(&params);
    agent.pos[1] = 515.5;
    agent.advance(&field, &params);
    let world_sized = {
        let mut other = centred_agent(&params);
        other.pos[1] = 515.5;
        other.advance(&open_field(&params), &params);
        other
    };
    assert_eq!(agent.sensors, world_sized.sensors);
}

#[test]
fn test_cast_ray_stops_at_border() {
    let mut params = Params::default();
    let mask = TrackMask::from_fn(100, 100, |x, _| x >= 60).unwrap();

    assert_eq!(cast_ray(&mask, Point::new(10.5, 50.5), 0.0, &params), 50);
    assert_eq!(cast_ray(&mask, Point::new(70.5, 50.5), 0.0, &params), 0);

    params.ray_range = 20;
    assert_eq!(cast_ray(&mask, Point::new(10.5, 50.5), 0.0, &params), 20);
}

#[test]
fn test_sensor_endpoints_match_readings() {
    let params = Params::default();
    let mask = TrackMask::from_fn(1000, 600, |_, y| y >= 400).unwrap();
    let mut agent = centred_agent(&params);
    agent.advance(&mask, &params);

    let endpoints = agent.sensor_endpoints(&params);

    assert_eq!(endpoints.len(), params.num_sensors());
    // Straight down ray ends on the wall.
    let down = endpoints[4];
    assert!((down.x() - 500.5).abs() < 1e-3);
    assert!((down.y() - 400.5).abs() < 1e-3);
    // Straight ahead ray runs the full range.
    let ahead = endpoints[2];
    assert!((ahead.x() - 800.5).abs() < 1e-3);
}
