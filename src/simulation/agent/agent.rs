//! Vehicle state and per-tick kinematics.

use geo::Point;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::super::geometric_utils::{heading_vector, to_pixel};
use super::super::params::Params;
use super::super::track::{Cell, Classifier};
use super::radar;

/// A simulated vehicle.
///
/// The agent is a square of `params.agent_size`; `pos` is its top-left corner
/// and all sensing happens from its centre. Once `alive` is false the agent is
/// frozen for the rest of the generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Top-left corner in world coordinates.
    pub pos: Array1<f32>,
    /// Heading in degrees. Not normalised.
    pub heading: f32,
    /// Current speed, in `[0, params.max_speed]`.
    pub speed: f32,
    /// Total distance travelled this generation.
    pub distance: f32,
    /// Whether the agent is still driving.
    pub alive: bool,
    /// Scaled radar lengths, one per configured ray angle.
    pub sensors: Array1<f32>,
}

impl Agent {
    /// Creates an agent at the configured start pose.
    pub fn new(params: &Params) -> Self {
        Self {
            pos: Array1::from_vec(vec![params.start_x, params.start_y]),
            heading: params.start_heading,
            speed: params.start_speed,
            distance: 0.0,
            alive: true,
            sensors: Array1::zeros(params.num_sensors()),
        }
    }

    /// Centre of the body.
    pub fn center(&self, params: &Params) -> Point<f32> {
        let half = params.agent_size / 2.0;
        Point::new(self.pos[0] + half, self.pos[1] + half)
    }

    /// Moves the agent one tick, checks for a crash, clamps it to the world and
    /// refreshes its radar.
    ///
    /// Does nothing for a dead agent.
    pub fn advance<M: Classifier + ?Sized>(&mut self, mask: &M, params: &Params) {
        if !self.alive {
            return;
        }

        let (dx, dy) = heading_vector(self.heading);
        self.pos[0] += dx * self.speed;
        self.pos[1] += dy * self.speed;
        self.distance += self.speed;

        // Only border pixels kill; off-mask samples are left to the clamp below.
        let (cx, cy) = to_pixel(self.center(params));
        if mask.classify(cx, cy) == Cell::Border {
            self.alive = false;
            tracing::debug!(x = cx, y = cy, distance = self.distance, "agent crashed");
        }

        self.pos[0] = self.pos[0].max(0.0).min(params.max_x());
        self.pos[1] = self.pos[1].max(0.0).min(params.max_y());

        let origin = self.center(params);
        radar::scan(mask, origin, self.heading, params, &mut self.sensors);
    }

    /// Applies one tick of controller commands. Speed is clamped to
    /// `[0, params.max_speed]`.
    pub fn steer(&mut self, steering: f32, throttle: f32, params: &Params) {
        self.heading += steering;
        self.speed = throttle.max(0.0).min(params.max_speed);
    }

    /// End points of the current radar rays, for drawing.
    pub fn sensor_endpoints(&self, params: &Params) -> Vec<Point<f32>> {
        radar::sensor_endpoints(self.center(params), self.heading, &self.sensors, params)
    }
}
