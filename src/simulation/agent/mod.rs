//! Agent module containing vehicle kinematics and radar sensing.

mod agent;
mod radar;

pub use agent::*;
pub use radar::{cast_ray, sensor_endpoints};
