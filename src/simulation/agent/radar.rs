//! Radar sensing - fixed-angle ray casts against the track mask.
//!
//! Each ray marches from the agent's centre in steps of one world unit and
//! stops at the first border pixel, at the world edge, or at the maximum range.
//! The world edge comes from `Params`, so masks of any size sense the same world.

use geo::Point;
use ndarray::Array1;

use super::super::geometric_utils::{ray_point, to_pixel};
use super::super::params::Params;
use super::super::track::{Cell, Classifier};

/// Casts one ray and returns the distance marched before it was stopped.
///
/// The ray ends at the first border cell, at the first sample the mask cannot
/// classify, or when it leaves the world in `params`, whichever comes first.
/// Leaving the world ends the ray without any penalty; the returned length is
/// the last in-bounds step.
pub fn cast_ray<M: Classifier + ?Sized>(
    mask: &M,
    origin: Point<f32>,
    heading_deg: f32,
    params: &Params,
) -> u32 {
    let (world_w, world_h) = (params.world_width as i32, params.world_height as i32);
    let mut length = 0;
    while length < params.ray_range {
        let (x, y) = to_pixel(ray_point(origin, heading_deg, length as f32));
        if x < 0 || y < 0 || x >= world_w || y >= world_h {
            break;
        }
        match mask.classify(x, y) {
            Cell::Border | Cell::OutOfBounds => break,
            Cell::Free => length += 1,
        }
    }
    length
}

/// Scans every configured ray angle and writes the scaled lengths into `readings`.
///
/// `readings` keeps the order of `params.ray_angles`.
pub(super) fn scan<M: Classifier + ?Sized>(
    mask: &M,
    origin: Point<f32>,
    heading_deg: f32,
    params: &Params,
    readings: &mut Array1<f32>,
) {
    for (reading, offset) in readings.iter_mut().zip(&params.ray_angles) {
        let length = cast_ray(mask, origin, heading_deg + offset, params);
        *reading = length as f32 / params.sensor_divisor;
    }
}

/// World-space end points of each ray, reconstructed from the scaled readings.
pub fn sensor_endpoints(
    origin: Point<f32>,
    heading_deg: f32,
    readings: &Array1<f32>,
    params: &Params,
) -> Vec<Point<f32>> {
    readings
        .iter()
        .zip(&params.ray_angles)
        .map(|(reading, offset)| {
            ray_point(origin, heading_deg + offset, reading * params.sensor_divisor)
        })
        .collect()
}
