//! # Neuro Racer - Neuroevolution of Track-Driving Agents
//!
//! Simple vehicles drive around a 2D track, sense the track border with five
//! radar rays and are steered by neural controllers. A population-based
//! optimizer scores every controller by how far and how fast its vehicle got
//! before crashing, then breeds the next generation.
//!
//! ## Features
//!
//! - Tick-driven, deterministic agent kinematics with border collision
//! - Ray-cast radar sensing against a binary track mask
//! - Fitness shaping: speed and distance rewards, stagnation penalty
//! - Generation runner with frame cap and per-tick quit polling
//! - Pluggable optimizer protocol plus a bundled MLP population optimizer
//! - JSON configuration and population checkpoints
//! - Real-time visualization with macroquad/egui
//!
//! ## Core Modules
//!
//! - [`simulation::agent`] - Vehicle state, kinematics and radar
//! - [`simulation::step`] - One tick for a cohort, fitness accumulation
//! - [`simulation::runner`] - Generation state machine
//! - [`simulation::evolution`] - Optimizer protocol, population, trainer
//! - [`simulation::track`] - Track mask and classification

/// Core simulation logic and data structures.
pub mod simulation {
    /// Vehicle kinematics and radar sensing.
    pub mod agent;
    /// Neural network controllers.
    pub mod brain;
    /// Run configuration loaded from JSON.
    pub mod config;
    /// Controller trait and simple controllers.
    pub mod controller;
    /// Error types.
    pub mod error;
    /// Optimizer protocol, bundled population optimizer and trainer loop.
    pub mod evolution;
    /// Heading and ray geometry helpers.
    pub mod geometric_utils;
    /// Simulation and optimizer parameters.
    pub mod params;
    /// Generation runner state machine.
    pub mod runner;
    /// Per-generation fitness statistics.
    pub mod statistics;
    /// Per-tick cohort update and fitness accounting.
    pub mod step;
    /// Track collision mask.
    pub mod track;
}
