//! THORNWOOD headless application.
//!
//! This crate wires the simulation to a fixed-rate game loop thread,
//! a JSON file store, and a scripted autopilot for unattended runs.

pub mod autopilot;
pub mod game_loop;
pub mod runner;
pub mod state;
pub mod store;

pub use thornwood_core as core;
