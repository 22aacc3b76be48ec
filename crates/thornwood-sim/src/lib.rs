//! Simulation engine for THORNWOOD.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for presentation.

pub mod engine;
pub mod persistence;
pub mod pressure;
pub mod progression;
pub mod run_stats;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use thornwood_core as core;

#[cfg(test)]
mod tests;
