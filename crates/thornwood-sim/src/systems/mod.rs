//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only)
//! plus the engine-owned state they touch. Entity state lives in components.

pub mod cleanup;
pub mod combat;
pub mod effects;
pub mod enemy_ai;
pub mod movement;
pub mod orbs;
pub mod player_control;
pub mod snapshot;
pub mod weapons;
