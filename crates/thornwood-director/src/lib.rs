//! Wave and boss direction for THORNWOOD.
//!
//! Implements the wave progression state machine, the boss phase/attack
//! state machine, and archetype-driven enemy profiles. Pure data in, pure
//! data out: no ECS dependency.

pub mod boss;
pub mod profiles;
pub mod wave;

pub use thornwood_core as core;
