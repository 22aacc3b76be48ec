//! Core types and definitions for the THORNWOOD simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, player stats, state snapshots, events, and constants.
//! It has no dependency on any runtime, renderer, or audio backend.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod player;
pub mod state;
pub mod types;
