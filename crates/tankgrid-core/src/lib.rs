//! Core types and definitions for the tankgrid simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, input intents, commands, state snapshots, events,
//! and constants. It has no runtime logic beyond small helpers.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod input;
pub mod state;
pub mod types;
