//! Core types and definitions for the joust simulator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! teams, round results, events, commands, snapshots, configuration
//! and constants. It has no dependency on the ECS or any runtime.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod regions;
pub mod state;
pub mod types;
