//! Lance targeting for the joust simulator.
//!
//! Implements the player (pointer-driven) and AI (weighted-random,
//! smoothed, rear-clamped) aiming policies behind one trait.

pub mod camera;
pub mod opponent;
pub mod player;
pub mod policy;
pub mod weights;

pub use joust_core as core;
pub use opponent::AiPolicy;
pub use player::PlayerPolicy;
pub use policy::{AimContext, PolicyKind, TargetingPolicy};
