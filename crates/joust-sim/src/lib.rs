//! Match engine for the joust simulator.
//!
//! Owns the hecs world holding both knights, the bout controller that
//! runs the round lifecycle, and the per-frame systems that move knights,
//! aim lances and resolve hits. Completely headless.

pub mod bout;
pub mod engine;
pub mod event_bus;
pub mod geometry;
pub mod knight;
pub mod lance;
pub mod skeleton;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use bout::BoutController;
pub use engine::MatchEngine;
pub use joust_core as core;

#[cfg(test)]
mod tests;
