//! ECS systems that operate on the match world each frame.
//!
//! Systems are pure functions over the world. Whatever they need to tell
//! the round lifecycle goes straight to the [`crate::BoutController`].

pub mod lance;
pub mod movement;
pub mod skeleton;
pub mod snapshot;
pub mod targeting;
