//! Commands sent from the frontend to the match engine.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Reset everything and begin round 1.
    StartMatch,
    /// Abort the match and return to the pre-match state.
    ResetMatch,
    /// Freeze frame systems and timers.
    Pause,
    /// Unfreeze.
    Resume,
    /// Pointer position in normalized device coordinates (-1..1).
    SetPointer { x: f32, y: f32 },
}
