//! Match state snapshot: the complete visible state sent to the frontend each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::BoutEvent;
use crate::types::{RoundRecord, Scores, SimTime};

/// Complete match state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: BoutPhase,
    /// Current 1-based round (0 before the match starts).
    pub round: u32,
    pub max_rounds: u32,
    /// Remaining countdown value while the countdown runs.
    pub countdown: Option<u32>,
    pub movement_enabled: bool,
    pub paused: bool,
    /// Slow-motion scale applied to frame time (1.0 = normal).
    pub time_scale: f32,
    pub scores: Scores,
    pub rounds: Vec<RoundRecord>,
    pub knights: Vec<KnightView>,
    /// Events emitted since the previous snapshot.
    pub events: Vec<BoutEvent>,
}

/// One knight for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnightView {
    pub team: Team,
    pub is_player: bool,
    pub position: Vec3,
    pub facing: Facing,
    pub has_scored_this_round: bool,
    /// Whether the skeleton has loaded (lance live, regions present).
    pub ready: bool,
    pub lance: LanceView,
}

/// Lance state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanceView {
    pub origin: Vec3,
    pub aim_direction: Vec3,
    /// End of the scoring ray.
    pub tip: Vec3,
    /// Current tip speed in display units.
    pub speed: f32,
    pub has_scored_this_round: bool,
}
