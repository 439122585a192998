//! Knight components and their round-scoped glue.

use glam::Vec3;

use joust_core::enums::{Facing, Team};
use joust_core::types::HitData;

use crate::bout::BoutController;

/// Identity and per-round scoring flag of a combatant.
#[derive(Debug, Clone, PartialEq)]
pub struct Knight {
    pub team: Team,
    pub is_player: bool,
    pub has_scored_this_round: bool,
}

impl Knight {
    pub fn new(team: Team, is_player: bool) -> Self {
        Self {
            team,
            is_player,
            has_scored_this_round: false,
        }
    }

    /// Forward a hit to the controller, at most once per round.
    ///
    /// Returns whether the controller accepted the report. A rejected
    /// report leaves the knight free to score later in the round.
    pub fn register_hit(&mut self, data: HitData, controller: &mut BoutController) -> bool {
        if self.has_scored_this_round {
            tracing::debug!(team = %self.team, "knight already scored this round");
            return false;
        }

        let round = controller.current_round();
        match controller.report_hit(round, self.team, data) {
            Ok(()) => {
                self.has_scored_this_round = true;
                true
            }
            Err(err) => {
                tracing::error!(team = %self.team, %err, "hit report rejected");
                false
            }
        }
    }

    pub fn reset_round_state(&mut self) {
        self.has_scored_this_round = false;
    }
}

/// Position along the lists and progress through one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct KnightMotion {
    pub position: Vec3,
    pub facing: Facing,
    /// X the knight charges from this round; the far end is `-start_x`.
    pub start_x: f32,
    pub lane_z: f32,
    /// Past the far end and walking out.
    pub walking: bool,
    pub walk_start_x: f32,
}

impl KnightMotion {
    pub fn at_start(start_x: f32, lane_z: f32, height: f32, facing: Facing) -> Self {
        Self {
            position: Vec3::new(start_x, height, lane_z),
            facing,
            start_x,
            lane_z,
            walking: false,
            walk_start_x: start_x,
        }
    }

    pub fn far_end_x(&self) -> f32 {
        -self.start_x
    }

    pub fn has_reached_far_end(&self, tolerance: f32) -> bool {
        let remaining = (self.far_end_x() - self.position.x) * self.facing.sign();
        remaining <= tolerance
    }

    /// Distance walked since reaching the far end.
    pub fn walked_distance(&self) -> f32 {
        if self.walking {
            (self.position.x - self.walk_start_x).abs()
        } else {
            0.0
        }
    }

    /// Take up a new starting placement and stand there.
    pub fn place(&mut self, start_x: f32, lane_z: f32, facing: Facing) {
        self.start_x = start_x;
        self.lane_z = lane_z;
        self.facing = facing;
        self.return_to_start();
    }

    pub fn return_to_start(&mut self) {
        self.position.x = self.start_x;
        self.position.z = self.lane_z;
        self.walking = false;
        self.walk_start_x = self.start_x;
    }
}
