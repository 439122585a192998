//! Fundamental simulation value types.

use serde::{Deserialize, Serialize};

use crate::constants::MISS_REGION;
use crate::enums::{Team, Winner};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current frame number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed wall time in seconds (unscaled by slow motion).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per frame at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one frame.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// One team's outcome for one round.
///
/// `points_earned == 0` means "nothing recorded yet". A miss is stored as
/// `-1` so a resolved round never carries a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub region_hit: Option<String>,
    pub points_earned: i32,
    pub speed_on_contact: f32,
}

/// Data a lance proposes when it strikes. Same shape as the stored result.
pub type HitData = RoundResult;

impl RoundResult {
    pub fn hit(region: impl Into<String>, points: i32, speed: f32) -> Self {
        Self {
            region_hit: Some(region.into()),
            points_earned: points,
            speed_on_contact: speed,
        }
    }

    pub fn miss() -> Self {
        Self {
            region_hit: Some(MISS_REGION.to_string()),
            points_earned: -1,
            speed_on_contact: -1.0,
        }
    }

    /// Whether anything (hit or miss) has been recorded.
    pub fn is_recorded(&self) -> bool {
        self.points_earned != 0
    }

    pub fn is_miss(&self) -> bool {
        self.points_earned < 0
    }
}

/// Both teams' results for one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index.
    pub round: u32,
    pub a: RoundResult,
    pub b: RoundResult,
}

impl RoundRecord {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            ..Default::default()
        }
    }

    pub fn result(&self, team: Team) -> &RoundResult {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }

    pub fn result_mut(&mut self, team: Team) -> &mut RoundResult {
        match team {
            Team::A => &mut self.a,
            Team::B => &mut self.b,
        }
    }

    /// Both teams have a recorded outcome.
    pub fn is_resolved(&self) -> bool {
        self.a.is_recorded() && self.b.is_recorded()
    }
}

/// Running match score per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub a: i32,
    pub b: i32,
}

impl Scores {
    pub fn get(&self, team: Team) -> i32 {
        match team {
            Team::A => self.a,
            Team::B => self.b,
        }
    }

    pub fn add(&mut self, team: Team, points: i32) {
        match team {
            Team::A => self.a += points,
            Team::B => self.b += points,
        }
    }

    pub fn winner(&self) -> Winner {
        Winner::from_scores(self.a, self.b)
    }
}
