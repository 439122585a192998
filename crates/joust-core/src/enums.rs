//! Enumeration types used throughout the simulation.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One side of the match. Exactly two exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[default]
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// The other team.
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Stable index for per-team arrays.
    pub fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

/// Direction a knight faces along the match axis (X).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative X.
    #[default]
    Left,
    /// Toward positive X.
    Right,
}

impl Facing {
    /// Unit forward vector on the match axis.
    pub fn forward(self) -> Vec3 {
        match self {
            Facing::Left => Vec3::NEG_X,
            Facing::Right => Vec3::X,
        }
    }

    /// Sign of travel along X (-1 or 1).
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Scoring tier of a hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionTier {
    /// Head and neck.
    Head,
    /// Torso, spine and shoulders.
    Torso,
    /// Limbs and anything else.
    Other,
}

impl RegionTier {
    /// Classify a region by its (case-insensitive) name.
    pub fn classify(name: &str) -> RegionTier {
        let name = name.to_ascii_lowercase();
        if ["head", "skull", "neck"].iter().any(|k| name.contains(k)) {
            RegionTier::Head
        } else if ["shoulder", "spine", "chest", "torso"]
            .iter()
            .any(|k| name.contains(k))
        {
            RegionTier::Torso
        } else {
            RegionTier::Other
        }
    }

    /// Points awarded for striking a region of this tier.
    pub fn points(self) -> i32 {
        match self {
            RegionTier::Head => 3,
            RegionTier::Torso => 2,
            RegionTier::Other => 1,
        }
    }
}

/// Bout controller lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoutPhase {
    /// Before the first round of a match.
    #[default]
    Idle,
    /// Countdown ticking, knights held at their ends.
    CountdownActive,
    /// Knights charging; lances live.
    MovementActive,
    /// Round closing: misses being marked.
    RoundResolving,
    /// Waiting out the delay before the next round.
    TransitionDelay,
    /// All rounds played.
    MatchComplete,
}

/// Outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

impl Winner {
    /// Higher score wins; equal scores tie.
    pub fn from_scores(a: i32, b: i32) -> Winner {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Winner::A,
            std::cmp::Ordering::Less => Winner::B,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }

    pub fn team(self) -> Option<Team> {
        match self {
            Winner::A => Some(Team::A),
            Winner::B => Some(Team::B),
            Winner::Tie => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::A => write!(f, "A"),
            Winner::B => write!(f, "B"),
            Winner::Tie => write!(f, "tie"),
        }
    }
}
