//! Events published by the bout controller for presentation and entity glue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{RoundRecord, RoundResult, Scores};

/// Everything the bout controller announces, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoutEvent {
    /// Countdown tick with the remaining value (3, 2, 1, 0).
    Countdown { round: u32, remaining: u32 },
    /// A new round began; per-round flags must reset.
    RoundStart { round: u32 },
    /// Lifecycle state transition.
    StateChange {
        from: BoutPhase,
        to: BoutPhase,
        movement_enabled: bool,
    },
    /// A positive score was added to a team's total.
    PointsChanged {
        team: Team,
        points: i32,
        scores: Scores,
    },
    /// A round's per-team result was reported (even when ignored).
    RoundDataChanged {
        round: u32,
        team: Team,
        result: RoundResult,
    },
    /// A round closed with both results recorded.
    RoundCompleted { record: RoundRecord },
    /// Knights should return to (swapped) starting positions.
    PositionsReset { round: u32 },
    /// The match is over.
    MatchEnd { scores: Scores, winner: Winner },
    /// All match state was cleared.
    MatchReset,
}

/// Subscription key for a class of [`BoutEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Countdown,
    RoundStart,
    StateChange,
    PointsChanged,
    RoundDataChanged,
    RoundCompleted,
    PositionsReset,
    MatchEnd,
    MatchReset,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::Countdown,
        EventKind::RoundStart,
        EventKind::StateChange,
        EventKind::PointsChanged,
        EventKind::RoundDataChanged,
        EventKind::RoundCompleted,
        EventKind::PositionsReset,
        EventKind::MatchEnd,
        EventKind::MatchReset,
    ];

    /// Wire name used by string subscriptions.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Countdown => "countdown",
            EventKind::RoundStart => "roundStart",
            EventKind::StateChange => "stateChange",
            EventKind::PointsChanged => "pointsChanged",
            EventKind::RoundDataChanged => "roundDataChanged",
            EventKind::RoundCompleted => "roundCompleted",
            EventKind::PositionsReset => "positionsReset",
            EventKind::MatchEnd => "matchEnd",
            EventKind::MatchReset => "matchReset",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = crate::error::UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| crate::error::UnknownEvent(s.to_string()))
    }
}

impl BoutEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BoutEvent::Countdown { .. } => EventKind::Countdown,
            BoutEvent::RoundStart { .. } => EventKind::RoundStart,
            BoutEvent::StateChange { .. } => EventKind::StateChange,
            BoutEvent::PointsChanged { .. } => EventKind::PointsChanged,
            BoutEvent::RoundDataChanged { .. } => EventKind::RoundDataChanged,
            BoutEvent::RoundCompleted { .. } => EventKind::RoundCompleted,
            BoutEvent::PositionsReset { .. } => EventKind::PositionsReset,
            BoutEvent::MatchEnd { .. } => EventKind::MatchEnd,
            BoutEvent::MatchReset => EventKind::MatchReset,
        }
    }
}
