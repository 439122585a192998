//! Error types.
//!
//! Only programming invariant violations and configuration problems are
//! errors. Everything else the match can run into is handled in place.

use thiserror::Error;

/// Invariant violations reported by the bout controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoutError {
    #[error("round {round} does not exist (current round is {current})")]
    UnknownRound { round: u32, current: u32 },

    #[error("round {round} is outside the match (max {max})")]
    RoundOutOfRange { round: u32, max: u32 },
}

/// Problems loading or validating a [`crate::config::MatchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// An event name that matches no [`crate::events::EventKind`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event name: {0}")]
pub struct UnknownEvent(pub String);
