//! Match configuration.
//!
//! Every field defaults to the matching constant, so a config file only
//! needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Team;
use crate::error::ConfigError;

/// Tunable parameters for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed = same match.
    pub seed: u64,
    pub max_rounds: u32,
    pub countdown_start: u32,
    pub countdown_interval_secs: f64,
    pub transition_delay_secs: f64,
    pub walk_out_distance: f32,
    pub charge_speed: f32,
    pub walk_speed: f32,
    pub start_x: f32,
    pub lane_z: [f32; 2],
    pub lance_range: f32,
    pub speed_unit_factor: f32,
    pub ai_retarget_secs: f32,
    pub ai_smoothing: f32,
    pub rear_clamp_threshold: f32,
    pub rear_clamp_vertical_keep: f32,
    pub slowdown_distance: f32,
    pub slowdown_factor: f32,
    /// Team controlled by the pointer.
    pub player_team: Team,
    /// Drive the player's lance with the AI policy too.
    pub autopilot: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_rounds: DEFAULT_MAX_ROUNDS,
            countdown_start: COUNTDOWN_START,
            countdown_interval_secs: COUNTDOWN_INTERVAL_SECS,
            transition_delay_secs: ROUND_TRANSITION_DELAY_SECS,
            walk_out_distance: WALK_OUT_DISTANCE,
            charge_speed: CHARGE_SPEED,
            walk_speed: WALK_SPEED,
            start_x: START_X,
            lane_z: LANE_Z,
            lance_range: LANCE_HIT_RANGE,
            speed_unit_factor: SPEED_UNIT_FACTOR,
            ai_retarget_secs: AI_RETARGET_SECS,
            ai_smoothing: AI_AIM_SMOOTHING,
            rear_clamp_threshold: REAR_CLAMP_THRESHOLD,
            rear_clamp_vertical_keep: REAR_CLAMP_VERTICAL_KEEP,
            slowdown_distance: SLOWDOWN_DISTANCE,
            slowdown_factor: SLOWDOWN_FACTOR,
            player_team: Team::A,
            autopilot: false,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid("max_rounds must be at least 1".into()));
        }
        if self.countdown_interval_secs <= 0.0 || self.transition_delay_secs < 0.0 {
            return Err(ConfigError::Invalid("timer durations must be positive".into()));
        }
        let positive = [
            ("walk_out_distance", self.walk_out_distance),
            ("charge_speed", self.charge_speed),
            ("walk_speed", self.walk_speed),
            ("start_x", self.start_x),
            ("lance_range", self.lance_range),
            ("speed_unit_factor", self.speed_unit_factor),
            ("ai_retarget_secs", self.ai_retarget_secs),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if !(0.0..=1.0).contains(&self.ai_smoothing) || self.ai_smoothing == 0.0 {
            return Err(ConfigError::Invalid("ai_smoothing must be in (0, 1]".into()));
        }
        if !(-1.0..=0.0).contains(&self.rear_clamp_threshold) {
            return Err(ConfigError::Invalid(
                "rear_clamp_threshold must be in [-1, 0]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rear_clamp_vertical_keep) {
            return Err(ConfigError::Invalid(
                "rear_clamp_vertical_keep must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.slowdown_factor) || self.slowdown_factor == 0.0 {
            return Err(ConfigError::Invalid("slowdown_factor must be in (0, 1]".into()));
        }
        Ok(())
    }
}
