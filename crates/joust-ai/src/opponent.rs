//! AI lance aiming.
//!
//! Every retarget interval the AI draws a new target region from the
//! opponent's weighted regions. The region is followed as it moves, and
//! the aim point it actually uses eases toward it a little each frame,
//! so re-aiming is visible. Easing happens relative to the opponent's
//! root, which keeps the charge itself from dragging the aim behind.
//! Once the AI has passed its opponent, backward aim is clamped forward.

use glam::Vec3;
use rand::RngCore;

use joust_core::config::MatchConfig;
use joust_core::constants::*;
use joust_core::enums::Facing;

use crate::policy::{AimContext, PolicyKind, TargetingPolicy};
use crate::weights::{draw_region, target_point};

/// AI aiming parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTuning {
    pub retarget_secs: f32,
    pub smoothing: f32,
    pub rear_clamp_threshold: f32,
    pub rear_clamp_vertical_keep: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            retarget_secs: AI_RETARGET_SECS,
            smoothing: AI_AIM_SMOOTHING,
            rear_clamp_threshold: REAR_CLAMP_THRESHOLD,
            rear_clamp_vertical_keep: REAR_CLAMP_VERTICAL_KEEP,
        }
    }
}

impl From<&MatchConfig> for AiTuning {
    fn from(config: &MatchConfig) -> Self {
        Self {
            retarget_secs: config.ai_retarget_secs,
            smoothing: config.ai_smoothing,
            rear_clamp_threshold: config.rear_clamp_threshold,
            rear_clamp_vertical_keep: config.rear_clamp_vertical_keep,
        }
    }
}

/// Per-lance AI aiming state.
#[derive(Debug, Clone, Default)]
pub struct AiPolicy {
    pub tuning: AiTuning,
    /// Region drawn at the last retarget; `None` when nothing was drawable.
    pub target_region: Option<String>,
    /// World position of the drawn region this frame; `None` until the
    /// first draw of a round.
    pub target_aim_point: Option<Vec3>,
    /// Smoothed point the lance actually aims at.
    pub current_aim_point: Vec3,
    /// `current_aim_point` relative to the opponent's root.
    pub aim_offset: Vec3,
    pub time_since_retarget: f32,
    pub has_passed_opponent: bool,
}

impl AiPolicy {
    pub fn new(tuning: AiTuning) -> Self {
        Self {
            tuning,
            ..Default::default()
        }
    }

    /// Advance aiming state by one frame and return the aim direction.
    pub fn update(&mut self, ctx: &AimContext<'_>, rng: &mut dyn RngCore) -> Vec3 {
        self.time_since_retarget += ctx.dt;

        let first_draw = self.target_aim_point.is_none();
        if first_draw || self.time_since_retarget >= self.tuning.retarget_secs {
            self.target_region = draw_region(ctx.opponent_regions, rng).map(str::to_owned);
            self.time_since_retarget = 0.0;
        }

        let target = target_point(
            ctx.opponent_regions,
            self.target_region.as_deref(),
            ctx.opponent_position,
        );
        self.target_aim_point = Some(target);

        let target_offset = target - ctx.opponent_position;
        if first_draw {
            // No previous aim to ease from.
            self.aim_offset = target_offset;
        }
        self.aim_offset = self.aim_offset.lerp(target_offset, self.tuning.smoothing);
        self.current_aim_point = ctx.opponent_position + self.aim_offset;

        let forward = ctx.owner_facing.forward();
        let direction = (self.current_aim_point - ctx.origin)
            .try_normalize()
            .unwrap_or(forward);

        self.has_passed_opponent = has_passed(
            ctx.owner_position.x,
            ctx.opponent_position.x,
            ctx.owner_facing,
        );

        if self.has_passed_opponent {
            rear_clamp(
                direction,
                forward,
                self.tuning.rear_clamp_threshold,
                self.tuning.rear_clamp_vertical_keep,
            )
        } else {
            direction
        }
    }
}

impl TargetingPolicy for AiPolicy {
    fn aim(&mut self, ctx: &AimContext<'_>, rng: &mut dyn RngCore) -> Option<Vec3> {
        Some(self.update(ctx, rng))
    }

    fn reset(&mut self) {
        self.target_region = None;
        self.target_aim_point = None;
        self.time_since_retarget = 0.0;
        self.has_passed_opponent = false;
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Ai
    }
}

/// Whether a knight facing `facing` at `own_x` is past an opponent at `opponent_x`.
pub fn has_passed(own_x: f32, opponent_x: f32, facing: Facing) -> bool {
    match facing {
        Facing::Left => own_x < opponent_x,
        Facing::Right => own_x > opponent_x,
    }
}

/// Pull a substantially backward aim onto the forward axis, keeping part
/// of its vertical component.
pub fn rear_clamp(direction: Vec3, forward: Vec3, threshold: f32, vertical_keep: f32) -> Vec3 {
    if direction.dot(forward) >= threshold {
        return direction;
    }
    Vec3::new(forward.x, direction.y * vertical_keep, forward.z)
        .try_normalize()
        .unwrap_or(forward)
}
