//! Lance component and hit resolution.
//!
//! Each frame the lance origin follows the hand anchor, the tip speed is
//! derived from how far the origin moved, and an aimed lance casts a ray
//! of fixed length against the opponent's regions. The nearest region hit
//! decides the score.

use glam::{Quat, Vec3};

use joust_ai::policy::{lance_orientation, TargetingPolicy};
use joust_core::constants::LANCE_HAND_OFFSET;
use joust_core::enums::Facing;
use joust_core::regions::{HitRegion, HitRegionSet};
use joust_core::types::HitData;

use crate::geometry::{nearest_region_hit, Ray};
use crate::skeleton::local_offset;

#[derive(Debug, Clone, PartialEq)]
pub struct Lance {
    pub origin: Vec3,
    previous_origin: Option<Vec3>,
    /// Unit aim direction, zero until the policy first aims this round.
    pub aim_direction: Vec3,
    pub orientation: Quat,
    /// Tip speed in display units.
    pub speed: f32,
    pub range: f32,
    pub has_scored_this_round: bool,
}

impl Lance {
    pub fn new(range: f32) -> Self {
        Self {
            origin: Vec3::ZERO,
            previous_origin: None,
            aim_direction: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            speed: 0.0,
            range,
            has_scored_this_round: false,
        }
    }

    /// Follow the hand anchor and update the tip speed.
    pub fn refresh_origin(&mut self, hand: Vec3, facing: Facing, dt: f32, unit_factor: f32) {
        let origin = hand + local_offset(facing, Vec3::from(LANCE_HAND_OFFSET));
        if let Some(previous) = self.previous_origin {
            if dt > 0.0 {
                self.speed = previous.distance(origin) / dt * unit_factor;
            }
        }
        self.previous_origin = Some(origin);
        self.origin = origin;
    }

    pub fn set_aim(&mut self, direction: Vec3) {
        self.aim_direction = direction.normalize_or_zero();
        self.orientation = lance_orientation(self.aim_direction);
    }

    pub fn is_aimed(&self) -> bool {
        self.aim_direction != Vec3::ZERO
    }

    /// End of the scoring ray.
    pub fn tip(&self) -> Vec3 {
        self.origin + self.aim_direction * self.range
    }

    /// Nearest opponent region along the aim within range.
    pub fn cast<'a>(&self, opponent: &'a HitRegionSet) -> Option<(&'a HitRegion, f32)> {
        let ray = Ray::new(self.origin, self.aim_direction)?;
        nearest_region_hit(&ray, self.range, opponent)
    }

    pub fn reset_round_state(&mut self) {
        self.has_scored_this_round = false;
        self.previous_origin = None;
        self.speed = 0.0;
        self.aim_direction = Vec3::ZERO;
        self.orientation = Quat::IDENTITY;
    }
}

/// Result data for striking `region` at `speed`.
pub fn score_hit(region: &HitRegion, speed: f32) -> HitData {
    HitData::hit(region.name.clone(), region.tier.points(), speed)
}

/// The targeting policy driving a lance.
pub struct Aim(pub Box<dyn TargetingPolicy>);
