//! The targeting policy seam shared by player and AI lances.

use glam::{Quat, Vec2, Vec3};
use rand::RngCore;

use joust_core::constants::LANCE_FORWARD;
use joust_core::enums::Facing;
use joust_core::regions::HitRegionSet;

use crate::camera::CameraRay;

/// Everything a policy may read when aiming for one frame.
pub struct AimContext<'a> {
    /// Frame time in seconds (slow motion already applied).
    pub dt: f32,
    /// Lance origin this frame.
    pub origin: Vec3,
    pub owner_position: Vec3,
    pub owner_facing: Facing,
    pub opponent_position: Vec3,
    pub opponent_regions: &'a HitRegionSet,
    /// Latest pointer position in NDC, player input only.
    pub pointer: Option<Vec2>,
    /// Camera used to unproject the pointer, player input only.
    pub camera: Option<&'a dyn CameraRay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Player,
    Ai,
}

/// Computes a lance aim direction every frame.
pub trait TargetingPolicy: Send + Sync {
    /// Unit aim direction for this frame, or `None` when the policy has
    /// nothing to aim with yet (no pointer input).
    fn aim(&mut self, ctx: &AimContext<'_>, rng: &mut dyn RngCore) -> Option<Vec3>;

    /// Clear per-round state.
    fn reset(&mut self) {}

    fn kind(&self) -> PolicyKind;
}

/// Rotation taking the lance's reference forward axis onto `direction`.
pub fn lance_orientation(direction: Vec3) -> Quat {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::from(LANCE_FORWARD), direction)
}
