//! Pointer-driven aiming.
//!
//! The camera ray supplies direction only; the ray itself starts at the
//! lance origin. No smoothing and no target lock.

use glam::{Vec2, Vec3};
use rand::RngCore;

use crate::camera::CameraRay;
use crate::policy::{AimContext, PolicyKind, TargetingPolicy};

/// Unproject the pointer and use the camera ray's direction unmodified.
pub fn compute_aim_direction(pointer_ndc: Vec2, camera: &dyn CameraRay, _weapon_origin: Vec3) -> Vec3 {
    camera.unproject_direction(pointer_ndc).normalize_or_zero()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerPolicy;

impl TargetingPolicy for PlayerPolicy {
    fn aim(&mut self, ctx: &AimContext<'_>, _rng: &mut dyn RngCore) -> Option<Vec3> {
        let pointer = ctx.pointer?;
        let camera = ctx.camera?;
        let direction = compute_aim_direction(pointer, camera, ctx.origin);
        (direction != Vec3::ZERO).then_some(direction)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Player
    }
}
