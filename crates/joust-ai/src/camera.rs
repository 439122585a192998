//! Pointer unprojection for the player's view.

use glam::{Mat4, Vec2, Vec3};

use joust_core::enums::Facing;

/// Turns a pointer position into a world-space ray direction.
pub trait CameraRay {
    /// Unit direction of the ray through `ndc` (x, y in -1..1).
    fn unproject_direction(&self, ndc: Vec2) -> Vec3;
}

/// A right-handed perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// First-person camera at a knight's head, looking down the list.
    pub fn pov(head: Vec3, facing: Facing) -> Self {
        Self {
            position: head,
            forward: facing.forward(),
            up: Vec3::Y,
            fov_y_radians: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_to_rh(self.position, self.forward, self.up);
        let projection = Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far);
        projection * view
    }
}

impl CameraRay for PerspectiveCamera {
    fn unproject_direction(&self, ndc: Vec2) -> Vec3 {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        (far - near).normalize_or_zero()
    }
}
