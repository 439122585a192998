//! Skeleton sampling.
//!
//! Joint positions come from a [`SkeletonProvider`]. The engine asks it
//! once per frame, before any combat logic, for the lance hand, the head
//! and every hit region. A knight whose model has not loaded yet gets no
//! hand anchor, which keeps its lance inert and its regions empty.

use glam::Vec3;

use joust_core::enums::{Facing, Team};
use joust_core::regions::{HitRegion, STANDARD_REGIONS};

/// Where a knight stands this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnightPose {
    pub team: Team,
    pub position: Vec3,
    pub facing: Facing,
}

impl KnightPose {
    /// Map a rig-local offset (forward, up, toward the barrier side) to world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + local_offset(self.facing, local)
    }
}

/// Rotate a rig-local offset (forward, up, left) into world axes.
pub fn local_offset(facing: Facing, local: Vec3) -> Vec3 {
    let forward = facing.forward();
    let left = Vec3::Y.cross(forward);
    forward * local.x + Vec3::Y * local.y + left * local.z
}

/// Source of joint positions for both knights.
pub trait SkeletonProvider: Send {
    /// Whether this team's model is available.
    fn is_loaded(&self, team: Team) -> bool;

    /// World position of the hand holding the lance.
    fn hand_anchor(&self, pose: &KnightPose) -> Vec3;

    /// World position of the head, used for the first-person camera.
    fn head(&self, pose: &KnightPose) -> Vec3;

    /// The regions this rig exposes. Asked once per knight.
    fn regions(&self) -> Vec<HitRegion>;

    /// World position of a named region joint.
    fn region_position(&self, pose: &KnightPose, name: &str) -> Option<Vec3>;
}

/// Fixed-offset rig for the standard knight model.
#[derive(Debug, Clone)]
pub struct StandardRig {
    joints: Vec<(&'static str, Vec3)>,
    hand: Vec3,
    head: Vec3,
    loaded: [bool; 2],
}

impl Default for StandardRig {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardRig {
    pub fn new() -> Self {
        let joints = STANDARD_REGIONS
            .iter()
            .map(|name| (*name, standard_joint_offset(name)))
            .collect();
        Self {
            joints,
            hand: Vec3::new(0.3, 1.1, 0.2),
            head: Vec3::new(0.0, 1.6, 0.0),
            loaded: [true; 2],
        }
    }

    /// Rig whose model for `team` is still loading.
    pub fn with_unloaded(mut self, team: Team) -> Self {
        self.loaded[team.index()] = false;
        self
    }

    pub fn set_loaded(&mut self, team: Team, loaded: bool) {
        self.loaded[team.index()] = loaded;
    }
}

fn standard_joint_offset(name: &str) -> Vec3 {
    match name {
        "Head" => Vec3::new(0.0, 1.6, 0.0),
        "Neck" => Vec3::new(0.0, 1.3, 0.0),
        "ShoulderL" => Vec3::new(0.0, 1.1, 0.25),
        "ShoulderR" => Vec3::new(0.0, 1.1, -0.25),
        "Spine" => Vec3::new(0.0, 0.7, 0.0),
        "ArmL" => Vec3::new(0.1, 0.8, 0.4),
        "ArmR" => Vec3::new(0.1, 0.8, -0.4),
        "LegL" => Vec3::new(0.0, -0.3, 0.3),
        "LegR" => Vec3::new(0.0, -0.3, -0.3),
        _ => Vec3::ZERO,
    }
}

impl SkeletonProvider for StandardRig {
    fn is_loaded(&self, team: Team) -> bool {
        self.loaded[team.index()]
    }

    fn hand_anchor(&self, pose: &KnightPose) -> Vec3 {
        pose.to_world(self.hand)
    }

    fn head(&self, pose: &KnightPose) -> Vec3 {
        pose.to_world(self.head)
    }

    fn regions(&self) -> Vec<HitRegion> {
        self.joints.iter().map(|(name, _)| HitRegion::new(*name)).collect()
    }

    fn region_position(&self, pose: &KnightPose, name: &str) -> Option<Vec3> {
        self.joints
            .iter()
            .find(|(joint, _)| *joint == name)
            .map(|(_, offset)| pose.to_world(*offset))
    }
}

/// Per-knight joint samples written each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Skeleton {
    pub hand_anchor: Option<Vec3>,
    pub head: Option<Vec3>,
}

impl Skeleton {
    /// The model is loaded and the lance can operate.
    pub fn is_ready(&self) -> bool {
        self.hand_anchor.is_some()
    }
}
