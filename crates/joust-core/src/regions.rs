//! Per-knight hit regions.
//!
//! Regions are populated once when the knight's skeleton becomes available.
//! Their world positions are written by the skeleton provider every frame
//! and only read by targeting and lance resolution.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{BODY_REGION_RADIUS, HEAD_REGION_RADIUS};
use crate::enums::RegionTier;

/// Region names on the standard knight rig.
pub const STANDARD_REGIONS: [&str; 9] = [
    "Head", "Neck", "ShoulderL", "ShoulderR", "Spine", "ArmL", "ArmR", "LegL", "LegR",
];

/// A named target sphere attached to a skeleton joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub name: String,
    pub tier: RegionTier,
    pub radius: f32,
    pub world_position: Vec3,
}

impl HitRegion {
    /// Build a region, deriving tier and radius from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tier = RegionTier::classify(&name);
        let radius = if tier == RegionTier::Head {
            HEAD_REGION_RADIUS
        } else {
            BODY_REGION_RADIUS
        };
        Self {
            name,
            tier,
            radius,
            world_position: Vec3::ZERO,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.world_position = position;
        self
    }
}

/// All hit regions of one knight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitRegionSet {
    regions: Vec<HitRegion>,
}

impl HitRegionSet {
    pub fn new(regions: Vec<HitRegion>) -> Self {
        Self { regions }
    }

    /// Whether the skeleton has provided regions yet.
    pub fn is_populated(&self) -> bool {
        !self.regions.is_empty()
    }

    /// Fill the set once. Later calls are ignored.
    pub fn populate(&mut self, regions: impl IntoIterator<Item = HitRegion>) {
        if self.regions.is_empty() {
            self.regions.extend(regions);
        }
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn get_region(&self, name: &str) -> Option<&HitRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn get_all_regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn get_regions_by_tier(&self, tier: RegionTier) -> Vec<&HitRegion> {
        self.regions.iter().filter(|r| r.tier == tier).collect()
    }

    /// Skeleton-provider write path.
    pub fn set_position(&mut self, name: &str, position: Vec3) -> bool {
        match self.regions.iter_mut().find(|r| r.name == name) {
            Some(region) => {
                region.world_position = position;
                true
            }
            None => false,
        }
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, HitRegion> {
        self.regions.iter_mut()
    }
}
