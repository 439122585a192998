//! Ray casting against hit-region spheres.

use glam::Vec3;

use joust_core::regions::{HitRegion, HitRegionSet};

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        direction
            .try_normalize()
            .map(|direction| Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to where it enters the sphere. An origin
    /// already inside the sphere hits at distance 0.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let far = -b + root;
        if far < 0.0 {
            return None;
        }
        Some((-b - root).max(0.0))
    }
}

/// Nearest region the ray enters within `range`.
pub fn nearest_region_hit<'a>(
    ray: &Ray,
    range: f32,
    regions: &'a HitRegionSet,
) -> Option<(&'a HitRegion, f32)> {
    regions
        .get_all_regions()
        .iter()
        .filter_map(|region| {
            ray.intersect_sphere(region.world_position, region.radius)
                .filter(|distance| *distance <= range)
                .map(|distance| (region, distance))
        })
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}
