//! Weighted region table for AI target selection.

use glam::Vec3;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use joust_core::constants::FALLBACK_AIM_HEIGHT;
use joust_core::regions::HitRegionSet;

/// Relative draw weight per standard region name (sums to 100).
pub const REGION_WEIGHTS: [(&str, f32); 9] = [
    ("Head", 60.0),
    ("Neck", 10.0),
    ("ShoulderL", 5.0),
    ("ShoulderR", 5.0),
    ("Spine", 5.0),
    ("LegL", 5.0),
    ("LegR", 5.0),
    ("ArmL", 2.5),
    ("ArmR", 2.5),
];

/// Draw a target region name. Regions missing from `regions` are skipped
/// and the remaining weights renormalize. `None` when nothing is drawable.
pub fn draw_region<'a, R: Rng + ?Sized>(regions: &'a HitRegionSet, rng: &mut R) -> Option<&'a str> {
    let available: Vec<(&'a str, f32)> = REGION_WEIGHTS
        .iter()
        .filter_map(|(name, weight)| regions.get_region(name).map(|r| (r.name.as_str(), *weight)))
        .collect();

    let Ok(dist) = WeightedIndex::new(available.iter().map(|(_, w)| *w)) else {
        tracing::debug!("no targetable region, aiming at opponent body");
        return None;
    };
    Some(available[dist.sample(rng)].0)
}

/// World point to aim at: the named region's current position, or just
/// above the opponent's root when the region is missing.
pub fn target_point(regions: &HitRegionSet, name: Option<&str>, opponent_position: Vec3) -> Vec3 {
    name.and_then(|name| regions.get_region(name))
        .map(|region| region.world_position)
        .unwrap_or(opponent_position + Vec3::Y * FALLBACK_AIM_HEIGHT)
}
