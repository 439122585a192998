//! Per-frame skeleton refresh.
//!
//! Runs before any combat logic so every reader sees this frame's joints.

use hecs::World;

use joust_core::regions::HitRegionSet;

use crate::knight::{Knight, KnightMotion};
use crate::skeleton::{KnightPose, Skeleton, SkeletonProvider};

pub fn run(world: &mut World, provider: &dyn SkeletonProvider) {
    for (_entity, (knight, motion, skeleton, regions)) in
        world.query_mut::<(&Knight, &KnightMotion, &mut Skeleton, &mut HitRegionSet)>()
    {
        if !provider.is_loaded(knight.team) {
            *skeleton = Skeleton::default();
            continue;
        }

        let pose = KnightPose {
            team: knight.team,
            position: motion.position,
            facing: motion.facing,
        };

        if !regions.is_populated() {
            regions.populate(provider.regions());
            tracing::debug!(
                team = %knight.team,
                count = regions.get_all_regions().len(),
                "hit regions populated"
            );
        }
        for region in regions.iter_mut() {
            if let Some(position) = provider.region_position(&pose, &region.name) {
                region.world_position = position;
            }
        }

        skeleton.hand_anchor = Some(provider.hand_anchor(&pose));
        skeleton.head = Some(provider.head(&pose));
    }
}
