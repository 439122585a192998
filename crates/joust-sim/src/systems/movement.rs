//! Charge and walk-out movement.
//!
//! Knights charge toward the far end at charge speed (slow motion
//! applies). Once there they walk on at walking pace, which ignores slow
//! motion, and report the distance covered.

use hecs::World;

use joust_core::config::MatchConfig;
use joust_core::constants::FAR_END_TOLERANCE;

use crate::bout::BoutController;
use crate::knight::{Knight, KnightMotion};

/// `dt` is the scaled frame time, `walk_dt` the unscaled one.
pub fn run(
    world: &mut World,
    controller: &mut BoutController,
    config: &MatchConfig,
    dt: f32,
    walk_dt: f32,
) {
    for (_entity, (knight, motion)) in world.query_mut::<(&Knight, &mut KnightMotion)>() {
        let sign = motion.facing.sign();
        if motion.walking {
            motion.position.x += sign * config.walk_speed * walk_dt;
            controller.update_walked_distance(knight.team, motion.walked_distance());
            continue;
        }

        motion.position.x += sign * config.charge_speed * dt;
        if motion.has_reached_far_end(FAR_END_TOLERANCE) {
            motion.walking = true;
            motion.walk_start_x = motion.position.x;
            tracing::debug!(team = %knight.team, "reached far end");
            controller.mark_reached_far_end(knight.team);
        }
    }
}
