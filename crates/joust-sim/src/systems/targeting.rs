//! Lance aiming.
//!
//! Each ready lance asks its policy for a direction. Only the player's
//! policy sees the pointer and camera.

use glam::Vec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use joust_ai::camera::CameraRay;
use joust_ai::policy::AimContext;
use joust_core::enums::Team;
use joust_core::regions::HitRegionSet;

use crate::knight::{Knight, KnightMotion};
use crate::lance::{Aim, Lance};
use crate::skeleton::Skeleton;

/// Player input available this frame.
#[derive(Clone, Copy, Default)]
pub struct PointerInput<'a> {
    pub pointer: Option<Vec2>,
    pub camera: Option<&'a dyn CameraRay>,
}

pub fn run(
    world: &World,
    knights: &[Entity; 2],
    input: PointerInput<'_>,
    dt: f32,
    rng: &mut ChaCha8Rng,
) {
    for team in Team::ALL {
        let own = knights[team.index()];
        let opponent = knights[team.opponent().index()];

        let (Ok(knight), Ok(motion), Ok(skeleton)) = (
            world.get::<&Knight>(own),
            world.get::<&KnightMotion>(own),
            world.get::<&Skeleton>(own),
        ) else {
            continue;
        };
        if !skeleton.is_ready() {
            continue;
        }
        let (Ok(opponent_motion), Ok(opponent_regions)) = (
            world.get::<&KnightMotion>(opponent),
            world.get::<&HitRegionSet>(opponent),
        ) else {
            continue;
        };
        let (Ok(mut lance), Ok(mut aim)) = (world.get::<&mut Lance>(own), world.get::<&mut Aim>(own))
        else {
            continue;
        };

        let (pointer, camera) = if knight.is_player {
            (input.pointer, input.camera)
        } else {
            (None, None)
        };
        let ctx = AimContext {
            dt,
            origin: lance.origin,
            owner_position: motion.position,
            owner_facing: motion.facing,
            opponent_position: opponent_motion.position,
            opponent_regions: &opponent_regions,
            pointer,
            camera,
        };

        if let Some(direction) = aim.0.aim(&ctx, rng) {
            lance.set_aim(direction);
        }
    }
}
