//! Builds the per-tick [`MatchSnapshot`].

use hecs::{Entity, World};

use joust_core::events::BoutEvent;
use joust_core::state::{KnightView, LanceView, MatchSnapshot};
use joust_core::types::SimTime;

use crate::bout::BoutController;
use crate::knight::{Knight, KnightMotion};
use crate::lance::Lance;
use crate::skeleton::Skeleton;

pub struct FrameState {
    pub time: SimTime,
    pub paused: bool,
    pub time_scale: f32,
}

pub fn build_snapshot(
    world: &World,
    knights: &[Entity; 2],
    controller: &BoutController,
    frame: FrameState,
    events: Vec<BoutEvent>,
) -> MatchSnapshot {
    let knights = knights
        .iter()
        .filter_map(|entity| knight_view(world, *entity))
        .collect();

    MatchSnapshot {
        time: frame.time,
        phase: controller.phase(),
        round: controller.current_round(),
        max_rounds: controller.max_rounds(),
        countdown: controller.countdown(),
        movement_enabled: controller.movement_enabled(),
        paused: frame.paused,
        time_scale: frame.time_scale,
        scores: controller.scores(),
        rounds: controller.rounds().to_vec(),
        knights,
        events,
    }
}

fn knight_view(world: &World, entity: Entity) -> Option<KnightView> {
    let knight = world.get::<&Knight>(entity).ok()?;
    let motion = world.get::<&KnightMotion>(entity).ok()?;
    let skeleton = world.get::<&Skeleton>(entity).ok()?;
    let lance = world.get::<&Lance>(entity).ok()?;

    Some(KnightView {
        team: knight.team,
        is_player: knight.is_player,
        position: motion.position,
        facing: motion.facing,
        has_scored_this_round: knight.has_scored_this_round,
        ready: skeleton.is_ready(),
        lance: LanceView {
            origin: lance.origin,
            aim_direction: lance.aim_direction,
            tip: lance.tip(),
            speed: lance.speed,
            has_scored_this_round: lance.has_scored_this_round,
        },
    })
}
