//! Knight spawn and placement.
//!
//! The player's knight starts at the positive end in the near lane facing
//! left; the opponent mirrors it. After every round the two swap ends.

use hecs::{Entity, World};

use joust_ai::opponent::{AiPolicy, AiTuning};
use joust_ai::player::PlayerPolicy;
use joust_ai::policy::TargetingPolicy;
use joust_core::config::MatchConfig;
use joust_core::constants::KNIGHT_HEIGHT;
use joust_core::enums::{Facing, Team};
use joust_core::regions::HitRegionSet;

use crate::knight::{Knight, KnightMotion};
use crate::lance::{Aim, Lance};
use crate::skeleton::Skeleton;

/// Opening placement (start x, lane z, facing) for a knight.
pub fn initial_placement(config: &MatchConfig, is_player: bool) -> (f32, f32, Facing) {
    if is_player {
        (config.start_x, config.lane_z[0], Facing::Left)
    } else {
        (-config.start_x, config.lane_z[1], Facing::Right)
    }
}

/// Spawn both knights. Returned entities are indexed by [`Team::index`].
pub fn spawn_knights(world: &mut World, config: &MatchConfig) -> [Entity; 2] {
    Team::ALL.map(|team| spawn_knight(world, config, team))
}

pub fn spawn_knight(world: &mut World, config: &MatchConfig, team: Team) -> Entity {
    let is_player = team == config.player_team;
    let (start_x, lane_z, facing) = initial_placement(config, is_player);

    let policy: Box<dyn TargetingPolicy> = if is_player && !config.autopilot {
        Box::new(PlayerPolicy)
    } else {
        Box::new(AiPolicy::new(AiTuning::from(config)))
    };

    world.spawn((
        Knight::new(team, is_player),
        KnightMotion::at_start(start_x, lane_z, KNIGHT_HEIGHT, facing),
        Skeleton::default(),
        HitRegionSet::default(),
        Lance::new(config.lance_range),
        Aim(policy),
    ))
}

/// Put both knights back at their opening placement.
pub fn restore_initial_placement(world: &mut World, config: &MatchConfig) {
    for (_entity, (knight, motion)) in world.query_mut::<(&Knight, &mut KnightMotion)>() {
        let (start_x, lane_z, facing) = initial_placement(config, knight.is_player);
        motion.place(start_x, lane_z, facing);
    }
}

/// Exchange starting ends and lanes, turn both knights around, and stand
/// them at their new starts.
pub fn swap_ends(world: &mut World, knights: &[Entity; 2]) {
    let placements: Vec<(f32, f32, Facing)> = knights
        .iter()
        .filter_map(|entity| {
            world
                .get::<&KnightMotion>(*entity)
                .ok()
                .map(|m| (m.start_x, m.lane_z, m.facing))
        })
        .collect();
    if placements.len() != knights.len() {
        tracing::warn!("cannot swap ends, knight missing");
        return;
    }

    for (entity, (start_x, lane_z, facing)) in knights.iter().zip(placements.into_iter().rev()) {
        if let Ok(mut motion) = world.get::<&mut KnightMotion>(*entity) {
            motion.place(start_x, lane_z, facing);
        }
    }
}

/// Clear per-round flags on every knight, lance and policy.
pub fn reset_round_state(world: &mut World) {
    for (_entity, (knight, motion, lance, aim)) in
        world.query_mut::<(&mut Knight, &mut KnightMotion, &mut Lance, &mut Aim)>()
    {
        knight.reset_round_state();
        motion.return_to_start();
        lance.reset_round_state();
        aim.0.reset();
    }
}
