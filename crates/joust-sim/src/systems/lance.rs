//! Lance origin tracking and hit resolution.

use hecs::{Entity, World};

use joust_core::enums::Team;
use joust_core::regions::HitRegionSet;
use joust_core::types::HitData;

use crate::bout::BoutController;
use crate::knight::{Knight, KnightMotion};
use crate::lance::{score_hit, Lance};
use crate::skeleton::Skeleton;

/// Move every ready lance to its hand anchor and update tip speed.
pub fn refresh_origins(world: &mut World, dt: f32, unit_factor: f32) {
    for (_entity, (motion, skeleton, lance)) in
        world.query_mut::<(&KnightMotion, &Skeleton, &mut Lance)>()
    {
        if let Some(hand) = skeleton.hand_anchor {
            lance.refresh_origin(hand, motion.facing, dt, unit_factor);
        }
    }
}

/// Cast each aimed lance against its opponent's regions and score the
/// nearest hit. A lance scores at most once per round.
pub fn resolve_hits(world: &mut World, knights: &[Entity; 2], controller: &mut BoutController) {
    for team in Team::ALL {
        let own = knights[team.index()];
        let opponent = knights[team.opponent().index()];
        if own == opponent {
            continue;
        }

        let Some((data, distance)) = find_hit(world, own, opponent) else {
            continue;
        };

        tracing::debug!(
            %team,
            region = data.region_hit.as_deref().unwrap_or_default(),
            points = data.points_earned,
            speed = data.speed_on_contact,
            distance,
            "lance hit"
        );

        let Ok((lance, knight)) = world.query_one_mut::<(&mut Lance, &mut Knight)>(own) else {
            continue;
        };
        knight.register_hit(data, controller);
        lance.has_scored_this_round = knight.has_scored_this_round;
    }
}

/// Score data and distance for the region `own`'s lance would strike.
fn find_hit(world: &World, own: Entity, opponent: Entity) -> Option<(HitData, f32)> {
    let lance = world.get::<&Lance>(own).ok()?;
    let skeleton = world.get::<&Skeleton>(own).ok()?;
    if lance.has_scored_this_round || !lance.is_aimed() || !skeleton.is_ready() {
        return None;
    }
    let regions = world.get::<&HitRegionSet>(opponent).ok()?;
    let (region, distance) = lance.cast(&regions)?;
    Some((score_hit(region, lance.speed), distance))
}
