#[cfg(test)]
mod bout_tests {
    use std::sync::{Arc, Mutex};

    use joust_core::enums::{BoutPhase, Team, Winner};
    use joust_core::error::BoutError;
    use joust_core::events::{BoutEvent, EventKind};
    use joust_core::types::{HitData, RoundResult};

    use crate::bout::{BoutController, BoutSettings};

    fn settings(max_rounds: u32) -> BoutSettings {
        BoutSettings {
            max_rounds,
            ..BoutSettings::default()
        }
    }

    /// Controller with round 1 started and its countdown finished.
    fn charging(max_rounds: u32) -> BoutController {
        let mut controller = BoutController::new(settings(max_rounds));
        controller.start_match();
        controller.advance_clock(3.0);
        assert_eq!(controller.phase(), BoutPhase::MovementActive);
        controller
    }

    fn finish_pass(controller: &mut BoutController) {
        for team in Team::ALL {
            controller.mark_reached_far_end(team);
            controller.update_walked_distance(team, 3.0);
        }
    }

    fn recorder(
        controller: &mut BoutController,
        kind: EventKind,
    ) -> Arc<Mutex<Vec<BoutEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = controller.on(
            kind,
            Box::new(move |event| sink.lock().unwrap().push(event.clone())),
        );
        seen
    }

    fn count(events: &[BoutEvent], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind() == kind).count()
    }

    // ---- Countdown ----

    #[test]
    fn test_countdown_sequence() {
        let mut controller = BoutController::new(settings(5));
        let seen = recorder(&mut controller, EventKind::Countdown);

        controller.start_match();
        assert_eq!(controller.countdown(), Some(3));
        assert!(!controller.movement_enabled());

        for _ in 0..3 {
            controller.advance_clock(1.0);
        }

        let remaining: Vec<u32> = seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                BoutEvent::Countdown { remaining, .. } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(remaining, vec![3, 2, 1, 0]);
        assert!(controller.movement_enabled());
        assert_eq!(controller.phase(), BoutPhase::MovementActive);
        assert_eq!(controller.pending_timers(), 0, "countdown timer should be cancelled");
    }

    #[test]
    fn test_countdown_accumulates_frame_steps() {
        let mut controller = BoutController::new(settings(5));
        controller.start_match();
        for _ in 0..60 {
            controller.advance_clock(1.0 / 60.0);
        }
        assert_eq!(controller.countdown(), Some(2));
    }

    #[test]
    fn test_round_start_precedes_countdown() {
        let mut controller = BoutController::new(settings(5));
        controller.start_match();
        let events = controller.drain_events();
        let kinds: Vec<EventKind> = events.iter().map(BoutEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::RoundStart, EventKind::StateChange, EventKind::Countdown]
        );
    }

    #[test]
    fn test_state_change_on_every_transition() {
        let mut controller = charging(1);
        finish_pass(&mut controller);
        controller.advance_clock(2.0);

        let phases: Vec<BoutPhase> = controller
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                BoutEvent::StateChange { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                BoutPhase::CountdownActive,
                BoutPhase::MovementActive,
                BoutPhase::RoundResolving,
                BoutPhase::TransitionDelay,
                BoutPhase::MatchComplete,
            ]
        );
    }

    // ---- Hit reports ----

    #[test]
    fn test_first_report_wins() {
        let mut controller = charging(5);
        controller
            .report_hit(1, Team::A, HitData::hit("Head", 3, 42.0))
            .unwrap();
        controller
            .report_hit(1, Team::A, HitData::hit("Spine", 2, 30.0))
            .unwrap();

        assert_eq!(controller.scores().a, 3);
        let record = controller.round_record(1).unwrap();
        assert_eq!(record.a.region_hit.as_deref(), Some("Head"));
        assert_eq!(record.a.speed_on_contact, 42.0);

        let events = controller.drain_events();
        assert_eq!(count(&events, EventKind::RoundDataChanged), 2);
        assert_eq!(count(&events, EventKind::PointsChanged), 1);
    }

    #[test]
    fn test_report_unknown_round_errors() {
        let mut controller = charging(5);
        let err = controller
            .report_hit(3, Team::B, HitData::hit("Head", 3, 1.0))
            .unwrap_err();
        assert_eq!(err, BoutError::UnknownRound { round: 3, current: 1 });

        let err = controller
            .report_hit(0, Team::B, HitData::hit("Head", 3, 1.0))
            .unwrap_err();
        assert!(matches!(err, BoutError::UnknownRound { .. }));

        let err = controller
            .report_hit(9, Team::B, HitData::hit("Head", 3, 1.0))
            .unwrap_err();
        assert_eq!(err, BoutError::RoundOutOfRange { round: 9, max: 5 });
        assert_eq!(controller.scores().b, 0);
    }

    // ---- Round completion ----

    #[test]
    fn test_round_completion_marks_misses() {
        let mut controller = charging(5);
        controller
            .report_hit(1, Team::A, HitData::hit("Spine", 2, 18.0))
            .unwrap();
        controller.drain_events();

        finish_pass(&mut controller);

        let record = controller.round_record(1).unwrap();
        assert_eq!(record.a.points_earned, 2);
        assert_eq!(record.b, RoundResult::miss());
        assert_eq!(controller.phase(), BoutPhase::TransitionDelay);
        assert!(!controller.movement_enabled());

        let events = controller.drain_events();
        assert_eq!(count(&events, EventKind::RoundCompleted), 1);
        assert_eq!(count(&events, EventKind::PositionsReset), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            BoutEvent::RoundDataChanged { team: Team::B, result, .. } if result.is_miss()
        )));
    }

    #[test]
    fn test_round_completes_exactly_once() {
        let mut controller = charging(5);
        finish_pass(&mut controller);
        for distance in [3.5, 4.0, 6.0] {
            controller.update_walked_distance(Team::A, distance);
            controller.update_walked_distance(Team::B, distance);
        }
        controller.mark_reached_far_end(Team::A);

        let events = controller.drain_events();
        assert_eq!(count(&events, EventKind::RoundCompleted), 1);
        assert_eq!(controller.pending_timers(), 1);
    }

    #[test]
    fn test_short_walk_does_not_complete() {
        let mut controller = charging(5);
        controller.mark_reached_far_end(Team::A);
        controller.mark_reached_far_end(Team::B);
        controller.update_walked_distance(Team::A, 3.0);
        controller.update_walked_distance(Team::B, 2.9);
        assert_eq!(controller.phase(), BoutPhase::MovementActive);
        assert!(!controller.round_record(1).unwrap().is_resolved());
    }

    #[test]
    fn test_one_knight_reaching_end_is_not_enough() {
        let mut controller = charging(5);
        controller.mark_reached_far_end(Team::A);
        controller.update_walked_distance(Team::A, 10.0);
        controller.update_walked_distance(Team::B, 10.0);
        assert_eq!(controller.phase(), BoutPhase::MovementActive);
    }

    #[test]
    fn test_late_report_after_miss_is_ignored() {
        let mut controller = charging(5);
        finish_pass(&mut controller);
        controller
            .report_hit(1, Team::B, HitData::hit("Head", 3, 10.0))
            .unwrap();
        assert_eq!(controller.scores().b, 0);
        assert!(controller.round_record(1).unwrap().b.is_miss());
    }

    #[test]
    fn test_transition_starts_next_round() {
        let mut controller = charging(5);
        finish_pass(&mut controller);
        controller.advance_clock(1.9);
        assert_eq!(controller.current_round(), 1);
        controller.advance_clock(0.1);
        assert_eq!(controller.current_round(), 2);
        assert_eq!(controller.phase(), BoutPhase::CountdownActive);
        assert!(!controller.is_round_resolving());
        assert_eq!(controller.rounds().len(), 2);
    }

    // ---- Match end ----

    fn play_match(points: &[(i32, i32)]) -> BoutController {
        let mut controller = charging(points.len() as u32);
        for (i, (a, b)) in points.iter().enumerate() {
            let round = i as u32 + 1;
            if *a > 0 {
                controller
                    .report_hit(round, Team::A, HitData::hit("x", *a, 1.0))
                    .unwrap();
            }
            if *b > 0 {
                controller
                    .report_hit(round, Team::B, HitData::hit("x", *b, 1.0))
                    .unwrap();
            }
            finish_pass(&mut controller);
            controller.advance_clock(2.0);
            controller.advance_clock(3.0);
        }
        controller
    }

    fn match_end(controller: &mut BoutController) -> Option<Winner> {
        controller.drain_events().into_iter().find_map(|e| match e {
            BoutEvent::MatchEnd { winner, .. } => Some(winner),
            _ => None,
        })
    }

    #[test]
    fn test_match_end_winner_a() {
        let mut controller = play_match(&[(3, 1), (0, 2), (2, 0)]);
        assert_eq!(controller.phase(), BoutPhase::MatchComplete);
        assert!(controller.is_match_complete());
        assert_eq!(match_end(&mut controller), Some(Winner::A));
    }

    #[test]
    fn test_match_end_winner_b() {
        let mut controller = play_match(&[(1, 3), (0, 0)]);
        assert_eq!(match_end(&mut controller), Some(Winner::B));
    }

    #[test]
    fn test_match_end_tie() {
        let mut controller = play_match(&[(2, 0), (0, 2)]);
        assert_eq!(controller.scores().a, controller.scores().b);
        assert_eq!(match_end(&mut controller), Some(Winner::Tie));
    }

    #[test]
    fn test_miss_does_not_change_score() {
        let controller = play_match(&[(0, 0), (0, 0)]);
        assert_eq!(controller.scores().a, 0);
        assert_eq!(controller.scores().b, 0);
        assert!(controller.rounds().iter().all(|r| r.a.is_miss() && r.b.is_miss()));
    }

    #[test]
    fn test_start_round_after_completion_ends_match_again() {
        let mut controller = play_match(&[(1, 0)]);
        controller.drain_events();
        controller.start_round();
        assert_eq!(controller.current_round(), 1);
        assert_eq!(match_end(&mut controller), Some(Winner::A));
    }

    // ---- Reset ----

    #[test]
    fn test_reset_match_is_idempotent() {
        let mut controller = charging(5);
        controller
            .report_hit(1, Team::A, HitData::hit("Head", 3, 1.0))
            .unwrap();

        controller.reset_match();
        let first = (
            controller.phase(),
            controller.current_round(),
            controller.rounds().to_vec(),
            controller.scores(),
            controller.countdown(),
            controller.movement_enabled(),
            controller.pending_timers(),
        );
        controller.reset_match();
        let second = (
            controller.phase(),
            controller.current_round(),
            controller.rounds().to_vec(),
            controller.scores(),
            controller.countdown(),
            controller.movement_enabled(),
            controller.pending_timers(),
        );

        assert_eq!(first, second);
        assert_eq!(first.0, BoutPhase::Idle);
        assert_eq!(first.1, 0);
        assert!(first.2.is_empty());
        assert_eq!(first.6, 0);
    }

    #[test]
    fn test_reset_cancels_pending_transition() {
        let mut controller = charging(5);
        finish_pass(&mut controller);
        controller.reset_match();
        controller.advance_clock(10.0);
        assert_eq!(controller.current_round(), 0);
        assert_eq!(controller.phase(), BoutPhase::Idle);
    }

    #[test]
    fn test_dispose_clears_timers_and_listeners() {
        let mut controller = BoutController::new(settings(5));
        let _seen = recorder(&mut controller, EventKind::Countdown);
        controller.start_match();
        controller.dispose();
        assert_eq!(controller.pending_timers(), 0);
        assert_eq!(controller.listener_count(), 0);
    }

    // ---- Subscriptions ----

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut controller = BoutController::new(settings(5));
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            let _sub = controller.on(
                EventKind::RoundStart,
                Box::new(move |_| order.lock().unwrap().push(tag)),
            );
        }
        controller.start_match();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut controller = BoutController::new(settings(5));
        let seen = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&seen);
        let sub = controller.on(
            EventKind::Countdown,
            Box::new(move |_| *sink.lock().unwrap() += 1),
        );
        controller.start_match();
        assert_eq!(*seen.lock().unwrap(), 1);

        assert!(controller.unsubscribe(sub));
        controller.advance_clock(1.0);
        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(!controller.unsubscribe(sub));
    }

    #[test]
    fn test_named_subscription() {
        let mut controller = BoutController::new(settings(5));
        let seen = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&seen);
        let sub = controller.on_named(
            "roundStart",
            Box::new(move |_| *sink.lock().unwrap() += 1),
        );
        assert!(!sub.is_noop());
        controller.start_match();
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_unknown_event_name_is_noop() {
        let mut controller = BoutController::new(settings(5));
        let sub = controller.on_named("roundBegins", Box::new(|_| panic!("never called")));
        assert!(sub.is_noop());
        assert_eq!(controller.listener_count(), 0);
        controller.start_match();
        assert!(!controller.unsubscribe(sub));
    }
}

#[cfg(test)]
mod timer_tests {
    use crate::timers::{TimerKind, TimerQueue};

    #[test]
    fn test_once_timer_fires_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(TimerKind::RoundTransition, 2.0);
        timers.advance(1.0);
        assert!(timers.pop_due().is_none());
        timers.advance(1.0);
        assert_eq!(timers.pop_due(), Some((id, TimerKind::RoundTransition)));
        assert!(timers.pop_due().is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_timer_catches_up() {
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(TimerKind::Countdown, 1.0);
        timers.advance(3.0);
        let mut fired = 0;
        while timers.pop_due().is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(TimerKind::Countdown, 1.0);
        assert!(timers.cancel(id));
        assert!(!timers.is_pending(id));
        timers.advance(5.0);
        assert!(timers.pop_due().is_none());
        assert!(!timers.cancel(id));
    }
}

#[cfg(test)]
mod lance_tests {
    use glam::Vec3;

    use joust_core::enums::{Facing, Team};
    use joust_core::regions::{HitRegion, HitRegionSet};

    use crate::geometry::{nearest_region_hit, Ray};
    use crate::lance::{score_hit, Lance};
    use crate::skeleton::{KnightPose, SkeletonProvider, StandardRig};

    fn opponent_regions() -> HitRegionSet {
        let rig = StandardRig::new();
        let pose = KnightPose {
            team: Team::B,
            position: Vec3::new(0.0, 2.0, 2.0),
            facing: Facing::Right,
        };
        let mut regions = HitRegionSet::default();
        regions.populate(rig.regions());
        for region in regions.iter_mut() {
            region.world_position = rig.region_position(&pose, &region.name).unwrap();
        }
        regions
    }

    fn lance_aimed_at(regions: &HitRegionSet, name: &str) -> Lance {
        let mut lance = Lance::new(2.5);
        let target = regions.get_region(name).unwrap().world_position;
        // Approach from the front so no other region sits on the line.
        lance.origin = target + Vec3::X * 1.5;
        lance.set_aim(target - lance.origin);
        lance
    }

    #[test]
    fn test_hit_classification() {
        let regions = opponent_regions();
        for (name, points) in [("Head", 3), ("Spine", 2), ("LegR", 1)] {
            let lance = lance_aimed_at(&regions, name);
            let (region, _) = lance.cast(&regions).unwrap();
            assert_eq!(region.name, name);
            let data = score_hit(region, 12.5);
            assert_eq!(data.points_earned, points, "{name}");
            assert_eq!(data.speed_on_contact, 12.5);
        }
    }

    #[test]
    fn test_nearest_region_wins() {
        let regions = HitRegionSet::new(vec![
            HitRegion::new("Spine").at(Vec3::new(0.0, 0.0, 2.0)),
            HitRegion::new("Head").at(Vec3::new(0.0, 0.0, 1.0)),
        ]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        let (region, distance) = nearest_region_hit(&ray, 2.5, &regions).unwrap();
        assert_eq!(region.name, "Head");
        assert!((distance - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_hit_beyond_range_ignored() {
        let regions = HitRegionSet::new(vec![HitRegion::new("Head").at(Vec3::new(0.0, 0.0, 3.0))]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        assert!(nearest_region_hit(&ray, 2.5, &regions).is_none());
        assert!(nearest_region_hit(&ray, 3.0, &regions).is_some());
    }

    #[test]
    fn test_region_behind_ray_ignored() {
        let regions = HitRegionSet::new(vec![HitRegion::new("Head").at(Vec3::new(0.0, 0.0, -1.0))]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        assert!(nearest_region_hit(&ray, 2.5, &regions).is_none());
    }

    #[test]
    fn test_unaimed_lance_casts_nothing() {
        let regions = opponent_regions();
        let mut lance = Lance::new(2.5);
        lance.origin = regions.get_region("Head").unwrap().world_position;
        assert!(!lance.is_aimed());
        assert!(lance.cast(&regions).is_none());
    }

    #[test]
    fn test_lance_speed_from_origin_motion() {
        let mut lance = Lance::new(2.5);
        lance.refresh_origin(Vec3::ZERO, Facing::Left, 0.1, 2.237);
        assert_eq!(lance.speed, 0.0);
        lance.refresh_origin(Vec3::new(-0.8, 0.0, 0.0), Facing::Left, 0.1, 2.237);
        assert!((lance.speed - 8.0 * 2.237).abs() < 1e-3);
    }

    #[test]
    fn test_lance_reset_clears_round_state() {
        let mut lance = Lance::new(2.5);
        lance.has_scored_this_round = true;
        lance.set_aim(Vec3::X);
        lance.refresh_origin(Vec3::ZERO, Facing::Left, 0.1, 2.237);
        lance.refresh_origin(Vec3::X, Facing::Left, 0.1, 2.237);

        lance.reset_round_state();
        assert!(!lance.has_scored_this_round);
        assert!(!lance.is_aimed());
        assert_eq!(lance.speed, 0.0);
    }
}

#[cfg(test)]
mod world_tests {
    use glam::Vec3;
    use hecs::World;

    use joust_core::config::MatchConfig;
    use joust_core::enums::{Facing, Team};
    use joust_core::regions::HitRegionSet;

    use crate::bout::{BoutController, BoutSettings};
    use crate::knight::{Knight, KnightMotion};
    use crate::lance::Lance;
    use crate::skeleton::StandardRig;
    use crate::systems;
    use crate::world_setup;

    fn charging_controller() -> BoutController {
        let mut controller = BoutController::new(BoutSettings {
            countdown_start: 0,
            ..BoutSettings::default()
        });
        controller.start_match();
        controller
    }

    fn region_position(world: &World, entity: hecs::Entity, name: &str) -> Vec3 {
        world
            .get::<&HitRegionSet>(entity)
            .unwrap()
            .get_region(name)
            .unwrap()
            .world_position
    }

    fn aim_lance(world: &World, entity: hecs::Entity, origin: Vec3, target: Vec3) {
        let mut lance = world.get::<&mut Lance>(entity).unwrap();
        lance.origin = origin;
        lance.set_aim(target - origin);
    }

    #[test]
    fn test_knight_cannot_hit_itself() {
        let config = MatchConfig::default();
        let mut world = World::new();
        let knights = world_setup::spawn_knights(&mut world, &config);
        let rig = StandardRig::new();
        systems::skeleton::run(&mut world, &rig);
        let mut controller = charging_controller();

        let a = knights[Team::A.index()];
        let own_head = region_position(&world, a, "Head");
        aim_lance(&world, a, own_head + Vec3::new(0.0, 0.0, 1.0), own_head);

        systems::lance::resolve_hits(&mut world, &knights, &mut controller);
        assert!(!controller.round_record(1).unwrap().a.is_recorded());
        assert!(!world.get::<&Knight>(a).unwrap().has_scored_this_round);
    }

    #[test]
    fn test_lance_scores_once_per_round() {
        let config = MatchConfig::default();
        let mut world = World::new();
        let knights = world_setup::spawn_knights(&mut world, &config);
        let rig = StandardRig::new();
        systems::skeleton::run(&mut world, &rig);
        let mut controller = charging_controller();

        let a = knights[Team::A.index()];
        let b = knights[Team::B.index()];
        let head = region_position(&world, b, "Head");
        aim_lance(&world, a, head + Vec3::new(0.0, 0.0, -1.0), head);

        for _ in 0..3 {
            systems::lance::resolve_hits(&mut world, &knights, &mut controller);
        }

        assert_eq!(controller.scores().a, 3);
        let record = controller.round_record(1).unwrap();
        assert_eq!(record.a.region_hit.as_deref(), Some("Head"));
        assert!(world.get::<&Lance>(a).unwrap().has_scored_this_round);
        assert!(world.get::<&Knight>(a).unwrap().has_scored_this_round);
    }

    #[test]
    fn test_register_hit_guard() {
        let mut controller = charging_controller();
        let mut knight = Knight::new(Team::B, false);
        assert!(knight.register_hit(
            joust_core::types::HitData::hit("Spine", 2, 5.0),
            &mut controller
        ));
        assert!(!knight.register_hit(
            joust_core::types::HitData::hit("Head", 3, 5.0),
            &mut controller
        ));
        assert_eq!(controller.scores().b, 2);

        knight.reset_round_state();
        assert!(!knight.has_scored_this_round);
    }

    #[test]
    fn test_rejected_hit_does_not_latch() {
        // No round has started, so the report is rejected.
        let mut controller = BoutController::new(BoutSettings::default());
        let mut knight = Knight::new(Team::A, true);
        assert!(!knight.register_hit(
            joust_core::types::HitData::hit("Head", 3, 5.0),
            &mut controller
        ));
        assert!(!knight.has_scored_this_round);
        assert_eq!(controller.scores().a, 0);

        controller.start_match();
        assert!(knight.register_hit(
            joust_core::types::HitData::hit("Head", 3, 5.0),
            &mut controller
        ));
        assert!(knight.has_scored_this_round);
        assert_eq!(controller.scores().a, 3);
    }

    #[test]
    fn test_swap_ends() {
        let config = MatchConfig::default();
        let mut world = World::new();
        let knights = world_setup::spawn_knights(&mut world, &config);

        world_setup::swap_ends(&mut world, &knights);

        let a = (*world.get::<&KnightMotion>(knights[0]).unwrap()).clone();
        let b = (*world.get::<&KnightMotion>(knights[1]).unwrap()).clone();
        assert_eq!(a.start_x, -config.start_x);
        assert_eq!(a.lane_z, config.lane_z[1]);
        assert_eq!(a.facing, Facing::Right);
        assert_eq!(b.start_x, config.start_x);
        assert_eq!(b.facing, Facing::Left);
        assert_eq!(a.position.x, a.start_x);
    }

    #[test]
    fn test_unloaded_knight_has_no_regions() {
        let config = MatchConfig::default();
        let mut world = World::new();
        let knights = world_setup::spawn_knights(&mut world, &config);
        let rig = StandardRig::new().with_unloaded(Team::B);
        systems::skeleton::run(&mut world, &rig);

        let b = knights[Team::B.index()];
        assert!(!world.get::<&HitRegionSet>(b).unwrap().is_populated());
        assert!(world
            .get::<&crate::skeleton::Skeleton>(b)
            .unwrap()
            .hand_anchor
            .is_none());
        assert!(world
            .get::<&HitRegionSet>(knights[Team::A.index()])
            .unwrap()
            .is_populated());
    }
}

#[cfg(test)]
mod engine_tests {
    use joust_core::commands::PlayerCommand;
    use joust_core::config::MatchConfig;
    use joust_core::enums::{BoutPhase, Team};
    use joust_core::events::BoutEvent;
    use joust_core::state::MatchSnapshot;

    use crate::engine::MatchEngine;
    use crate::knight::{Knight, KnightMotion};
    use crate::lance::Lance;
    use crate::skeleton::StandardRig;

    const MAX_TICKS: usize = 20_000;

    fn autopilot(seed: u64) -> MatchConfig {
        MatchConfig {
            seed,
            autopilot: true,
            ..MatchConfig::default()
        }
    }

    fn run_to_completion(engine: &mut MatchEngine) -> Vec<BoutEvent> {
        let mut events = Vec::new();
        engine.queue_command(PlayerCommand::StartMatch);
        for _ in 0..MAX_TICKS {
            let snap = engine.tick();
            events.extend(snap.events);
            if engine.phase() == BoutPhase::MatchComplete {
                return events;
            }
        }
        panic!("match did not complete within {MAX_TICKS} ticks");
    }

    fn tick_n(engine: &mut MatchEngine, n: usize) -> MatchSnapshot {
        let mut snap = engine.tick();
        for _ in 1..n {
            snap = engine.tick();
        }
        snap
    }

    #[test]
    fn test_idle_engine_does_nothing() {
        let mut engine = MatchEngine::new(MatchConfig::default());
        let snap = tick_n(&mut engine, 120);
        assert_eq!(snap.phase, BoutPhase::Idle);
        assert_eq!(snap.round, 0);
        assert_eq!(snap.knights.len(), 2);
        assert_eq!(snap.knights[0].position.x, MatchConfig::default().start_x);
    }

    #[test]
    fn test_autopilot_match_completes() {
        let mut engine = MatchEngine::new(autopilot(42));
        let events = run_to_completion(&mut engine);

        let controller = engine.controller();
        assert_eq!(controller.rounds().len(), 5);
        assert!(controller.rounds().iter().all(|r| r.is_resolved()));

        let mut expected = [0, 0];
        for record in controller.rounds() {
            for team in Team::ALL {
                expected[team.index()] += record.result(team).points_earned.max(0);
            }
        }
        assert_eq!(controller.scores().a, expected[0]);
        assert_eq!(controller.scores().b, expected[1]);

        let ends: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BoutEvent::MatchEnd { .. }))
            .collect();
        assert_eq!(ends.len(), 1);
        let completed = events
            .iter()
            .filter(|e| matches!(e, BoutEvent::RoundCompleted { .. }))
            .count();
        assert_eq!(completed, 5);
    }

    #[test]
    fn test_autopilot_lances_score() {
        let mut engine = MatchEngine::new(autopilot(42));
        let events = run_to_completion(&mut engine);

        let controller = engine.controller();
        let scoring_rounds = controller
            .rounds()
            .iter()
            .filter(|r| Team::ALL.iter().any(|t| r.result(*t).points_earned > 0))
            .count();
        assert!(scoring_rounds > 0, "no lance ever landed: {:?}", controller.rounds());
        assert!(controller.scores().a + controller.scores().b > 0);

        let points: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BoutEvent::PointsChanged { .. }))
            .collect();
        assert!(!points.is_empty());
        assert!(events.iter().any(|e| matches!(
            e,
            BoutEvent::RoundDataChanged { result, .. } if result.points_earned > 0
        )));
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut first = MatchEngine::new(autopilot(7));
        let mut second = MatchEngine::new(autopilot(7));
        run_to_completion(&mut first);
        run_to_completion(&mut second);

        assert_eq!(first.controller().rounds(), second.controller().rounds());
        assert_eq!(first.controller().scores(), second.controller().scores());
        assert_eq!(first.time(), second.time());
    }

    #[test]
    fn test_positions_swap_between_rounds() {
        let mut engine = MatchEngine::new(autopilot(3));
        engine.queue_command(PlayerCommand::StartMatch);
        for _ in 0..MAX_TICKS {
            engine.tick();
            if engine.controller().current_round() == 2 {
                break;
            }
        }
        assert_eq!(engine.controller().current_round(), 2);

        let start_x = engine.config().start_x;
        let a = engine.knight(Team::A);
        let motion = (*engine.world().get::<&KnightMotion>(a).unwrap()).clone();
        assert_eq!(motion.start_x, -start_x);
        assert_eq!(motion.position.x, -start_x);
        assert_eq!(motion.facing, joust_core::enums::Facing::Right);
    }

    #[test]
    fn test_pause_freezes_countdown() {
        let mut engine = MatchEngine::new(MatchConfig::default());
        engine.queue_command(PlayerCommand::StartMatch);
        tick_n(&mut engine, 30);

        engine.queue_command(PlayerCommand::Pause);
        let before = engine.tick();
        let paused = tick_n(&mut engine, 600);
        assert!(paused.paused);
        assert_eq!(paused.countdown, before.countdown);
        assert_eq!(paused.time, before.time);

        engine.queue_command(PlayerCommand::Resume);
        let resumed = tick_n(&mut engine, 200);
        assert!(!resumed.paused);
        assert!(resumed.movement_enabled);
    }

    #[test]
    fn test_knights_hold_during_countdown() {
        let mut engine = MatchEngine::new(MatchConfig::default());
        engine.queue_command(PlayerCommand::StartMatch);
        let snap = tick_n(&mut engine, 120);
        assert_eq!(snap.phase, BoutPhase::CountdownActive);
        assert_eq!(snap.knights[0].position.x, engine.config().start_x);
    }

    #[test]
    fn test_slow_motion_near_pass() {
        let mut engine = MatchEngine::new(autopilot(5));
        engine.queue_command(PlayerCommand::StartMatch);
        let mut slowest = 1.0f32;
        for _ in 0..600 {
            let snap = engine.tick();
            slowest = slowest.min(snap.time_scale);
            if snap.rounds.first().is_some_and(|r| r.is_resolved()) {
                break;
            }
        }
        assert!(slowest < 0.9, "time scale never dropped: {slowest}");
    }

    #[test]
    fn test_player_without_pointer_misses() {
        let mut engine = MatchEngine::new(MatchConfig::default());
        engine.queue_command(PlayerCommand::StartMatch);
        for _ in 0..MAX_TICKS {
            engine.tick();
            if engine.controller().round_record(1).is_some_and(|r| r.is_resolved()) {
                break;
            }
        }
        let record = engine.controller().round_record(1).unwrap();
        assert!(record.a.is_miss(), "player never aimed");
    }

    #[test]
    fn test_unloaded_opponent_is_inert() {
        let config = autopilot(11);
        let rig = StandardRig::new().with_unloaded(Team::B);
        let mut engine = MatchEngine::with_skeleton(config, Box::new(rig));
        engine.queue_command(PlayerCommand::StartMatch);

        for _ in 0..MAX_TICKS {
            let snap = engine.tick();
            assert!(!snap.knights[Team::B.index()].ready);
            if engine.controller().round_record(1).is_some_and(|r| r.is_resolved()) {
                break;
            }
        }
        let record = engine.controller().round_record(1).unwrap();
        // B's lance never operates and A has nothing to hit.
        assert!(record.a.is_miss());
        assert!(record.b.is_miss());

        engine.set_skeleton(Box::new(StandardRig::new()));
        let snap = engine.tick();
        assert!(snap.knights[Team::B.index()].ready);
    }

    #[test]
    fn test_reset_match_restores_knights() {
        let mut engine = MatchEngine::new(autopilot(9));
        engine.queue_command(PlayerCommand::StartMatch);
        tick_n(&mut engine, 260);
        assert_eq!(engine.phase(), BoutPhase::MovementActive);

        let a = engine.knight(Team::A);
        engine.world_mut().get::<&mut Lance>(a).unwrap().has_scored_this_round = true;
        engine.world_mut().get::<&mut Knight>(a).unwrap().has_scored_this_round = true;

        engine.reset_match();
        engine.reset_match();

        assert_eq!(engine.phase(), BoutPhase::Idle);
        assert_eq!(engine.controller().current_round(), 0);
        assert_eq!(engine.controller().pending_timers(), 0);
        assert!(!engine.world().get::<&Lance>(a).unwrap().has_scored_this_round);
        assert!(!engine.world().get::<&Knight>(a).unwrap().has_scored_this_round);
        let motion = (*engine.world().get::<&KnightMotion>(a).unwrap()).clone();
        assert_eq!(motion.position.x, engine.config().start_x);

        let snap = tick_n(&mut engine, 300);
        assert_eq!(snap.round, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = MatchEngine::new(MatchConfig::default());
        engine.queue_command(PlayerCommand::StartMatch);
        let snap = engine.tick();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"RoundStart\""));
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use joust_core::enums::{RegionTier, Team};
    use joust_core::events::{BoutEvent, EventKind};
    use joust_core::regions::STANDARD_REGIONS;
    use joust_core::types::HitData;

    use crate::bout::{BoutController, BoutSettings};
    use crate::knight::Knight;

    fn charging() -> BoutController {
        let mut controller = BoutController::new(BoutSettings::default());
        controller.start_match();
        controller.advance_clock(3.0);
        controller.drain_events();
        controller
    }

    #[derive(Debug, Clone)]
    enum Progress {
        Reach(bool),
        Walk(bool, f32),
    }

    fn team(is_a: bool) -> Team {
        if is_a {
            Team::A
        } else {
            Team::B
        }
    }

    fn progress_op() -> impl Strategy<Value = Progress> {
        prop_oneof![
            any::<bool>().prop_map(Progress::Reach),
            (any::<bool>(), 0.0f32..5.0).prop_map(|(a, d)| Progress::Walk(a, d)),
        ]
    }

    proptest! {
        #[test]
        fn prop_at_most_one_score_per_knight(hits in prop::collection::vec((any::<bool>(), 0usize..9), 1..30)) {
            let mut controller = charging();
            let mut knights = [Knight::new(Team::A, true), Knight::new(Team::B, false)];
            let mut first = [None, None];

            for (is_a, region) in hits {
                let name = STANDARD_REGIONS[region];
                let points = RegionTier::classify(name).points();
                let side = team(is_a).index();
                first[side].get_or_insert(points);
                knights[side].register_hit(HitData::hit(name, points, 10.0), &mut controller);
            }

            let events = controller.drain_events();
            for t in Team::ALL {
                let points_events = events
                    .iter()
                    .filter(|e| e.kind() == EventKind::PointsChanged)
                    .filter(|e| matches!(e, BoutEvent::PointsChanged { team, .. } if *team == t))
                    .count();
                prop_assert!(points_events <= 1);
                prop_assert_eq!(controller.scores().get(t), first[t.index()].unwrap_or(0));
            }
        }

        #[test]
        fn prop_round_completes_once_when_both_walked_out(ops in prop::collection::vec(progress_op(), 0..40)) {
            let mut controller = charging();
            let mut reached = [false; 2];
            let mut walked = [0.0f32; 2];
            let mut expect_complete = false;

            for op in ops {
                match op {
                    Progress::Reach(is_a) => {
                        reached[team(is_a).index()] = true;
                        controller.mark_reached_far_end(team(is_a));
                    }
                    Progress::Walk(is_a, distance) => {
                        walked[team(is_a).index()] = distance;
                        controller.update_walked_distance(team(is_a), distance);
                    }
                }
                if reached.iter().all(|r| *r) && walked.iter().all(|w| *w >= 3.0) {
                    expect_complete = true;
                }
            }

            let completed = controller
                .drain_events()
                .iter()
                .filter(|e| e.kind() == EventKind::RoundCompleted)
                .count();
            prop_assert_eq!(completed, usize::from(expect_complete));
        }
    }
}
