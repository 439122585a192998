//! Bout controller: the authoritative round lifecycle.
//!
//! Owns round numbering, the countdown, per-round results, running scores,
//! round completion and match end. Knights and lances report into it; it
//! never reaches back into the world. Everything it announces goes to the
//! event bus synchronously and is also queued for the engine to drain.

use joust_core::config::MatchConfig;
use joust_core::enums::{BoutPhase, Team, Winner};
use joust_core::error::BoutError;
use joust_core::events::{BoutEvent, EventKind};
use joust_core::types::{HitData, RoundRecord, RoundResult, Scores};

use crate::event_bus::{EventBus, Listener, Subscription};
use crate::timers::{TimerId, TimerKind, TimerQueue};

/// Timing and limits the controller needs from the match config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoutSettings {
    pub max_rounds: u32,
    pub countdown_start: u32,
    pub countdown_interval_secs: f64,
    pub transition_delay_secs: f64,
    pub walk_out_distance: f32,
}

impl From<&MatchConfig> for BoutSettings {
    fn from(config: &MatchConfig) -> Self {
        Self {
            max_rounds: config.max_rounds,
            countdown_start: config.countdown_start,
            countdown_interval_secs: config.countdown_interval_secs,
            transition_delay_secs: config.transition_delay_secs,
            walk_out_distance: config.walk_out_distance,
        }
    }
}

impl Default for BoutSettings {
    fn default() -> Self {
        Self::from(&MatchConfig::default())
    }
}

/// Per-team progress toward round completion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RoundProgress {
    reached_far_end: bool,
    walked_distance: f32,
}

pub struct BoutController {
    settings: BoutSettings,
    phase: BoutPhase,
    /// Current 1-based round, 0 before the first round.
    round: u32,
    rounds: Vec<RoundRecord>,
    scores: Scores,
    countdown: Option<u32>,
    movement_enabled: bool,
    /// Set once the current round starts resolving; cleared by the next round.
    round_resolving: bool,
    progress: [RoundProgress; 2],
    timers: TimerQueue,
    countdown_timer: Option<TimerId>,
    transition_timer: Option<TimerId>,
    bus: EventBus,
    outbox: Vec<BoutEvent>,
}

impl BoutController {
    pub fn new(settings: BoutSettings) -> Self {
        Self {
            settings,
            phase: BoutPhase::Idle,
            round: 0,
            rounds: Vec::new(),
            scores: Scores::default(),
            countdown: None,
            movement_enabled: false,
            round_resolving: false,
            progress: [RoundProgress::default(); 2],
            timers: TimerQueue::new(),
            countdown_timer: None,
            transition_timer: None,
            bus: EventBus::new(),
            outbox: Vec::new(),
        }
    }

    // ---- Subscriptions ----

    pub fn on(&mut self, kind: EventKind, listener: Listener) -> Subscription {
        self.bus.on(kind, listener)
    }

    /// Subscribe by wire name (`"roundStart"`, `"matchEnd"`, ...).
    pub fn on_named(&mut self, name: &str, listener: Listener) -> Subscription {
        self.bus.on_named(name, listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.bus.unsubscribe(subscription)
    }

    // ---- Lifecycle ----

    /// Clear all match state and begin round 1.
    pub fn start_match(&mut self) {
        self.clear_match_state();
        tracing::info!(max_rounds = self.settings.max_rounds, "match started");
        self.start_round();
    }

    /// Begin the next round, or end the match if the final round has resolved.
    pub fn start_round(&mut self) {
        self.cancel_transition_timer();

        if self.is_match_complete() {
            self.end_match();
            return;
        }
        if self.round >= self.settings.max_rounds {
            tracing::warn!(
                round = self.round,
                "final round still in progress, not starting another"
            );
            return;
        }

        self.cancel_countdown_timer();
        self.round += 1;
        self.rounds.push(RoundRecord::new(self.round));
        self.progress = [RoundProgress::default(); 2];
        self.round_resolving = false;
        self.movement_enabled = false;
        self.countdown = Some(self.settings.countdown_start);

        tracing::info!(round = self.round, "round started");
        self.emit(BoutEvent::RoundStart { round: self.round });
        self.set_phase(BoutPhase::CountdownActive);
        self.emit(BoutEvent::Countdown {
            round: self.round,
            remaining: self.settings.countdown_start,
        });

        if self.settings.countdown_start == 0 {
            self.finish_countdown();
        } else {
            self.countdown_timer = Some(self.timers.schedule_repeating(
                TimerKind::Countdown,
                self.settings.countdown_interval_secs,
            ));
        }
    }

    fn countdown_tick(&mut self) {
        let remaining = self.countdown.unwrap_or(0).saturating_sub(1);
        self.countdown = Some(remaining);
        tracing::debug!(round = self.round, remaining, "countdown");
        self.emit(BoutEvent::Countdown {
            round: self.round,
            remaining,
        });
        if remaining == 0 {
            self.finish_countdown();
        }
    }

    fn finish_countdown(&mut self) {
        self.cancel_countdown_timer();
        self.countdown = None;
        self.movement_enabled = true;
        self.set_phase(BoutPhase::MovementActive);
    }

    fn end_match(&mut self) {
        self.movement_enabled = false;
        self.set_phase(BoutPhase::MatchComplete);
        let winner = self.winner();
        tracing::info!(a = self.scores.a, b = self.scores.b, %winner, "match ended");
        self.emit(BoutEvent::MatchEnd {
            scores: self.scores,
            winner,
        });
    }

    /// Record a team's result for a round.
    ///
    /// Only the first report with a non-zero score is kept; later reports
    /// still announce a data change with the stored result. Positive points
    /// are added to the running total.
    pub fn report_hit(&mut self, round: u32, team: Team, data: HitData) -> Result<(), BoutError> {
        if round > self.settings.max_rounds {
            return Err(BoutError::RoundOutOfRange {
                round,
                max: self.settings.max_rounds,
            });
        }
        let current = self.round;
        let record = round
            .checked_sub(1)
            .and_then(|i| self.rounds.get_mut(i as usize))
            .ok_or(BoutError::UnknownRound { round, current })?;

        let result = record.result_mut(team);
        let added = if result.is_recorded() {
            tracing::warn!(round, %team, "result already recorded, ignoring report");
            None
        } else {
            *result = data;
            Some(result.points_earned)
        };
        let stored = result.clone();

        self.emit(BoutEvent::RoundDataChanged {
            round,
            team,
            result: stored,
        });
        if let Some(points) = added.filter(|p| *p > 0) {
            self.scores.add(team, points);
            tracing::info!(round, %team, points, "points scored");
            self.emit(BoutEvent::PointsChanged {
                team,
                points,
                scores: self.scores,
            });
        }
        Ok(())
    }

    /// A knight reached the opposite end of the lists.
    pub fn mark_reached_far_end(&mut self, team: Team) {
        if self.phase != BoutPhase::MovementActive {
            return;
        }
        self.progress[team.index()].reached_far_end = true;
        self.check_round_complete();
    }

    /// Distance a knight has walked since reaching the far end.
    pub fn update_walked_distance(&mut self, team: Team, distance: f32) {
        if self.phase != BoutPhase::MovementActive {
            return;
        }
        self.progress[team.index()].walked_distance = distance;
        self.check_round_complete();
    }

    fn check_round_complete(&mut self) {
        if self.round_resolving {
            return;
        }
        let walk_out = self.settings.walk_out_distance;
        let done = self
            .progress
            .iter()
            .all(|p| p.reached_far_end && p.walked_distance >= walk_out);
        if done {
            self.complete_round();
        }
    }

    fn complete_round(&mut self) {
        self.round_resolving = true;
        self.movement_enabled = false;
        self.set_phase(BoutPhase::RoundResolving);

        let round = self.round;
        for team in Team::ALL {
            let Some(record) = self.rounds.last_mut() else {
                break;
            };
            let result = record.result_mut(team);
            if !result.is_recorded() {
                *result = RoundResult::miss();
                self.emit(BoutEvent::RoundDataChanged {
                    round,
                    team,
                    result: RoundResult::miss(),
                });
            }
        }

        if let Some(record) = self.rounds.last().cloned() {
            tracing::info!(
                round,
                a = record.a.points_earned,
                b = record.b.points_earned,
                "round completed"
            );
            self.emit(BoutEvent::RoundCompleted { record });
        }
        self.emit(BoutEvent::PositionsReset { round });
        self.set_phase(BoutPhase::TransitionDelay);
        self.transition_timer = Some(self.timers.schedule_once(
            TimerKind::RoundTransition,
            self.settings.transition_delay_secs,
        ));
    }

    /// Cancel timers and clear rounds and scores. Safe to call repeatedly.
    pub fn reset_match(&mut self) {
        self.clear_match_state();
        tracing::info!("match reset");
        self.emit(BoutEvent::MatchReset);
    }

    fn clear_match_state(&mut self) {
        self.timers.clear();
        self.countdown_timer = None;
        self.transition_timer = None;
        self.rounds.clear();
        self.scores = Scores::default();
        self.round = 0;
        self.countdown = None;
        self.movement_enabled = false;
        self.round_resolving = false;
        self.progress = [RoundProgress::default(); 2];
        self.set_phase(BoutPhase::Idle);
    }

    /// Cancel timers and drop all listeners.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.countdown_timer = None;
        self.transition_timer = None;
        self.bus.clear();
    }

    // ---- Clock ----

    /// Advance the timer clock and fire whatever came due.
    pub fn advance_clock(&mut self, dt: f64) {
        self.timers.advance(dt);
        while let Some((id, kind)) = self.timers.pop_due() {
            match kind {
                TimerKind::Countdown if self.countdown_timer == Some(id) => self.countdown_tick(),
                TimerKind::RoundTransition if self.transition_timer == Some(id) => {
                    self.transition_timer = None;
                    self.start_round();
                }
                _ => {
                    self.timers.cancel(id);
                }
            }
        }
    }

    fn cancel_countdown_timer(&mut self) {
        if let Some(id) = self.countdown_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_transition_timer(&mut self) {
        if let Some(id) = self.transition_timer.take() {
            self.timers.cancel(id);
        }
    }

    // ---- Emission ----

    fn set_phase(&mut self, to: BoutPhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        tracing::debug!(?from, ?to, "phase changed");
        self.emit(BoutEvent::StateChange {
            from,
            to,
            movement_enabled: self.movement_enabled,
        });
    }

    fn emit(&mut self, event: BoutEvent) {
        self.bus.emit(&event);
        self.outbox.push(event);
    }

    /// Take every event emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<BoutEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ---- Queries ----

    pub fn phase(&self) -> BoutPhase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.settings.max_rounds
    }

    pub fn settings(&self) -> &BoutSettings {
        &self.settings
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn round_record(&self, round: u32) -> Option<&RoundRecord> {
        round
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn is_round_resolving(&self) -> bool {
        self.round_resolving
    }

    /// The final round has been played and resolved.
    pub fn is_match_complete(&self) -> bool {
        self.round >= self.settings.max_rounds
            && self.rounds.last().is_some_and(RoundRecord::is_resolved)
    }

    pub fn winner(&self) -> Winner {
        self.scores.winner()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}
