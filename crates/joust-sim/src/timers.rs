//! Simulation-clock timers.
//!
//! Timers are driven by `advance`, never by wall time, so a paused engine
//! freezes them and tests can step them deterministically.

/// What a timer fires for. The controller dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    RoundTransition,
}

/// Handle used to cancel a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    /// Clock time of the next firing.
    due: f64,
    /// Re-arm interval for repeating timers.
    interval: Option<f64>,
}

/// Ordered set of pending timers.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn schedule_once(&mut self, kind: TimerKind, delay: f64) -> TimerId {
        self.schedule(kind, delay, None)
    }

    pub fn schedule_repeating(&mut self, kind: TimerKind, interval: f64) -> TimerId {
        self.schedule(kind, interval, Some(interval))
    }

    fn schedule(&mut self, kind: TimerKind, delay: f64, interval: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            due: self.now + delay.max(0.0),
            interval,
        });
        id
    }

    /// Returns whether a pending timer was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Move the clock forward. Due timers are collected with [`Self::pop_due`].
    pub fn advance(&mut self, dt: f64) {
        self.now += dt;
    }

    /// Take the earliest timer that is due, re-arming it if it repeats.
    ///
    /// Call in a loop after [`Self::advance`]; handlers may cancel or
    /// schedule timers between calls.
    pub fn pop_due(&mut self) -> Option<(TimerId, TimerKind)> {
        // Small epsilon so accumulated frame steps land on whole intervals.
        let horizon = self.now + 1e-9;
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= horizon)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0)))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[index];
        let fired = (timer.id, timer.kind);
        match timer.interval {
            Some(interval) => timer.due += interval,
            None => {
                self.timers.remove(index);
            }
        }
        Some(fired)
    }
}
