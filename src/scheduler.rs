//! Two cancellable periodic drivers sharing one host clock.
//!
//! The host never sleeps on our behalf: it reports the current instant and
//! the scheduler hands back every firing that has come due since the last
//! poll, oldest first.

use std::time::Duration;

// Periods below this are raised to it so a driver always moves forward in time.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    Tick,
    Clock,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Firing {
    pub task: Task,
    /// Instant the firing was due, not the instant it was polled.
    pub at: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Periodic {
    period: Duration,
    next_due: Duration,
}

impl Periodic {
    fn starting_at(now: Duration, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        Self { period, next_due: now + period }
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tick: Option<Periodic>,
    clock: Option<Periodic>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts both drivers, replacing any that were running.
    pub fn start(&mut self, now: Duration, tick_period: Duration, clock_period: Duration) {
        self.tick = Some(Periodic::starting_at(now, tick_period));
        self.clock = Some(Periodic::starting_at(now, clock_period));
    }

    pub fn stop(&mut self) {
        self.tick = None;
        self.clock = None;
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn tick_period(&self) -> Option<Duration> {
        self.tick.map(|t| t.period)
    }

    /// Restarts the tick driver's phase from `at` with a new period. No-op when stopped.
    pub fn set_tick_period(&mut self, at: Duration, period: Duration) {
        if let Some(tick) = self.tick.as_mut() {
            *tick = Periodic::starting_at(at, period);
        }
    }

    /// Pops the earliest firing due at or before `now`. Ties go to the tick driver.
    pub fn poll(&mut self, now: Duration) -> Option<Firing> {
        let tick_due = self.tick.map(|t| t.next_due).filter(|due| *due <= now);
        let clock_due = self.clock.map(|c| c.next_due).filter(|due| *due <= now);

        let (task, slot) = match (tick_due, clock_due) {
            (Some(t), Some(c)) if c < t => (Task::Clock, &mut self.clock),
            (Some(_), _) => (Task::Tick, &mut self.tick),
            (None, Some(_)) => (Task::Clock, &mut self.clock),
            (None, None) => return None,
        };
        let driver = slot.as_mut()?;
        let at = driver.next_due;
        driver.next_due += driver.period;
        Some(Firing { task, at })
    }
}
