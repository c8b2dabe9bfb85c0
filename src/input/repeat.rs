//! Repeat-while-condition timer
//!
//! Turns "a key is held" into "something happens every period". The
//! primitive owns at most one interval handle; starting while one is active
//! is a no-op, so a burst of key events can never stack timers.

use std::collections::BTreeSet;
use std::time::Duration;

/// Host interval timer
pub trait IntervalTimer {
    type Handle;

    /// Start firing every `period`. `None` if the host refused.
    fn start(&mut self, period: Duration) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
pub struct RepeatWhile<H> {
    period: Duration,
    handle: Option<H>,
}

impl<H> RepeatWhile<H> {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Match the timer to the condition: start it when the condition holds
    /// and nothing runs, cancel it when the condition no longer holds.
    pub fn sync<T>(&mut self, timer: &mut T, condition: bool)
    where
        T: IntervalTimer<Handle = H>,
    {
        match (condition, self.handle.take()) {
            (true, None) => {
                self.handle = timer.start(self.period);
                if self.handle.is_none() {
                    log::warn!("Repeat timer could not be started");
                }
            }
            (false, Some(handle)) => timer.cancel(handle),
            (_, handle) => self.handle = handle,
        }
    }

    /// Run `check` for a timer tick; ticks after cancellation are ignored
    pub fn fire<R>(&self, check: impl FnOnce() -> R) -> Option<R> {
        self.is_active().then(check)
    }
}

/// Headless timer driven by [`ManualTimer::elapse`]
#[derive(Debug, Default)]
pub struct ManualTimer {
    active: BTreeSet<u32>,
    period: Duration,
    elapsed: Duration,
    next_id: u32,
    started: u32,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intervals currently running
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Intervals ever started
    pub fn started(&self) -> u32 {
        self.started
    }

    /// Advance time; returns the number of ticks that came due
    pub fn elapse(&mut self, dt: Duration) -> u32 {
        if self.active.is_empty() || self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            ticks += 1;
        }
        ticks
    }
}

impl IntervalTimer for ManualTimer {
    type Handle = u32;

    fn start(&mut self, period: Duration) -> Option<u32> {
        let id = self.next_id;
        self.next_id += 1;
        self.started += 1;
        self.active.insert(id);
        self.period = period;
        self.elapsed = Duration::ZERO;
        Some(id)
    }

    fn cancel(&mut self, handle: u32) {
        self.active.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(50);

    #[test]
    fn test_sync_starts_once() {
        let mut timer = ManualTimer::new();
        let mut repeat = RepeatWhile::new(PERIOD);

        repeat.sync(&mut timer, true);
        repeat.sync(&mut timer, true);
        repeat.sync(&mut timer, true);
        assert!(repeat.is_active());
        assert_eq!(timer.started(), 1);
        assert_eq!(timer.active_count(), 1);
    }

    #[test]
    fn test_sync_cancels_when_condition_clears() {
        let mut timer = ManualTimer::new();
        let mut repeat = RepeatWhile::new(PERIOD);

        repeat.sync(&mut timer, true);
        repeat.sync(&mut timer, false);
        assert!(!repeat.is_active());
        assert_eq!(timer.active_count(), 0);

        // cancelling twice is harmless
        repeat.sync(&mut timer, false);
        assert_eq!(timer.active_count(), 0);
    }

    #[test]
    fn test_fire_only_while_active() {
        let mut timer = ManualTimer::new();
        let mut repeat = RepeatWhile::new(PERIOD);
        assert_eq!(repeat.fire(|| 1), None);
        repeat.sync(&mut timer, true);
        assert_eq!(repeat.fire(|| 1), Some(1));
    }

    #[test]
    fn test_manual_timer_ticks() {
        let mut timer = ManualTimer::new();
        assert_eq!(timer.elapse(PERIOD), 0);
        let handle = timer.start(PERIOD).unwrap();
        assert_eq!(timer.elapse(Duration::from_millis(49)), 0);
        assert_eq!(timer.elapse(Duration::from_millis(1)), 1);
        assert_eq!(timer.elapse(Duration::from_millis(120)), 2);
        timer.cancel(handle);
        assert_eq!(timer.elapse(PERIOD), 0);
    }
}
