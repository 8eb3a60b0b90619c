//! Deadline scheduling for observation windows.
//!
//! # Responsibility
//! - Hand out opaque timer handles for one-shot deadlines.
//! - Provide a virtual-clock scheduler for deterministic hosts and tests.
//!
//! # Invariants
//! - Timer ids are never reused within one scheduler.
//! - A cancelled or fired timer never fires (again).

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Opaque handle of one scheduled deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for TimerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Host capability for one-shot deadlines.
///
/// Firing is delivered by the host back to the owner of the handle; the
/// scheduler itself never calls into core state.
pub trait DeadlineScheduler {
    fn schedule(&mut self, after: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Virtual-clock scheduler.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since scheduler creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Moves the clock forward to `at` and returns timers due by then,
    /// ordered by due time then id.
    ///
    /// Moving backwards is a no-op.
    pub fn advance_to(&mut self, at: Duration) -> Vec<TimerId> {
        if at > self.now {
            self.now = at;
        }
        let now = self.now;
        let mut due = self
            .pending
            .iter()
            .filter(|(_, due_at)| **due_at <= now)
            .map(|(id, due_at)| (*due_at, *id))
            .collect::<Vec<_>>();
        due.sort();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn advance_by(&mut self, delta: Duration) -> Vec<TimerId> {
        let at = self.now + delta;
        self.advance_to(at)
    }
}

impl DeadlineScheduler for ManualScheduler {
    fn schedule(&mut self, after: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(id, self.now + after);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::{DeadlineScheduler, ManualScheduler};
    use std::time::Duration;

    #[test]
    fn fires_only_due_timers_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(300));
        let early = scheduler.schedule(Duration::from_millis(100));

        assert!(scheduler.advance_by(Duration::from_millis(50)).is_empty());
        assert_eq!(scheduler.advance_to(Duration::from_millis(400)), vec![early, late]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule(Duration::from_millis(100));
        scheduler.cancel(id);
        scheduler.cancel(id);
        assert!(!scheduler.is_pending(id));
        assert!(scheduler.advance_by(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance_to(Duration::from_millis(500));
        scheduler.advance_to(Duration::from_millis(100));
        assert_eq!(scheduler.now(), Duration::from_millis(500));

        let first = scheduler.schedule(Duration::from_millis(10));
        let second = scheduler.schedule(Duration::from_millis(10));
        assert_ne!(first, second);
    }
}
