//! Reconciliation session record.
//!
//! # Invariants
//! - At most one session is open; reopening overwrites every field.
//! - `unchecked_intent` is only true while the session is open.
//! - `deadline` holds the single pending timer of the open session.

use crate::timer::TimerId;
use serde::Serialize;
use uuid::Uuid;

/// Diagnostic id of one observation window.
pub type SessionId = Uuid;

/// Observation window opened by a user toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSession {
    id: Option<SessionId>,
    interacting: bool,
    unchecked_intent: bool,
    baseline_title: Option<String>,
    deadline: Option<TimerId>,
}

impl ReconciliationSession {
    /// Opens a fresh window, replacing whatever was there.
    ///
    /// The caller must cancel the previous deadline first (see
    /// `take_deadline`).
    pub fn open(&mut self, baseline_title: Option<String>, unchecked_intent: bool) -> SessionId {
        let id = Uuid::new_v4();
        *self = Self {
            id: Some(id),
            interacting: true,
            unchecked_intent,
            baseline_title,
            deadline: None,
        };
        id
    }

    /// Closes the window and hands back the pending deadline to cancel.
    ///
    /// Closing an already-closed session is a no-op.
    pub fn close(&mut self) -> Option<TimerId> {
        self.interacting = false;
        self.unchecked_intent = false;
        self.deadline.take()
    }

    pub fn arm_deadline(&mut self, id: TimerId) {
        self.deadline = Some(id);
    }

    pub fn take_deadline(&mut self) -> Option<TimerId> {
        self.deadline.take()
    }

    pub fn id(&self) -> Option<SessionId> {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.interacting
    }

    pub fn unchecked_intent(&self) -> bool {
        self.unchecked_intent
    }

    pub fn baseline_title(&self) -> Option<&str> {
        self.baseline_title.as_deref()
    }

    pub fn deadline(&self) -> Option<TimerId> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::ReconciliationSession;
    use crate::timer::{DeadlineScheduler, ManualScheduler};
    use std::time::Duration;

    #[test]
    fn reopening_overwrites_baseline_and_intent() {
        let mut session = ReconciliationSession::default();
        let first = session.open(Some("Standard Shipping".to_string()), true);
        let second = session.open(None, false);

        assert_ne!(first, second);
        assert!(session.is_open());
        assert!(!session.unchecked_intent());
        assert_eq!(session.baseline_title(), None);
    }

    #[test]
    fn close_is_idempotent() {
        let mut session = ReconciliationSession::default();
        session.open(None, true);
        assert_eq!(session.close(), None);
        assert_eq!(session.close(), None);
        assert!(!session.is_open());
        assert!(!session.unchecked_intent());
    }

    #[test]
    fn close_hands_back_armed_deadline_once() {
        let mut scheduler = ManualScheduler::new();
        let mut session = ReconciliationSession::default();
        session.open(Some("宅急便".to_string()), false);
        let id = scheduler.schedule(Duration::from_millis(3_000));
        session.arm_deadline(id);

        assert_eq!(session.deadline(), Some(id));
        assert_eq!(session.close(), Some(id));
        assert_eq!(session.close(), None);
        assert_eq!(session.baseline_title(), Some("宅急便"));
    }
}
