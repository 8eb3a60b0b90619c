//! Gift option reconciliation controller.
//!
//! # Responsibility
//! - Mirror gift line presence from the cart feed into the checkbox state.
//! - Turn a user toggle into one cart mutation and open an observation window.
//! - Watch delivery group snapshots during the window and raise at most one
//!   notification.
//!
//! # Invariants
//! - All handler state lives on the controller; handlers never read stale
//!   captured snapshots.
//! - Exactly one deadline is pending while a session is open, none otherwise.
//! - Handlers never fail: mutation errors are logged and otherwise ignored.
//!
//! # See also
//! - `snapshot` for title resolution and carrier detection.

use crate::config::{ConfigError, GiftOptionConfig};
use crate::model::cart::LineItem;
use crate::model::delivery::DeliveryGroup;
use crate::mutation::{CartLineChange, CartLineMutator};
use crate::notification::NotificationState;
use crate::session::ReconciliationSession;
use crate::snapshot::{
    contains_merchandise, find_line_by_merchandise, has_carrier_option, resolve_delivery_title,
};
use crate::timer::{DeadlineScheduler, TimerId};
use crate::view::{render_block, BlockCopy, GiftOptionBlock};
use log::{debug, info, warn};

const GIFT_ADD_QUANTITY: u32 = 1;

/// Single state object shared by every feed and user handler.
pub struct GiftOptionController<M: CartLineMutator, S: DeadlineScheduler> {
    config: GiftOptionConfig,
    copy: BlockCopy,
    mutator: M,
    scheduler: S,
    cart_lines: Vec<LineItem>,
    delivery_groups: Vec<DeliveryGroup>,
    selected: bool,
    session: ReconciliationSession,
    notification: NotificationState,
}

impl<M: CartLineMutator, S: DeadlineScheduler> GiftOptionController<M, S> {
    /// Creates a controller after validating `config`.
    ///
    /// # Errors
    /// - Returns `ConfigError` when `config.validate()` fails.
    pub fn new(config: GiftOptionConfig, mutator: M, scheduler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            copy: BlockCopy::default(),
            mutator,
            scheduler,
            cart_lines: Vec::new(),
            delivery_groups: Vec::new(),
            selected: false,
            session: ReconciliationSession::default(),
            notification: NotificationState::None,
        })
    }

    /// Replaces the storefront copy used by `view()`.
    pub fn with_copy(mut self, copy: BlockCopy) -> Self {
        self.copy = copy;
        self
    }

    /// Cart feed handler.
    ///
    /// Recomputes the mirrored selection from the snapshot, regardless of any
    /// open session or past user action.
    pub fn on_cart_lines_changed(&mut self, lines: Vec<LineItem>) {
        self.cart_lines = lines;
        let selected = contains_merchandise(&self.cart_lines, &self.config.gift_merchandise_id);
        if selected != self.selected {
            debug!(
                "event=selection_mirrored module=gift_option status=ok selected={} lines={}",
                selected,
                self.cart_lines.len()
            );
        }
        self.selected = selected;
    }

    /// User toggle handler.
    ///
    /// Supersedes any unfinished session, captures the baseline title, issues
    /// at most one cart mutation and arms a fresh deadline. Returns the
    /// submitted change, or `None` when deselecting with no gift line present.
    pub fn on_toggle(&mut self, checked: bool) -> Option<CartLineChange> {
        if let Some(previous) = self.session.take_deadline() {
            self.scheduler.cancel(previous);
        }

        let baseline = resolve_delivery_title(&self.delivery_groups).map(str::to_string);
        let session_id = self.session.open(baseline, !checked);
        self.notification = NotificationState::None;
        self.selected = checked;
        info!(
            "event=session_open module=gift_option status=ok session={} checked={} baseline={}",
            session_id,
            checked,
            self.session.baseline_title().unwrap_or("-")
        );

        let change = self.build_change(checked);
        match &change {
            Some(change) => match self.mutator.apply(change) {
                Ok(()) => info!(
                    "event=cart_change_issued module=gift_option status=ok session={} kind={}",
                    session_id,
                    change.kind()
                ),
                Err(err) => warn!(
                    "event=cart_change_issued module=gift_option status=error session={} kind={} error={}",
                    session_id,
                    change.kind(),
                    err
                ),
            },
            None => debug!(
                "event=cart_change_skipped module=gift_option status=ok session={} reason=gift_line_missing",
                session_id
            ),
        }

        let deadline = self.scheduler.schedule(self.config.observation_window);
        self.session.arm_deadline(deadline);
        change
    }

    /// Delivery feed handler.
    ///
    /// Stores the snapshot and, while a session is open, decides whether it
    /// warrants a notification. Returns the resulting notification state.
    pub fn on_delivery_groups_changed(&mut self, groups: Vec<DeliveryGroup>) -> NotificationState {
        self.delivery_groups = groups;
        if !self.session.is_open() {
            return self.notification;
        }

        let Some(current) = resolve_delivery_title(&self.delivery_groups).map(str::to_string)
        else {
            debug!(
                "event=snapshot_observed module=gift_option status=pending reason=title_unresolved"
            );
            return self.notification;
        };

        if self.session.unchecked_intent()
            && has_carrier_option(&self.delivery_groups, &self.config.carrier_marker)
        {
            self.raise(NotificationState::AlternateCarrierAvailable, &current);
            return self.notification;
        }

        let changed = self
            .session
            .baseline_title()
            .is_some_and(|baseline| baseline != current.as_str());
        if changed {
            self.raise(NotificationState::DeliveryMethodChanged, &current);
        } else {
            debug!(
                "event=snapshot_observed module=gift_option status=pending reason=title_unchanged current={}",
                current
            );
        }
        self.notification
    }

    /// Deadline handler.
    ///
    /// Closes the session without a notification when `id` is the live
    /// deadline. Stale or repeated firings are ignored. Returns whether the
    /// session was closed by this call.
    pub fn on_deadline(&mut self, id: TimerId) -> bool {
        if self.session.deadline() != Some(id) {
            debug!(
                "event=deadline_ignored module=gift_option status=ok timer={} reason=stale",
                id
            );
            return false;
        }
        self.session.close();
        info!(
            "event=session_close module=gift_option status=timeout session={}",
            self.session_label()
        );
        true
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn notification(&self) -> NotificationState {
        self.notification
    }

    pub fn session(&self) -> &ReconciliationSession {
        &self.session
    }

    pub fn config(&self) -> &GiftOptionConfig {
        &self.config
    }

    pub fn cart_lines(&self) -> &[LineItem] {
        &self.cart_lines
    }

    pub fn mutator(&self) -> &M {
        &self.mutator
    }

    pub fn mutator_mut(&mut self) -> &mut M {
        &mut self.mutator
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Renders the current block.
    pub fn view(&self) -> GiftOptionBlock {
        render_block(self.selected, self.notification, &self.copy)
    }

    fn build_change(&self, checked: bool) -> Option<CartLineChange> {
        if checked {
            return Some(CartLineChange::AddCartLine {
                merchandise_id: self.config.gift_merchandise_id.clone(),
                quantity: GIFT_ADD_QUANTITY,
            });
        }
        find_line_by_merchandise(&self.cart_lines, &self.config.gift_merchandise_id).map(|line| {
            CartLineChange::RemoveCartLine {
                id: line.id.clone(),
                quantity: line.quantity,
            }
        })
    }

    fn raise(&mut self, state: NotificationState, current: &str) {
        info!(
            "event=notification_raised module=gift_option status=ok session={} kind={} baseline={} current={}",
            self.session_label(),
            state.as_str(),
            self.session.baseline_title().unwrap_or("-"),
            current
        );
        self.notification = state;
        if let Some(deadline) = self.session.close() {
            self.scheduler.cancel(deadline);
        }
    }

    fn session_label(&self) -> String {
        self.session
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
