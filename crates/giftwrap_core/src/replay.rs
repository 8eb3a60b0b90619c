//! Scripted replay host.
//!
//! # Responsibility
//! - Drive a controller from a JSON script of timed feed and user events.
//! - Simulate the platform side: an in-memory cart and a virtual clock.
//!
//! # Invariants
//! - Events are applied in script order; `at_ms` must never decrease.
//! - Deadlines due at or before an event fire before that event applies.
//! - The run ends with one settle step one observation window after the
//!   last event.

use crate::config::{ConfigDocument, ConfigError, GiftOptionConfig};
use crate::controller::GiftOptionController;
use crate::model::cart::LineItem;
use crate::model::delivery::DeliveryGroup;
use crate::mutation::{CartLineChange, InMemoryCart};
use crate::notification::NotificationState;
use crate::timer::ManualScheduler;
use crate::view::GiftOptionBlock;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One replay script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    #[serde(default)]
    pub config: Option<ConfigDocument>,
    #[serde(default)]
    pub initial_cart: Vec<LineItem>,
    /// Feed the simulated cart back to the controller after each toggle that
    /// changed it.
    #[serde(default = "default_echo_cart")]
    pub echo_cart: bool,
    pub events: Vec<TimedEvent>,
}

fn default_echo_cart() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ReplayEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEvent {
    CartLines { lines: Vec<LineItem> },
    DeliveryGroups { groups: Vec<DeliveryGroup> },
    Toggle { checked: bool },
    RejectMutations { reject: bool },
}

impl ReplayEvent {
    fn label(&self) -> String {
        match self {
            Self::CartLines { lines } => format!("cart_lines({})", lines.len()),
            Self::DeliveryGroups { groups } => format!("delivery_groups({})", groups.len()),
            Self::Toggle { checked } => format!("toggle({checked})"),
            Self::RejectMutations { reject } => format!("reject_mutations({reject})"),
        }
    }
}

/// Observable state after one replay step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayStep {
    pub at_ms: u64,
    pub label: String,
    pub deadlines_fired: usize,
    pub change: Option<CartLineChange>,
    pub selected: bool,
    pub notification: NotificationState,
    pub session_open: bool,
}

/// Result of one script run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub submitted_changes: Vec<CartLineChange>,
    pub final_block: GiftOptionBlock,
}

impl ReplayReport {
    pub fn final_notification(&self) -> NotificationState {
        self.steps
            .last()
            .map(|step| step.notification)
            .unwrap_or_default()
    }
}

/// Replay load and run errors.
#[derive(Debug)]
pub enum ReplayError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Config(ConfigError),
    OutOfOrder { index: usize, at_ms: u64, previous_ms: u64 },
}

impl Display for ReplayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read replay script `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid replay script: {err}"),
            Self::Config(err) => write!(f, "invalid replay config: {err}"),
            Self::OutOfOrder {
                index,
                at_ms,
                previous_ms,
            } => write!(
                f,
                "event #{index} at {at_ms} ms is earlier than previous event at {previous_ms} ms"
            ),
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::OutOfOrder { .. } => None,
        }
    }
}

impl From<ConfigError> for ReplayError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

pub fn parse_script(raw: &str) -> Result<ReplayScript, ReplayError> {
    serde_json::from_str(raw).map_err(ReplayError::Parse)
}

pub fn load_script(path: &Path) -> Result<ReplayScript, ReplayError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&raw)
}

/// Runs `script` against a fresh controller.
///
/// # Errors
/// - `Config` when the embedded config document is invalid.
/// - `OutOfOrder` when event times decrease; no events are applied then.
pub fn run_script(script: &ReplayScript) -> Result<ReplayReport, ReplayError> {
    validate_order(&script.events)?;
    let config = match &script.config {
        Some(document) => GiftOptionConfig::from_document(document.clone())?,
        None => GiftOptionConfig::default(),
    };
    let window = config.observation_window;
    let cart = InMemoryCart::with_lines(script.initial_cart.clone());
    let mut controller = GiftOptionController::new(config, cart, ManualScheduler::new())?;
    controller.on_cart_lines_changed(script.initial_cart.clone());

    let mut steps = Vec::with_capacity(script.events.len() + 1);
    for timed in &script.events {
        let at = Duration::from_millis(timed.at_ms);
        let deadlines_fired = fire_due(&mut controller, at);
        let change = apply_event(&mut controller, &timed.event, script.echo_cart);
        steps.push(snapshot_step(
            &controller,
            timed.at_ms,
            timed.event.label(),
            deadlines_fired,
            change,
        ));
    }

    let settle_at = controller.scheduler().now() + window;
    let deadlines_fired = fire_due(&mut controller, settle_at);
    steps.push(snapshot_step(
        &controller,
        duration_ms(settle_at),
        "settle".to_string(),
        deadlines_fired,
        None,
    ));

    info!(
        "event=replay_finished module=replay status=ok steps={} notification={}",
        steps.len(),
        controller.notification().as_str()
    );

    Ok(ReplayReport {
        steps,
        submitted_changes: controller.mutator().submitted().to_vec(),
        final_block: controller.view(),
    })
}

type ReplayController = GiftOptionController<InMemoryCart, ManualScheduler>;

fn validate_order(events: &[TimedEvent]) -> Result<(), ReplayError> {
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(ReplayError::OutOfOrder {
                index: index + 1,
                at_ms: pair[1].at_ms,
                previous_ms: pair[0].at_ms,
            });
        }
    }
    Ok(())
}

fn fire_due(controller: &mut ReplayController, at: Duration) -> usize {
    let fired = controller.scheduler_mut().advance_to(at);
    fired
        .into_iter()
        .filter(|id| controller.on_deadline(*id))
        .count()
}

fn apply_event(
    controller: &mut ReplayController,
    event: &ReplayEvent,
    echo_cart: bool,
) -> Option<CartLineChange> {
    match event {
        ReplayEvent::CartLines { lines } => {
            // Platform-side change: the simulated cart follows it so later
            // toggle echoes start from the same contents.
            controller.mutator_mut().replace_lines(lines.clone());
            controller.on_cart_lines_changed(lines.clone());
            None
        }
        ReplayEvent::DeliveryGroups { groups } => {
            controller.on_delivery_groups_changed(groups.clone());
            None
        }
        ReplayEvent::Toggle { checked } => {
            let change = controller.on_toggle(*checked);
            // A rejected change leaves the cart as-is; the platform pushes
            // nothing in that case.
            if echo_cart && controller.mutator().lines() != controller.cart_lines() {
                let lines = controller.mutator().lines().to_vec();
                controller.on_cart_lines_changed(lines);
            }
            change
        }
        ReplayEvent::RejectMutations { reject } => {
            let reason = reject.then(|| "rejected by replay script".to_string());
            controller.mutator_mut().set_reject_reason(reason);
            None
        }
    }
}

fn snapshot_step(
    controller: &ReplayController,
    at_ms: u64,
    label: String,
    deadlines_fired: usize,
    change: Option<CartLineChange>,
) -> ReplayStep {
    ReplayStep {
        at_ms,
        label,
        deadlines_fired,
        change,
        selected: controller.is_selected(),
        notification: controller.notification(),
        session_open: controller.session().is_open(),
    }
}

fn duration_ms(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}
