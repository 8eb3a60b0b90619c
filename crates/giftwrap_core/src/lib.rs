//! Core logic for the checkout gift-wrapping option.
//! This crate owns the reconciliation between the gift toggle and the
//! platform's delivery group feed; rendering and hosting live elsewhere.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod mutation;
pub mod notification;
pub mod replay;
pub mod session;
pub mod snapshot;
pub mod timer;
pub mod view;

pub use config::{CatalogEnvironment, ConfigError, GiftOptionConfig};
pub use controller::GiftOptionController;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cart::{LineItem, LineItemId, MerchandiseId};
pub use model::delivery::{DeliveryGroup, DeliveryOption, DeliveryOptionHandle};
pub use mutation::{CartLineChange, CartLineMutator, InMemoryCart, MutationError};
pub use notification::{present, Banner, NotificationState};
pub use replay::{load_script, parse_script, run_script, ReplayError, ReplayReport, ReplayScript};
pub use session::{ReconciliationSession, SessionId};
pub use snapshot::{has_carrier_option, resolve_delivery_title};
pub use timer::{DeadlineScheduler, ManualScheduler, TimerId};
pub use view::{render_block, BlockCopy, GiftOptionBlock};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
