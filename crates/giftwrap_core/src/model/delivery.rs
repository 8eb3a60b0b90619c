//! Delivery group model.
//!
//! A group is replaced wholesale whenever the shipping context changes, so
//! nothing here carries identity beyond the option handle.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Option handle, unique within its group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryOptionHandle(String);

impl DeliveryOptionHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for DeliveryOptionHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub handle: DeliveryOptionHandle,
    /// Locale-dependent display text. May be empty while rates recalculate.
    #[serde(default)]
    pub title: String,
}

impl DeliveryOption {
    pub fn new(handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            handle: DeliveryOptionHandle::new(handle),
            title: title.into(),
        }
    }
}

/// One shippable group of the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryGroup {
    #[serde(default)]
    pub delivery_options: Vec<DeliveryOption>,
    /// Reference by handle into `delivery_options`; may dangle.
    #[serde(default)]
    pub selected_delivery_option: Option<DeliveryOptionHandle>,
}

impl DeliveryGroup {
    pub fn new(delivery_options: Vec<DeliveryOption>) -> Self {
        Self {
            delivery_options,
            selected_delivery_option: None,
        }
    }

    /// Marks the option with `handle` as selected.
    pub fn with_selected(mut self, handle: impl Into<String>) -> Self {
        self.selected_delivery_option = Some(DeliveryOptionHandle::new(handle));
        self
    }

    /// Returns the selected option record, if the reference resolves.
    pub fn selected_option(&self) -> Option<&DeliveryOption> {
        let handle = self.selected_delivery_option.as_ref()?;
        self.delivery_options
            .iter()
            .find(|option| &option.handle == handle)
    }
}
