//! Cart line model.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque product variant identity, e.g. `gid://shopify/ProductVariant/1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchandiseId(String);

impl MerchandiseId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for MerchandiseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque cart line identity assigned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for LineItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub merchandise_id: MerchandiseId,
    /// Positive for every line the platform emits.
    pub quantity: u32,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        merchandise_id: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: LineItemId::new(id),
            merchandise_id: MerchandiseId::new(merchandise_id),
            quantity,
        }
    }
}
