//! Cart line mutation capability.
//!
//! # Responsibility
//! - Describe the two cart mutations the gift option may request.
//! - Provide an in-memory cart for scripted hosts and tests.
//!
//! # Invariants
//! - Callers fire a change and do not wait for platform acknowledgement.
//! - A rejected change leaves the caller's optimistic state untouched.

use crate::model::cart::{LineItem, LineItemId, MerchandiseId};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Mutation request sent to the platform cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartLineChange {
    #[serde(rename_all = "camelCase")]
    AddCartLine {
        merchandise_id: MerchandiseId,
        quantity: u32,
    },
    #[serde(rename_all = "camelCase")]
    RemoveCartLine { id: LineItemId, quantity: u32 },
}

impl CartLineChange {
    /// Stable short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddCartLine { .. } => "add_cart_line",
            Self::RemoveCartLine { .. } => "remove_cart_line",
        }
    }
}

/// Platform capability accepting cart line changes.
pub trait CartLineMutator {
    /// Submits one change. The result is advisory only.
    fn apply(&mut self, change: &CartLineChange) -> Result<(), MutationError>;
}

/// Mutation rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    Rejected(String),
    LineNotFound(LineItemId),
    InvalidQuantity(u32),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "cart change rejected: {reason}"),
            Self::LineNotFound(id) => write!(f, "cart line not found: {id}"),
            Self::InvalidQuantity(quantity) => {
                write!(f, "cart change quantity is invalid: {quantity}")
            }
        }
    }
}

impl Error for MutationError {}

/// Simulated platform cart.
///
/// Applies changes to its own line list and records every submitted change,
/// including rejected ones.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCart {
    lines: Vec<LineItem>,
    submitted: Vec<CartLineChange>,
    reject_reason: Option<String>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(lines: Vec<LineItem>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Current cart contents as the platform would push them.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Every change submitted so far, in order.
    pub fn submitted(&self) -> &[CartLineChange] {
        &self.submitted
    }

    /// Makes subsequent changes fail with `reason`; `None` restores normal
    /// behavior.
    pub fn set_reject_reason(&mut self, reason: Option<String>) {
        self.reject_reason = reason;
    }

    /// Replaces the cart contents with a platform-pushed snapshot.
    pub fn replace_lines(&mut self, lines: Vec<LineItem>) {
        self.lines = lines;
    }

    fn add_line(
        &mut self,
        merchandise_id: &MerchandiseId,
        quantity: u32,
    ) -> Result<(), MutationError> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.merchandise_id == merchandise_id)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(MutationError::InvalidQuantity(quantity))?;
            return Ok(());
        }
        self.lines.push(LineItem {
            id: LineItemId::new(format!("gid://shopify/CartLine/{}", Uuid::new_v4())),
            merchandise_id: merchandise_id.clone(),
            quantity,
        });
        Ok(())
    }

    fn remove_line(&mut self, id: &LineItemId, quantity: u32) -> Result<(), MutationError> {
        let index = self
            .lines
            .iter()
            .position(|line| &line.id == id)
            .ok_or_else(|| MutationError::LineNotFound(id.clone()))?;
        let line = &mut self.lines[index];
        if quantity >= line.quantity {
            self.lines.remove(index);
        } else {
            line.quantity -= quantity;
        }
        Ok(())
    }
}

impl CartLineMutator for InMemoryCart {
    fn apply(&mut self, change: &CartLineChange) -> Result<(), MutationError> {
        self.submitted.push(change.clone());
        if let Some(reason) = &self.reject_reason {
            return Err(MutationError::Rejected(reason.clone()));
        }
        match change {
            CartLineChange::AddCartLine {
                merchandise_id,
                quantity,
            } => {
                if *quantity == 0 {
                    return Err(MutationError::InvalidQuantity(*quantity));
                }
                self.add_line(merchandise_id, *quantity)
            }
            CartLineChange::RemoveCartLine { id, quantity } => {
                if *quantity == 0 {
                    return Err(MutationError::InvalidQuantity(*quantity));
                }
                self.remove_line(id, *quantity)
            }
        }
    }
}
