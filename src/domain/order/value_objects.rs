use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{CartLine, ItemId};

// ============================================================================
// Order Value Objects
// ============================================================================

/// Fulfillment class of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Instant,
    PreOrder,
}

impl OrderKind {
    /// Any pre-order line makes the whole order a pre-order
    pub fn classify<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
        if lines
            .into_iter()
            .any(|line| line.item.availability().is_pre_order())
        {
            OrderKind::PreOrder
        } else {
            OrderKind::Instant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Instant => "Instant",
            OrderKind::PreOrder => "PreOrder",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priced line of an order, detached from the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item.id.clone(),
            name: line.item.name.clone(),
            category: line.item.category.clone(),
            unit_price: line.item.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
