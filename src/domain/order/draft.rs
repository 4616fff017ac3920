use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::{CartLine, SellerId};
use super::errors::OrderError;
use super::value_objects::{OrderKind, OrderLine};

// ============================================================================
// Order Draft - Payload handed to the order placement system
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub order_id: Uuid,
    pub seller_id: SellerId,
    pub seller_name: String,
    pub kind: OrderKind,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Assemble a draft from the saved lines of one seller
    pub fn from_seller_lines(seller_id: &SellerId, lines: &[CartLine]) -> Result<Self, OrderError> {
        let Some(first) = lines.first() else {
            return Err(OrderError::SellerNotInCart(seller_id.clone()));
        };

        let seller_name = first.seller_name.clone();
        let kind = OrderKind::classify(lines.iter());
        let lines: Vec<OrderLine> = lines.iter().map(OrderLine::from).collect();
        let subtotal = lines.iter().map(|line| line.line_total).sum();

        Ok(Self {
            order_id: Uuid::now_v7(),
            seller_id: seller_id.clone(),
            seller_name,
            kind,
            lines,
            subtotal,
            created_at: Utc::now(),
        })
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
