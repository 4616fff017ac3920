use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::cart::{CartStateMachine, SellerId};
use super::draft::OrderDraft;
use super::errors::OrderError;
use super::value_objects::OrderKind;

// ============================================================================
// Checkout - Saved cart -> Order draft -> Submission -> Seller clear
// ============================================================================

/// Acknowledgement from the order placement system
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub kind: OrderKind,
    pub placed_at: DateTime<Utc>,
}

/// External order placement system
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, draft: &OrderDraft) -> anyhow::Result<OrderReceipt>;
}

pub struct Checkout {
    cart: Arc<CartStateMachine>,
    submitter: Arc<dyn OrderSubmitter>,
}

impl Checkout {
    pub fn new(cart: Arc<CartStateMachine>, submitter: Arc<dyn OrderSubmitter>) -> Self {
        Self { cart, submitter }
    }

    /// Submit the saved lines of `seller_id` and clear them once accepted.
    ///
    /// A rejected submission leaves the saved cart untouched.
    pub async fn place_order(&self, seller_id: &SellerId) -> Result<OrderReceipt, OrderError> {
        let lines = self.cart.saved_lines_for_seller(seller_id).await?;
        let draft = OrderDraft::from_seller_lines(seller_id, &lines)?;

        tracing::info!(
            order_id = %draft.order_id,
            seller_id = %seller_id,
            kind = %draft.kind,
            line_count = draft.lines.len(),
            subtotal = %draft.subtotal,
            "Submitting order"
        );

        let receipt = self.submitter.submit(&draft).await.map_err(|e| {
            tracing::error!(order_id = %draft.order_id, error = %e, "Order submission failed");
            OrderError::Submission(e)
        })?;

        if let Err(e) = self.cart.clear_cart_for_restaurant(seller_id).await {
            tracing::error!(
                order_id = %receipt.order_id,
                seller_id = %seller_id,
                error = %e,
                "Order placed but saved cart was not cleared"
            );
            return Err(e.into());
        }

        self.cart.metrics().record_order_placed(receipt.kind.as_str());
        tracing::info!(order_id = %receipt.order_id, kind = %receipt.kind, "✅ Order placed");
        Ok(receipt)
    }
}
