use std::sync::Arc;

use actix::prelude::*;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use grocery_cart::actors::{
    AddToSelection, CartActor, GetSavedCart, GetSelection, IncrementSavedItem, IncrementSelection,
    SaveSelection,
};
use grocery_cart::metrics::Metrics;
use grocery_cart::ui::{QuantityAction, QuantityControl};
use grocery_cart::{
    CartConfig, CartNotice, CartStateMachine, Checkout, MenuItem, OrderDraft, OrderReceipt,
    OrderSubmitter, SellerId,
};

/// Stand-in for the remote order placement system
struct LoggingSubmitter;

#[async_trait]
impl OrderSubmitter for LoggingSubmitter {
    async fn submit(&self, draft: &OrderDraft) -> anyhow::Result<OrderReceipt> {
        tracing::info!(payload = %serde_json::to_string(draft)?, "Order payload");
        Ok(OrderReceipt {
            order_id: draft.order_id,
            kind: draft.kind,
            placed_at: Utc::now(),
        })
    }
}

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO, override with RUST_LOG (e.g. RUST_LOG=debug)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,grocery_cart=debug"))
        )
        .init();

    tracing::info!("🛒 Starting grocery cart core demo");

    // === 1. Configuration & metrics ===
    let config = CartConfig::load()?;
    tracing::info!(
        max_items = config.max_items,
        merge_policy = ?config.merge_policy,
        store_path = ?config.store_path,
        "Loaded cart configuration"
    );
    let metrics = Arc::new(Metrics::new()?);

    // === 2. Cart state machine over the configured store ===
    let cart = Arc::new(CartStateMachine::from_config(&config, metrics.clone()).await?);
    let restored = cart.saved_cart().await?;
    tracing::info!(saved_lines = restored.len(), "Saved cart restored");

    // Surface capacity notices the way a UI would show a toast
    let mut notices = cart.notices();
    actix::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            match notice {
                CartNotice::CapacityExceeded { limit, item_id } => {
                    tracing::warn!(limit = limit, item_id = ?item_id, "⚠️ You can only select {limit} items");
                }
            }
        }
    });

    // === 3. Actor front-end ===
    let actor = CartActor::new(cart.clone()).start();

    // === 4. Typical flow: select, save, adjust, order ===
    let seller = SellerId::new("S1");
    let burger = Arc::new(MenuItem::new("burger", "Burger", Decimal::new(10, 0), "Current Menu"));

    actor
        .send(AddToSelection {
            item: burger.clone(),
            seller_id: seller,
            seller_name: "Shop1".to_string(),
        })
        .await??;

    // Catalog row wired through the shared quantity control
    let quantity = actor.send(GetSelection).await?.quantity_of(&burger.id);
    {
        let mut row = QuantityControl::new(
            quantity,
            || {},
            || actor.do_send(IncrementSelection { item_id: burger.id.clone() }),
            || {},
        );
        row.press(QuantityAction::Increment);
        row.press(QuantityAction::Increment);
    }

    let selection = actor.send(GetSelection).await?;
    tracing::info!(burger = selection.quantity_of(&burger.id), "Selection before save");

    let saved = actor.send(SaveSelection).await??;
    tracing::info!(saved_lines = saved, "✅ Selection saved to cart");

    actor
        .send(IncrementSavedItem { item_id: burger.id.clone() })
        .await??;
    let saved_cart = actor.send(GetSavedCart).await??;
    tracing::info!(
        burger = saved_cart.quantity_of(&burger.id),
        subtotal = %saved_cart.subtotal(),
        "Saved cart after increment"
    );

    // One order per seller with saved lines
    let checkout = Checkout::new(cart.clone(), Arc::new(LoggingSubmitter));
    for (seller_id, seller_name) in saved_cart.sellers() {
        let receipt = checkout.place_order(&seller_id).await?;
        tracing::info!(
            seller = %seller_name,
            order_id = %receipt.order_id,
            kind = %receipt.kind,
            "Order confirmed"
        );
    }

    let remaining = cart.saved_cart().await?;
    tracing::info!(saved_lines = remaining.len(), "Saved cart after order");

    tracing::debug!(metrics = %metrics.render()?, "Final metrics");
    tracing::info!("🎉 Demo complete!");

    Ok(())
}
