use std::sync::Arc;

use futures_util::stream::{self, Stream};
use tokio::sync::{broadcast, watch, Mutex};

use crate::config::CartConfig;
use crate::domain::aggregate::Aggregate;
use crate::metrics::Metrics;
use crate::store::{CartStore, JsonFileCartStore, MemoryCartStore, SavedCart, SavedCartWatch, StoreError};
use super::commands::SelectionCommand;
use super::errors::CartError;
use super::selection::CurrentSelection;
use super::value_objects::{CartLine, ItemId, MenuItem, SaveMergePolicy, SellerId};

const NOTICE_CAPACITY: usize = 16;

// ============================================================================
// Cart Notices - Side channel for user-visible rejections
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CartNotice {
    /// An add or increment was refused because the selection is full
    CapacityExceeded { limit: u32, item_id: Option<ItemId> },
}

// ============================================================================
// Cart State Machine
// ============================================================================
//
// Orchestrates: Selection Command -> Aggregate -> Snapshot -> Observers
//               Saved cart operation -> CartStore -> Snapshot -> Observers
//
// The selection watch sender is the single writer: `send_if_modified` holds
// the channel lock for the whole read-modify-publish cycle, so concurrent
// callers cannot lose updates. Saved-cart read-modify-write sequences are
// serialized by `saved_lock`.
//
// ============================================================================

pub struct CartStateMachine {
    selection: watch::Sender<CurrentSelection>,
    store: Arc<dyn CartStore>,
    saved_lock: Mutex<()>,
    notices: broadcast::Sender<CartNotice>,
    merge_policy: SaveMergePolicy,
    metrics: Arc<Metrics>,
}

impl CartStateMachine {
    pub fn new(store: Arc<dyn CartStore>, config: &CartConfig, metrics: Arc<Metrics>) -> Self {
        let (selection, _) = watch::channel(CurrentSelection::with_capacity(config.max_items));
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            selection,
            store,
            saved_lock: Mutex::new(()),
            notices,
            merge_policy: config.merge_policy,
            metrics,
        }
    }

    /// Build the state machine with the store selected by `config`
    pub async fn from_config(config: &CartConfig, metrics: Arc<Metrics>) -> Result<Self, CartError> {
        let store: Arc<dyn CartStore> = match &config.store_path {
            Some(path) => Arc::new(JsonFileCartStore::open(path).await?),
            None => Arc::new(MemoryCartStore::new()),
        };
        Ok(Self::new(store, config, metrics))
    }

    // ------------------------------------------------------------------------
    // Current selection
    // ------------------------------------------------------------------------

    /// Stage `item` with quantity 1; an item already staged is left unchanged
    pub fn add_to_selection(
        &self,
        item: Arc<MenuItem>,
        seller_id: SellerId,
        seller_name: impl Into<String>,
    ) -> Result<(), CartError> {
        self.dispatch(SelectionCommand::Add {
            item,
            seller_id,
            seller_name: seller_name.into(),
        })
    }

    pub fn increment_selection(&self, item_id: &ItemId) -> Result<(), CartError> {
        self.dispatch(SelectionCommand::Increment {
            item_id: item_id.clone(),
        })
    }

    pub fn decrement_selection(&self, item_id: &ItemId) -> Result<(), CartError> {
        self.dispatch(SelectionCommand::Decrement {
            item_id: item_id.clone(),
        })
    }

    pub fn clear_selection(&self) {
        // Clear has no failure mode
        let _ = self.dispatch(SelectionCommand::Clear);
    }

    fn dispatch(&self, command: SelectionCommand) -> Result<(), CartError> {
        let mut outcome = Ok(());
        let mut applied: Vec<&'static str> = Vec::new();
        let mut total_quantity = 0;

        self.selection.send_if_modified(|selection| match selection.execute(&command) {
            Ok(events) => {
                applied = events.iter().map(|event| event.event_type()).collect();
                total_quantity = selection.total_quantity();
                !events.is_empty()
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        match &outcome {
            Ok(()) if applied.is_empty() => {
                tracing::debug!(operation = command.operation(), "Selection unchanged");
            }
            Ok(()) => {
                tracing::debug!(
                    operation = command.operation(),
                    events = ?applied,
                    total_quantity = total_quantity,
                    "Selection updated"
                );
                self.metrics.record_selection_mutation(command.operation(), total_quantity);
            }
            Err(CartError::CapacityExceeded { limit }) => {
                let item_id = command.item_id().cloned();
                tracing::warn!(
                    operation = command.operation(),
                    item_id = ?item_id,
                    limit = *limit,
                    "Selection is full, mutation rejected"
                );
                self.metrics.record_capacity_rejection();
                // No subscribers is fine
                let _ = self.notices.send(CartNotice::CapacityExceeded {
                    limit: *limit,
                    item_id,
                });
            }
            Err(e) => {
                tracing::error!(operation = command.operation(), error = %e, "Selection command failed");
            }
        }

        outcome
    }

    /// Current selection snapshot
    pub fn selection(&self) -> CurrentSelection {
        self.selection.borrow().clone()
    }

    /// Latest-value receiver for the selection
    pub fn watch_selection(&self) -> watch::Receiver<CurrentSelection> {
        self.selection.subscribe()
    }

    /// Stream yielding the current selection, then each newer snapshot.
    ///
    /// Intermediate snapshots may be skipped; the latest one is always delivered.
    pub fn selection_stream(&self) -> impl Stream<Item = CurrentSelection> + Send + 'static {
        let mut receiver = self.selection.subscribe();
        receiver.mark_changed();

        stream::unfold(receiver, |mut receiver| async move {
            receiver.changed().await.ok()?;
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, receiver))
        })
    }

    /// Capacity-exceeded notices
    pub fn notices(&self) -> broadcast::Receiver<CartNotice> {
        self.notices.subscribe()
    }

    // ------------------------------------------------------------------------
    // Saved cart
    // ------------------------------------------------------------------------

    /// Upsert every selected line into the saved cart, then drop the saved
    /// lines from the selection.
    ///
    /// Upserts are awaited one by one. If any fails the error is returned and
    /// the selection is kept, so no unsent line is lost. Lines added or
    /// changed while the upserts were in flight stay in the selection.
    pub async fn save_selection_to_cart(&self) -> Result<usize, CartError> {
        let _guard = self.saved_lock.lock().await;
        let selection = self.selection();

        for line in selection.lines() {
            let saved = match self.merge_policy {
                SaveMergePolicy::Replace => None,
                SaveMergePolicy::Accumulate => self
                    .store_call("get", self.store.get(line.item_id()))
                    .await?
                    .map(|saved| saved.quantity),
            };
            let quantity = self.merge_policy.merge(saved, line.quantity);

            self.store_call("upsert", self.store.upsert(line.clone().with_quantity(quantity)))
                .await?;
        }

        let saved = selection.len();
        // Cannot fail: release never checks the cap
        let _ = self.dispatch(SelectionCommand::ReleaseSaved {
            lines: selection.lines().cloned().collect(),
        });
        self.metrics.record_saved_mutation("save_selection");

        tracing::info!(
            saved_lines = saved,
            merge_policy = ?self.merge_policy,
            "Saved selection to cart"
        );
        Ok(saved)
    }

    /// Add one unit to a saved line; no cap applies and absent lines are ignored
    pub async fn increment_saved_item(&self, item_id: &ItemId) -> Result<(), CartError> {
        let _guard = self.saved_lock.lock().await;

        let Some(line) = self.store_call("get", self.store.get(item_id)).await? else {
            tracing::debug!(item_id = %item_id, "Increment of absent saved item ignored");
            return Ok(());
        };

        let quantity = line.quantity.saturating_add(1);
        self.store_call("upsert", self.store.upsert(line.with_quantity(quantity)))
            .await?;
        self.metrics.record_saved_mutation("increment");

        tracing::debug!(item_id = %item_id, quantity = quantity, "Saved item incremented");
        Ok(())
    }

    /// Remove one unit from a saved line, deleting the line at zero
    pub async fn decrement_saved_item(&self, item_id: &ItemId) -> Result<(), CartError> {
        let _guard = self.saved_lock.lock().await;

        let Some(line) = self.store_call("get", self.store.get(item_id)).await? else {
            tracing::debug!(item_id = %item_id, "Decrement of absent saved item ignored");
            return Ok(());
        };

        if line.quantity > 1 {
            let quantity = line.quantity - 1;
            self.store_call("upsert", self.store.upsert(line.with_quantity(quantity)))
                .await?;
            tracing::debug!(item_id = %item_id, quantity = quantity, "Saved item decremented");
        } else {
            self.store_call("delete", self.store.delete(item_id)).await?;
            tracing::debug!(item_id = %item_id, "Saved item removed");
        }
        self.metrics.record_saved_mutation("decrement");
        Ok(())
    }

    /// Remove every saved line of `seller_id`, returning how many went
    pub async fn clear_cart_for_restaurant(&self, seller_id: &SellerId) -> Result<usize, CartError> {
        let _guard = self.saved_lock.lock().await;

        let removed = self
            .store_call("delete_by_seller", self.store.delete_by_seller(seller_id))
            .await?;
        if removed > 0 {
            self.metrics.record_saved_mutation("clear_seller");
        }

        tracing::info!(seller_id = %seller_id, removed = removed, "Cleared saved cart for seller");
        Ok(removed)
    }

    pub async fn saved_cart(&self) -> Result<SavedCart, CartError> {
        Ok(self.store_call("snapshot", self.store.snapshot()).await?)
    }

    /// Saved lines of one seller, as read by order assembly
    pub async fn saved_lines_for_seller(&self, seller_id: &SellerId) -> Result<Vec<CartLine>, CartError> {
        let cart = self.saved_cart().await?;
        Ok(cart.for_seller(seller_id).cloned().collect())
    }

    pub fn watch_saved_cart(&self) -> SavedCartWatch {
        self.store.observe()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    async fn store_call<T>(
        &self,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        call.await.inspect_err(|e| {
            tracing::error!(operation = operation, error = %e, "Cart store operation failed");
            self.metrics.record_store_failure(operation);
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
