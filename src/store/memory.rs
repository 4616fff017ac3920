use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::cart::{CartLine, ItemId, SellerId};
use super::cart_store::{CartStore, SavedCart, SavedCartWatch, StoreError};

// ============================================================================
// In-Memory Cart Store
// ============================================================================
//
// The watch sender owns the authoritative snapshot. `send_modify` runs the
// mutation under the channel lock and notifies every receiver.
//
// ============================================================================

pub struct MemoryCartStore {
    state: watch::Sender<SavedCart>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::with_lines(Vec::new())
    }

    /// Store pre-populated with rows, e.g. restored from elsewhere
    pub fn with_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let (state, _) = watch::channel(lines.into_iter().collect());
        Self { state }
    }
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    fn observe(&self) -> SavedCartWatch {
        self.state.subscribe()
    }

    async fn snapshot(&self) -> Result<SavedCart, StoreError> {
        Ok(self.state.borrow().clone())
    }

    async fn get(&self, item_id: &ItemId) -> Result<Option<CartLine>, StoreError> {
        Ok(self.state.borrow().get(item_id).cloned())
    }

    async fn upsert(&self, line: CartLine) -> Result<(), StoreError> {
        tracing::debug!(
            item_id = %line.item_id(),
            seller_id = %line.seller_id,
            quantity = line.quantity,
            "Upserting saved line"
        );
        self.state.send_modify(|cart| cart.upsert(line));
        Ok(())
    }

    async fn delete(&self, item_id: &ItemId) -> Result<(), StoreError> {
        self.state.send_if_modified(|cart| cart.remove(item_id).is_some());
        Ok(())
    }

    async fn delete_by_seller(&self, seller_id: &SellerId) -> Result<usize, StoreError> {
        let mut removed = 0;
        self.state.send_if_modified(|cart| {
            removed = cart.remove_seller(seller_id);
            removed > 0
        });
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use rust_decimal::Decimal;
    use crate::domain::cart::MenuItem;

    fn line(id: &str, seller: &str) -> CartLine {
        let item = Arc::new(MenuItem::new(id, id, Decimal::ONE, "Current Menu"));
        CartLine::new(item, SellerId::new(seller), seller)
    }

    #[tokio::test]
    async fn test_upsert_get_delete() {
        let store = MemoryCartStore::new();
        store.upsert(line("burger", "A")).await.unwrap();

        let saved = store.get(&ItemId::new("burger")).await.unwrap().unwrap();
        assert_eq!(saved.quantity, 1);

        store.delete(&ItemId::new("burger")).await.unwrap();
        assert!(store.get(&ItemId::new("burger")).await.unwrap().is_none());

        // Deleting again is fine
        store.delete(&ItemId::new("burger")).await.unwrap();
    }

    #[tokio::test]
    async fn test_observers_see_latest_snapshot() {
        let store = MemoryCartStore::new();
        let mut watch = store.observe();

        store.upsert(line("burger", "A")).await.unwrap();
        store.upsert(line("fries", "A")).await.unwrap();

        assert!(watch.has_changed().unwrap());
        let latest = watch.borrow_and_update().clone();
        assert_eq!(latest.len(), 2);
        assert!(!watch.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_seller_without_match_does_not_notify() {
        let store = MemoryCartStore::with_lines(vec![line("burger", "A")]);
        let mut watch = store.observe();
        watch.borrow_and_update();

        assert_eq!(store.delete_by_seller(&SellerId::new("B")).await.unwrap(), 0);
        assert!(!watch.has_changed().unwrap());

        assert_eq!(store.delete_by_seller(&SellerId::new("A")).await.unwrap(), 1);
        assert!(watch.has_changed().unwrap());
        assert!(store.snapshot().await.unwrap().is_empty());
    }
}
