use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::domain::cart::{CartLine, ItemId, MenuItem, SellerId};

// ============================================================================
// Durable Cart Store - Contract for saved-cart persistence
// ============================================================================
//
// Rows are keyed by item id. Every mutating call returns once the change is
// durable for the implementation, and only then publishes a new snapshot.
// Observers see the latest snapshot only.
//
// ============================================================================

/// Latest-value stream of the saved cart
pub type SavedCartWatch = watch::Receiver<SavedCart>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Subscribe to saved-cart snapshots
    fn observe(&self) -> SavedCartWatch;

    /// Read all rows
    async fn snapshot(&self) -> Result<SavedCart, StoreError>;

    /// Read one row by item id
    async fn get(&self, item_id: &ItemId) -> Result<Option<CartLine>, StoreError>;

    /// Insert or replace the row keyed by the line's item id
    async fn upsert(&self, line: CartLine) -> Result<(), StoreError>;

    /// Delete one row; deleting an absent row is not an error
    async fn delete(&self, item_id: &ItemId) -> Result<(), StoreError>;

    /// Delete every row of a seller, returning how many were removed
    async fn delete_by_seller(&self, seller_id: &SellerId) -> Result<usize, StoreError>;
}

// ============================================================================
// Saved Cart Snapshot
// ============================================================================

/// Immutable view of the saved cart at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedCart {
    lines: BTreeMap<ItemId, CartLine>,
}

impl SavedCart {
    pub fn get(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.get(item_id)
    }

    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.lines.get(item_id).map_or(0, |line| line.quantity)
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Lines belonging to one seller, in item id order
    pub fn for_seller<'a>(&'a self, seller_id: &'a SellerId) -> impl Iterator<Item = &'a CartLine> + 'a {
        self.lines.values().filter(move |line| &line.seller_id == seller_id)
    }

    /// Distinct sellers with at least one saved line
    pub fn sellers(&self) -> Vec<(SellerId, String)> {
        let mut sellers: BTreeMap<SellerId, String> = BTreeMap::new();
        for line in self.lines.values() {
            sellers
                .entry(line.seller_id.clone())
                .or_insert_with(|| line.seller_name.clone());
        }
        sellers.into_iter().collect()
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.values().map(CartLine::line_total).sum()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn upsert(&mut self, line: CartLine) {
        self.lines.insert(line.item_id().clone(), line);
    }

    pub(crate) fn remove(&mut self, item_id: &ItemId) -> Option<CartLine> {
        self.lines.remove(item_id)
    }

    pub(crate) fn remove_seller(&mut self, seller_id: &SellerId) -> usize {
        let before = self.lines.len();
        self.lines.retain(|_, line| &line.seller_id != seller_id);
        before - self.lines.len()
    }
}

impl FromIterator<CartLine> for SavedCart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = SavedCart::default();
        for line in iter {
            cart.upsert(line);
        }
        cart
    }
}

// ============================================================================
// Stored Row - Serialized form of a saved line
// ============================================================================

/// Saved line as written to durable storage.
///
/// The full menu item is kept so the cart can be restored without the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCartRow {
    pub item: MenuItem,
    pub quantity: u32,
    pub seller_id: SellerId,
    pub seller_name: String,
}

impl From<&CartLine> for StoredCartRow {
    fn from(line: &CartLine) -> Self {
        Self {
            item: (*line.item).clone(),
            quantity: line.quantity,
            seller_id: line.seller_id.clone(),
            seller_name: line.seller_name.clone(),
        }
    }
}

impl From<StoredCartRow> for CartLine {
    fn from(row: StoredCartRow) -> Self {
        CartLine {
            item: Arc::new(row.item),
            quantity: row.quantity,
            seller_id: row.seller_id,
            seller_name: row.seller_name,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, seller: &str, quantity: u32) -> CartLine {
        let item = Arc::new(MenuItem::new(id, id, Decimal::new(250, 2), "Current Menu"));
        CartLine::new(item, SellerId::new(seller), format!("{seller} shop")).with_quantity(quantity)
    }

    #[test]
    fn test_saved_cart_queries() {
        let cart: SavedCart = vec![line("burger", "A", 2), line("soda", "A", 1), line("pie", "B", 3)]
            .into_iter()
            .collect();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_quantity(), 6);
        assert_eq!(cart.subtotal(), Decimal::new(1500, 2));
        assert_eq!(cart.for_seller(&SellerId::new("A")).count(), 2);
        assert_eq!(
            cart.sellers(),
            vec![
                (SellerId::new("A"), "A shop".to_string()),
                (SellerId::new("B"), "B shop".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_seller_only_touches_that_seller() {
        let mut cart: SavedCart = vec![line("burger", "A", 2), line("pie", "B", 3)]
            .into_iter()
            .collect();

        assert_eq!(cart.remove_seller(&SellerId::new("A")), 1);
        assert_eq!(cart.quantity_of(&ItemId::new("pie")), 3);
        assert!(cart.get(&ItemId::new("burger")).is_none());
        assert_eq!(cart.remove_seller(&SellerId::new("C")), 0);
    }

    #[test]
    fn test_upsert_replaces_by_item_id() {
        let mut cart = SavedCart::default();
        cart.upsert(line("burger", "A", 3));
        cart.upsert(line("burger", "A", 1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ItemId::new("burger")), 1);
    }

    #[test]
    fn test_stored_row_conversion() {
        let original = line("burger", "A", 2);
        let row = StoredCartRow::from(&original);
        let json = serde_json::to_string(&row).unwrap();
        let restored: CartLine = serde_json::from_str::<StoredCartRow>(&json).unwrap().into();

        assert_eq!(restored, original);
    }
}
