use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{watch, Mutex};

use crate::domain::cart::{CartLine, ItemId, SellerId};
use super::cart_store::{CartStore, SavedCart, SavedCartWatch, StoredCartRow, StoreError};

// ============================================================================
// JSON File Cart Store - Durable saved cart across restarts
// ============================================================================
//
// Responsibilities:
// 1. Load existing rows on open
// 2. Persist every mutation (temp file + rename) before publishing it
// 3. Serialize writers so snapshots are published in write order
//
// ============================================================================

pub struct JsonFileCartStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    state: watch::Sender<SavedCart>,
}

impl JsonFileCartStore {
    /// Open the store at `path`, loading rows if the file already exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let cart = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => SavedCart::default(),
            Ok(bytes) => {
                let rows: Vec<StoredCartRow> = serde_json::from_slice(&bytes)?;
                rows.into_iter().map(CartLine::from).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                SavedCart::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            saved_lines = cart.len(),
            "Opened saved cart store"
        );

        let (state, _) = watch::channel(cart);
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the current cart, persist it, then publish.
    ///
    /// Returns `None` without touching the file when `mutate` reports no change.
    async fn commit<T, F>(&self, mutate: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut SavedCart) -> Option<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut next = self.state.borrow().clone();
        let Some(outcome) = mutate(&mut next) else {
            return Ok(None);
        };

        self.persist(&next).await?;
        self.state.send_replace(next);
        Ok(Some(outcome))
    }

    async fn persist(&self, cart: &SavedCart) -> Result<(), StoreError> {
        let rows: Vec<StoredCartRow> = cart.lines().map(StoredCartRow::from).collect();
        let json = serde_json::to_vec_pretty(&rows)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await.inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to replace cart file");
        })?;

        tracing::debug!(
            path = %self.path.display(),
            rows = rows.len(),
            "Persisted saved cart"
        );
        Ok(())
    }
}

#[async_trait]
impl CartStore for JsonFileCartStore {
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
        self.commit(|cart| {
            cart.upsert(line);
            Some(())
        })
        .await?;
        Ok(())
    }

    async fn delete(&self, item_id: &ItemId) -> Result<(), StoreError> {
        self.commit(|cart| cart.remove(item_id)).await?;
        Ok(())
    }

    async fn delete_by_seller(&self, seller_id: &SellerId) -> Result<usize, StoreError> {
        let removed = self
            .commit(|cart| match cart.remove_seller(seller_id) {
                0 => None,
                n => Some(n),
            })
            .await?;
        Ok(removed.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use rust_decimal::Decimal;
    use crate::domain::cart::MenuItem;

    fn line(id: &str, seller: &str, quantity: u32) -> CartLine {
        let item = Arc::new(MenuItem::new(id, id, Decimal::new(799, 2), "Pre-order Monday"));
        CartLine::new(item, SellerId::new(seller), "Shop").with_quantity(quantity)
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::open(dir.path().join("nested/cart.json")).await.unwrap();

        assert!(store.snapshot().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        {
            let store = JsonFileCartStore::open(&path).await.unwrap();
            store.upsert(line("burger", "A", 3)).await.unwrap();
            store.upsert(line("pie", "B", 1)).await.unwrap();
            store.delete(&ItemId::new("pie")).await.unwrap();
        }

        let reopened = JsonFileCartStore::open(&path).await.unwrap();
        let cart = reopened.snapshot().await.unwrap();
        assert_eq!(cart.len(), 1);

        let burger = cart.get(&ItemId::new("burger")).unwrap();
        assert_eq!(burger.quantity, 3);
        assert_eq!(burger.item.price, Decimal::new(799, 2));
        assert!(burger.item.availability().is_pre_order());
    }

    #[tokio::test]
    async fn test_delete_by_seller_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let store = JsonFileCartStore::open(&path).await.unwrap();
        store.upsert(line("burger", "A", 1)).await.unwrap();
        store.upsert(line("fries", "A", 2)).await.unwrap();
        store.upsert(line("pie", "B", 1)).await.unwrap();

        assert_eq!(store.delete_by_seller(&SellerId::new("A")).await.unwrap(), 2);
        assert_eq!(store.delete_by_seller(&SellerId::new("A")).await.unwrap(), 0);

        let reopened = JsonFileCartStore::open(&path).await.unwrap();
        let cart = reopened.snapshot().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ItemId::new("pie")), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let result = JsonFileCartStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_failed_write_is_not_published() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carts/cart.json");
        let store = JsonFileCartStore::open(&path).await.unwrap();
        store.upsert(line("burger", "A", 1)).await.unwrap();

        let mut watch = store.observe();
        watch.borrow_and_update();
        tokio::fs::remove_dir_all(dir.path().join("carts")).await.unwrap();

        let result = store.upsert(line("pie", "B", 2)).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!watch.has_changed().unwrap());

        let cart = store.snapshot().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&ItemId::new("pie")).is_none());
    }

    #[tokio::test]
    async fn test_snapshot_published_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::open(dir.path().join("cart.json")).await.unwrap();
        let mut watch = store.observe();

        store.upsert(line("burger", "A", 2)).await.unwrap();

        assert!(watch.has_changed().unwrap());
        assert_eq!(watch.borrow_and_update().quantity_of(&ItemId::new("burger")), 2);
        assert!(store.path().exists());
    }
}
