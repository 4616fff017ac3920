use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::cart::{CartLine, ItemId, SellerId};
use super::{CartStore, MemoryCartStore, SavedCart, SavedCartWatch, StoreError};

fn unavailable() -> StoreError {
    StoreError::Unavailable("disk full".to_string())
}

/// Store with switchable failures on top of the in-memory store.
///
/// Snapshots always succeed so tests can check what was left behind.
pub(crate) struct FlakyStore {
    inner: MemoryCartStore,
    upserts_left: AtomicUsize,
    unavailable: AtomicBool,
    deletes_fail: AtomicBool,
}

impl FlakyStore {
    /// Fails every upsert after `successful_upserts` have gone through
    pub(crate) fn failing_after(successful_upserts: usize) -> Self {
        Self {
            inner: MemoryCartStore::new(),
            upserts_left: AtomicUsize::new(successful_upserts),
            unavailable: AtomicBool::new(false),
            deletes_fail: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        Self {
            inner: MemoryCartStore::with_lines(lines),
            upserts_left: AtomicUsize::new(usize::MAX),
            unavailable: AtomicBool::new(false),
            deletes_fail: AtomicBool::new(false),
        }
    }

    /// Fail reads of single rows and every mutation
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.deletes_fail.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn check_delete(&self) -> Result<(), StoreError> {
        self.check_available()?;
        if self.deletes_fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl CartStore for FlakyStore {
    fn observe(&self) -> SavedCartWatch {
        self.inner.observe()
    }

    async fn snapshot(&self) -> Result<SavedCart, StoreError> {
        self.inner.snapshot().await
    }

    async fn get(&self, item_id: &ItemId) -> Result<Option<CartLine>, StoreError> {
        self.check_available()?;
        self.inner.get(item_id).await
    }

    async fn upsert(&self, line: CartLine) -> Result<(), StoreError> {
        self.check_available()?;
        let allowed = self
            .upserts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(unavailable());
        }
        self.inner.upsert(line).await
    }

    async fn delete(&self, item_id: &ItemId) -> Result<(), StoreError> {
        self.check_delete()?;
        self.inner.delete(item_id).await
    }

    async fn delete_by_seller(&self, seller_id: &SellerId) -> Result<usize, StoreError> {
        self.check_delete()?;
        self.inner.delete_by_seller(seller_id).await
    }
}

/// Store whose upserts wait until the test releases them
pub(crate) struct GatedStore {
    inner: MemoryCartStore,
    started: Notify,
    gate: Notify,
}

impl GatedStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryCartStore::new(),
            started: Notify::new(),
            gate: Notify::new(),
        }
    }

    /// Resolves once an upsert is parked on the gate
    pub(crate) async fn upsert_started(&self) {
        self.started.notified().await;
    }

    /// Let one parked upsert through
    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CartStore for GatedStore {
    fn observe(&self) -> SavedCartWatch {
        self.inner.observe()
    }

    async fn snapshot(&self) -> Result<SavedCart, StoreError> {
        self.inner.snapshot().await
    }

    async fn get(&self, item_id: &ItemId) -> Result<Option<CartLine>, StoreError> {
        self.inner.get(item_id).await
    }

    async fn upsert(&self, line: CartLine) -> Result<(), StoreError> {
        self.started.notify_one();
        self.gate.notified().await;
        self.inner.upsert(line).await
    }

    async fn delete(&self, item_id: &ItemId) -> Result<(), StoreError> {
        self.inner.delete(item_id).await
    }

    async fn delete_by_seller(&self, seller_id: &SellerId) -> Result<usize, StoreError> {
        self.inner.delete_by_seller(seller_id).await
    }
}
