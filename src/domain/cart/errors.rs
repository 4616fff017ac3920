use crate::store::StoreError;

// ============================================================================
// Cart Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Recoverable rejection: the selection already holds `limit` units
    #[error("Selection is limited to {limit} items")]
    CapacityExceeded { limit: u32 },

    #[error("Cart store failure: {0}")]
    Store(#[from] StoreError),
}

impl CartError {
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, CartError::CapacityExceeded { .. })
    }
}
