// ============================================================================
// Saved Cart Persistence
// ============================================================================
//
// `CartStore` is the contract the cart state machine depends on.
// - MemoryCartStore   - process-lifetime store, used when no path is configured
// - JsonFileCartStore - durable store backed by a JSON file
//
// ============================================================================

mod cart_store;
mod json_file;
mod memory;

#[cfg(test)]
pub(crate) mod testing;

pub use cart_store::{CartStore, SavedCart, SavedCartWatch, StoreError, StoredCartRow};
pub use json_file::JsonFileCartStore;
pub use memory::MemoryCartStore;
