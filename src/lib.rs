// ============================================================================
// Grocery Cart Core
// ============================================================================
//
// Cart state for a food/grocery ordering client:
// - domain:  selection aggregate, cart state machine, order assembly
// - store:   durable saved-cart contract and implementations
// - actors:  actor front-end serializing UI calls
// - ui:      reusable quantity control
// - config / metrics: ambient runtime settings and Prometheus metrics
//
// ============================================================================

pub mod actors;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod store;
pub mod ui;

pub use config::CartConfig;
pub use domain::cart::{CartError, CartLine, CartNotice, CartStateMachine, ItemId, MenuItem, SellerId};
pub use domain::order::{Checkout, OrderDraft, OrderError, OrderKind, OrderReceipt, OrderSubmitter};
pub use store::{CartStore, JsonFileCartStore, MemoryCartStore, SavedCart};
