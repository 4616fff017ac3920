// ============================================================================
// Order Domain - Assembling and submitting orders from the saved cart
// ============================================================================
//
// - Value objects (OrderKind, OrderLine)
// - Errors (OrderError enum)
// - Draft (OrderDraft built from one seller's saved lines)
// - Checkout (submission boundary + seller clear)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod draft;
pub mod checkout;

pub use value_objects::*;
pub use errors::*;
pub use draft::*;
pub use checkout::*;
