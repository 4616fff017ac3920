// ============================================================================
// Cart Domain - Current selection and saved cart
// ============================================================================
//
// - Value objects (MenuItem, CartLine, ids, merge policy)
// - Commands and events of the selection aggregate
// - Errors (CartError enum)
// - Selection aggregate (CurrentSelection)
// - State machine tying the selection to the durable saved cart
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod events;
pub mod errors;
pub mod selection;
pub mod state_machine;

pub use value_objects::*;
pub use commands::*;
pub use events::*;
pub use errors::*;
pub use selection::*;
pub use state_machine::*;
