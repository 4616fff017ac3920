// ============================================================================
// Actors Module
// ============================================================================
//
// Actor front-end for UI callers. The CartActor owns no state of its own; it
// serializes calls into the shared CartStateMachine.
//
// ============================================================================

mod cart_actor;

pub use cart_actor::*;
