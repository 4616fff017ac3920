// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// - aggregate: command -> events -> state pattern shared by aggregates
// - cart:      selection aggregate, saved cart operations
// - order:     order assembly from the saved cart and submission boundary
//
// ============================================================================

pub mod aggregate;
pub mod cart;
pub mod order;
