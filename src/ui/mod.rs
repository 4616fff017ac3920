pub mod quantity_control;

pub use quantity_control::{QuantityAction, QuantityControl, QuantityView};
