use super::value_objects::{CartLine, ItemId};

// ============================================================================
// Selection Events - Facts produced by validated selection commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    LineAdded(CartLine),
    QuantityIncremented { item_id: ItemId, quantity: u32 },
    QuantityDecremented { item_id: ItemId, quantity: u32 },
    LineRemoved { item_id: ItemId },
    Cleared,
}

impl SelectionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SelectionEvent::LineAdded(_) => "LineAdded",
            SelectionEvent::QuantityIncremented { .. } => "QuantityIncremented",
            SelectionEvent::QuantityDecremented { .. } => "QuantityDecremented",
            SelectionEvent::LineRemoved { .. } => "LineRemoved",
            SelectionEvent::Cleared => "Cleared",
        }
    }
}
