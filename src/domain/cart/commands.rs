use std::sync::Arc;

use super::value_objects::{CartLine, ItemId, MenuItem, SellerId};

// ============================================================================
// Selection Commands - Represent user intent on the catalog screen
// ============================================================================

#[derive(Debug, Clone)]
pub enum SelectionCommand {
    Add {
        item: Arc<MenuItem>,
        seller_id: SellerId,
        seller_name: String,
    },
    Increment {
        item_id: ItemId,
    },
    Decrement {
        item_id: ItemId,
    },
    Clear,
    /// Drop lines that were saved, unless they changed since
    ReleaseSaved {
        lines: Vec<CartLine>,
    },
}

impl SelectionCommand {
    /// Item the command targets, if any
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            SelectionCommand::Add { item, .. } => Some(&item.id),
            SelectionCommand::Increment { item_id } | SelectionCommand::Decrement { item_id } => Some(item_id),
            SelectionCommand::Clear | SelectionCommand::ReleaseSaved { .. } => None,
        }
    }

    /// Short operation name used for logs and metric labels
    pub fn operation(&self) -> &'static str {
        match self {
            SelectionCommand::Add { .. } => "add",
            SelectionCommand::Increment { .. } => "increment",
            SelectionCommand::Decrement { .. } => "decrement",
            SelectionCommand::Clear => "clear",
            SelectionCommand::ReleaseSaved { .. } => "release_saved",
        }
    }
}
