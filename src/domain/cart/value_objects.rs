use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Cart Value Objects
// ============================================================================

/// Default cap on the summed quantity of the current selection
pub const MAX_ITEMS: u32 = 5;

/// Catalog category marking items that can be delivered right away
pub const CURRENT_MENU_CATEGORY: &str = "Current Menu";

/// Prefix of catalog categories for scheduled items, e.g. "Pre-order Friday"
pub const PRE_ORDER_PREFIX: &str = "Pre-order ";

/// Identifier of a menu item, unique within one seller's catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Restaurant or store identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(pub String);

impl SellerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry as delivered by the catalog collaborator.
///
/// The cart never mutates a `MenuItem`; lines hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub category: String,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            price,
            category: category.into(),
        }
    }

    pub fn availability(&self) -> ItemAvailability {
        ItemAvailability::from_category(&self.category)
    }
}

/// When an item can be fulfilled, derived from its category label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAvailability {
    Instant,
    PreOrder { slot: String },
    Unclassified,
}

impl ItemAvailability {
    pub fn from_category(category: &str) -> Self {
        if category == CURRENT_MENU_CATEGORY {
            ItemAvailability::Instant
        } else if let Some(slot) = category.strip_prefix(PRE_ORDER_PREFIX) {
            ItemAvailability::PreOrder {
                slot: slot.to_string(),
            }
        } else {
            ItemAvailability::Unclassified
        }
    }

    pub fn is_pre_order(&self) -> bool {
        matches!(self, ItemAvailability::PreOrder { .. })
    }
}

/// One item + quantity + seller record. Quantity is at least 1 while the line exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: Arc<MenuItem>,
    pub quantity: u32,
    pub seller_id: SellerId,
    pub seller_name: String,
}

impl CartLine {
    pub fn new(item: Arc<MenuItem>, seller_id: SellerId, seller_name: impl Into<String>) -> Self {
        Self {
            item,
            quantity: 1,
            seller_id,
            seller_name: seller_name.into(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item.id
    }

    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// How `save_selection_to_cart` treats a line already present in the saved cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMergePolicy {
    /// The selected line replaces the saved row
    #[default]
    Replace,
    /// Selected quantity is added to the saved quantity
    Accumulate,
}

impl SaveMergePolicy {
    /// Quantity to persist given the saved and the newly selected quantity
    pub fn merge(self, saved: Option<u32>, selected: u32) -> u32 {
        match (self, saved) {
            (SaveMergePolicy::Accumulate, Some(saved)) => saved.saturating_add(selected),
            _ => selected,
        }
    }
}

impl std::str::FromStr for SaveMergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(SaveMergePolicy::Replace),
            "accumulate" => Ok(SaveMergePolicy::Accumulate),
            other => Err(format!("unknown merge policy: {other}")),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
