use std::collections::BTreeMap;

use crate::domain::aggregate::Aggregate;
use super::commands::SelectionCommand;
use super::errors::CartError;
use super::events::SelectionEvent;
use super::value_objects::{CartLine, ItemId, MAX_ITEMS};

// ============================================================================
// Current Selection Aggregate - Transient staging area of one catalog visit
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSelection {
    lines: BTreeMap<ItemId, CartLine>,
    max_items: u32,
}

impl Default for CurrentSelection {
    fn default() -> Self {
        Self::with_capacity(MAX_ITEMS)
    }
}

impl CurrentSelection {
    /// Empty selection capped at `max_items` summed units
    pub fn with_capacity(max_items: u32) -> Self {
        Self {
            lines: BTreeMap::new(),
            max_items,
        }
    }

    pub fn max_items(&self) -> u32 {
        self.max_items
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.get(item_id)
    }

    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.lines.get(item_id).map_or(0, |line| line.quantity)
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Summed quantity over all lines; the cap is checked against this
    pub fn total_quantity(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn ensure_capacity(&self) -> Result<(), CartError> {
        if self.total_quantity() >= self.max_items {
            return Err(CartError::CapacityExceeded {
                limit: self.max_items,
            });
        }
        Ok(())
    }
}

impl Aggregate for CurrentSelection {
    type Event = SelectionEvent;
    type Command = SelectionCommand;
    type Error = CartError;

    fn apply_event(&mut self, event: &Self::Event) {
        match event {
            SelectionEvent::LineAdded(line) => {
                self.lines.insert(line.item_id().clone(), line.clone());
            }
            SelectionEvent::QuantityIncremented { item_id, quantity }
            | SelectionEvent::QuantityDecremented { item_id, quantity } => {
                if let Some(line) = self.lines.get_mut(item_id) {
                    line.quantity = *quantity;
                }
            }
            SelectionEvent::LineRemoved { item_id } => {
                self.lines.remove(item_id);
            }
            SelectionEvent::Cleared => {
                self.lines.clear();
            }
        }
    }

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SelectionCommand::Add { item, seller_id, seller_name } => {
                // First-add only: an existing line is left as is
                if self.lines.contains_key(&item.id) {
                    return Ok(vec![]);
                }
                self.ensure_capacity()?;

                Ok(vec![SelectionEvent::LineAdded(CartLine::new(
                    item.clone(),
                    seller_id.clone(),
                    seller_name.clone(),
                ))])
            }

            SelectionCommand::Increment { item_id } => {
                // Cap is checked before existence, matching the catalog screens
                self.ensure_capacity()?;

                Ok(self
                    .lines
                    .get(item_id)
                    .map(|line| SelectionEvent::QuantityIncremented {
                        item_id: item_id.clone(),
                        quantity: line.quantity + 1,
                    })
                    .into_iter()
                    .collect())
            }

            SelectionCommand::Decrement { item_id } => {
                let event = match self.lines.get(item_id) {
                    Some(line) if line.quantity > 1 => SelectionEvent::QuantityDecremented {
                        item_id: item_id.clone(),
                        quantity: line.quantity - 1,
                    },
                    Some(_) => SelectionEvent::LineRemoved {
                        item_id: item_id.clone(),
                    },
                    None => return Ok(vec![]),
                };
                Ok(vec![event])
            }

            SelectionCommand::Clear => Ok(vec![SelectionEvent::Cleared]),

            SelectionCommand::ReleaseSaved { lines } => Ok(lines
                .iter()
                .filter(|saved| self.lines.get(saved.item_id()) == Some(*saved))
                .map(|saved| SelectionEvent::LineRemoved {
                    item_id: saved.item_id().clone(),
                })
                .collect()),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
