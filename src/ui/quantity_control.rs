// ============================================================================
// Quantity Control - Add button / stepper shared by every catalog and cart row
// ============================================================================
//
// Holds no cart state. The caller passes the quantity it observed and the
// callbacks that mutate whichever cart the row belongs to.
//
// ============================================================================

/// What the control shows for the current quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityView {
    /// Nothing selected yet
    Add,
    Stepper { quantity: u32 },
    Disabled { quantity: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAction {
    Add,
    Increment,
    Decrement,
}

pub struct QuantityControl<'a> {
    quantity: u32,
    enabled: bool,
    on_add: Box<dyn FnMut() + 'a>,
    on_increment: Box<dyn FnMut() + 'a>,
    on_decrement: Box<dyn FnMut() + 'a>,
}

impl<'a> QuantityControl<'a> {
    pub fn new(
        quantity: u32,
        on_add: impl FnMut() + 'a,
        on_increment: impl FnMut() + 'a,
        on_decrement: impl FnMut() + 'a,
    ) -> Self {
        Self {
            quantity,
            enabled: true,
            on_add: Box::new(on_add),
            on_increment: Box::new(on_increment),
            on_decrement: Box::new(on_decrement),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn view(&self) -> QuantityView {
        match (self.enabled, self.quantity) {
            (false, quantity) => QuantityView::Disabled { quantity },
            (true, 0) => QuantityView::Add,
            (true, quantity) => QuantityView::Stepper { quantity },
        }
    }

    /// Run the callback for `action` if the current view offers it.
    ///
    /// Returns whether a callback ran.
    pub fn press(&mut self, action: QuantityAction) -> bool {
        let callback = match (self.view(), action) {
            (QuantityView::Add, QuantityAction::Add) => &mut self.on_add,
            (QuantityView::Stepper { .. }, QuantityAction::Increment) => &mut self.on_increment,
            (QuantityView::Stepper { .. }, QuantityAction::Decrement) => &mut self.on_decrement,
            _ => return false,
        };
        callback();
        true
    }
}

impl std::fmt::Debug for QuantityControl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantityControl")
            .field("quantity", &self.quantity)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
