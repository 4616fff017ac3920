use std::sync::Arc;

use actix::prelude::*;

use crate::domain::cart::{CartError, CartStateMachine, CurrentSelection, ItemId, MenuItem, SellerId};
use crate::store::SavedCart;

// ============================================================================
// Actor Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<(), CartError>")]
pub struct AddToSelection {
    pub item: Arc<MenuItem>,
    pub seller_id: SellerId,
    pub seller_name: String,
}

#[derive(Message)]
#[rtype(result = "Result<(), CartError>")]
pub struct IncrementSelection {
    pub item_id: ItemId,
}

#[derive(Message)]
#[rtype(result = "Result<(), CartError>")]
pub struct DecrementSelection {
    pub item_id: ItemId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ClearSelection;

#[derive(Message)]
#[rtype(result = "CurrentSelection")]
pub struct GetSelection;

#[derive(Message)]
#[rtype(result = "Result<usize, CartError>")]
pub struct SaveSelection;

#[derive(Message)]
#[rtype(result = "Result<(), CartError>")]
pub struct IncrementSavedItem {
    pub item_id: ItemId,
}

#[derive(Message)]
#[rtype(result = "Result<(), CartError>")]
pub struct DecrementSavedItem {
    pub item_id: ItemId,
}

#[derive(Message)]
#[rtype(result = "Result<usize, CartError>")]
pub struct ClearCartForRestaurant {
    pub seller_id: SellerId,
}

#[derive(Message)]
#[rtype(result = "Result<SavedCart, CartError>")]
pub struct GetSavedCart;

// ============================================================================
// Cart Actor - Single writer in front of the cart state machine
// ============================================================================
//
// Saved-cart handlers use AtomicResponse: the mailbox is not polled until the
// store call finishes, so every message observes the effects of the previous one.
//
// ============================================================================

pub struct CartActor {
    cart: Arc<CartStateMachine>,
}

impl CartActor {
    pub fn new(cart: Arc<CartStateMachine>) -> Self {
        Self { cart }
    }
}

impl Actor for CartActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("CartActor started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("CartActor stopped");
    }
}

// ============================================================================
// Selection Handlers
// ============================================================================

impl Handler<AddToSelection> for CartActor {
    type Result = Result<(), CartError>;

    fn handle(&mut self, msg: AddToSelection, _: &mut Self::Context) -> Self::Result {
        self.cart.add_to_selection(msg.item, msg.seller_id, msg.seller_name)
    }
}

impl Handler<IncrementSelection> for CartActor {
    type Result = Result<(), CartError>;

    fn handle(&mut self, msg: IncrementSelection, _: &mut Self::Context) -> Self::Result {
        self.cart.increment_selection(&msg.item_id)
    }
}

impl Handler<DecrementSelection> for CartActor {
    type Result = Result<(), CartError>;

    fn handle(&mut self, msg: DecrementSelection, _: &mut Self::Context) -> Self::Result {
        self.cart.decrement_selection(&msg.item_id)
    }
}

impl Handler<ClearSelection> for CartActor {
    type Result = ();

    fn handle(&mut self, _: ClearSelection, _: &mut Self::Context) -> Self::Result {
        self.cart.clear_selection();
    }
}

impl Handler<GetSelection> for CartActor {
    type Result = MessageResult<GetSelection>;

    fn handle(&mut self, _: GetSelection, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.cart.selection())
    }
}

// ============================================================================
// Saved Cart Handlers
// ============================================================================

impl Handler<SaveSelection> for CartActor {
    type Result = AtomicResponse<Self, Result<usize, CartError>>;

    fn handle(&mut self, _: SaveSelection, _: &mut Self::Context) -> Self::Result {
        let cart = self.cart.clone();
        AtomicResponse::new(Box::pin(
            async move { cart.save_selection_to_cart().await }.into_actor(self),
        ))
    }
}

impl Handler<IncrementSavedItem> for CartActor {
    type Result = AtomicResponse<Self, Result<(), CartError>>;

    fn handle(&mut self, msg: IncrementSavedItem, _: &mut Self::Context) -> Self::Result {
        let cart = self.cart.clone();
        AtomicResponse::new(Box::pin(
            async move { cart.increment_saved_item(&msg.item_id).await }.into_actor(self),
        ))
    }
}

impl Handler<DecrementSavedItem> for CartActor {
    type Result = AtomicResponse<Self, Result<(), CartError>>;

    fn handle(&mut self, msg: DecrementSavedItem, _: &mut Self::Context) -> Self::Result {
        let cart = self.cart.clone();
        AtomicResponse::new(Box::pin(
            async move { cart.decrement_saved_item(&msg.item_id).await }.into_actor(self),
        ))
    }
}

impl Handler<ClearCartForRestaurant> for CartActor {
    type Result = AtomicResponse<Self, Result<usize, CartError>>;

    fn handle(&mut self, msg: ClearCartForRestaurant, _: &mut Self::Context) -> Self::Result {
        let cart = self.cart.clone();
        AtomicResponse::new(Box::pin(
            async move { cart.clear_cart_for_restaurant(&msg.seller_id).await }.into_actor(self),
        ))
    }
}

impl Handler<GetSavedCart> for CartActor {
    type Result = AtomicResponse<Self, Result<SavedCart, CartError>>;

    fn handle(&mut self, _: GetSavedCart, _: &mut Self::Context) -> Self::Result {
        let cart = self.cart.clone();
        AtomicResponse::new(Box::pin(async move { cart.saved_cart().await }.into_actor(self)))
    }
}
