use crate::domain::cart::{CartError, SellerId};

// ============================================================================
// Order Assembly & Submission Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("No saved lines for seller: {0}")]
    SellerNotInCart(SellerId),

    #[error("Order submission failed: {0}")]
    Submission(#[source] anyhow::Error),

    #[error(transparent)]
    Cart(#[from] CartError),
}
