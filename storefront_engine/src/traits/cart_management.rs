use crate::traits::StoreError;

/// The live cart is the buyer's working copy. It is independent of the cart snapshot that travels with a checkout
/// session.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Removes every line from the buyer's cart and returns the number of lines removed.
    async fn clear_cart(&self, buyer_id: &str) -> Result<u64, StoreError>;
}
