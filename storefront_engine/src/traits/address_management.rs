use crate::{db_types::ShippingAddress, traits::StoreError};

#[allow(async_fn_in_trait)]
pub trait AddressManagement {
    /// Fetches the address with the given id. Returns `None` if no such address exists.
    async fn fetch_address(&self, address_id: &str) -> Result<Option<ShippingAddress>, StoreError>;
}
