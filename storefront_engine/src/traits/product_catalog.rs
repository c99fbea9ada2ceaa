use crate::{db_types::Product, traits::StoreError};

#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Fetches all the products with the given ids in a single read. Ids that do not exist are simply absent from the
    /// result; it is up to the caller to decide whether that is an error.
    async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, StoreError>;

    /// Reduces the stock of the product by `quantity`, never going below zero. The subtraction must happen in the
    /// data layer (not read-modify-write in the application) so that concurrent decrements are not lost.
    ///
    /// Returns the new stock level.
    async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<i64, StoreError>;
}
