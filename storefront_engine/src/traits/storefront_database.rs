use thiserror::Error;

use crate::traits::{AddressManagement, CartManagement, OrderManagement, ProductCatalog};

/// This trait defines the complete behaviour of a storefront backend.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase: Clone + AddressManagement + OrderManagement + ProductCatalog + CartManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderNotFound(i64),
    #[error("The requested product {0} does not exist")]
    ProductNotFound(String),
    #[error("Stored data could not be decoded. {0}")]
    DataError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}
