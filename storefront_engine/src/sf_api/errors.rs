use thiserror::Error;

use crate::{checkout::EventFormatError, db_types::OrderStatusType, traits::StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    #[error("The checkout event is malformed. {0}")]
    MalformedEvent(#[from] EventFormatError),
    #[error("Shipping address {0} does not exist")]
    AddressNotFound(String),
    #[error("The cart refers to products that are not in the catalog: {}", .0.join(", "))]
    UnknownProducts(Vec<String>),
    #[error("Not enough stock for {product_id}. Requested {requested}, but only {available} available")]
    InsufficientStock { product_id: String, requested: i64, available: i64 },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl FulfillmentError {
    /// Whether the payment gateway should be asked to deliver the event again.
    ///
    /// Only a malformed event is final: redelivering it cannot change the outcome. Everything else depends on data
    /// that may yet appear (an address, a product, stock) or on the database recovering.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FulfillmentError::MalformedEvent(_))
    }
}

impl From<StoreError> for FulfillmentError {
    fn from(e: StoreError) -> Self {
        FulfillmentError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SellerApiError {
    #[error("Order #{0} does not exist")]
    OrderNotFound(i64),
    #[error("Order #{order_id} is already {status}")]
    StatusUnchanged { order_id: i64, status: OrderStatusType },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for SellerApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::OrderNotFound(id) => SellerApiError::OrderNotFound(id),
            e => SellerApiError::DatabaseError(e.to_string()),
        }
    }
}
