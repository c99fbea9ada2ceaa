use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::{CartLine, CartSnapshot, MAX_LINE_QUANTITY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutRequestError {
    #[error("Missing parameters: the cart, buyer id and address id are all required.")]
    MissingParameters,
    #[error("Product {0} has an invalid quantity.")]
    InvalidQuantity(String),
}

/// The product as the front end knows it. Anything beyond the id is ignored when building the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutProduct {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product: CheckoutProduct,
    pub quantity: i64,
}

/// Body of a "start checkout" request from the storefront front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Option<Vec<CheckoutItem>>,
    #[serde(default, alias = "userId")]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub address_id: Option<String>,
}

/// The metadata bag that is attached to the hosted payment session, and which comes back to us in the completion
/// webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutMetadata {
    pub buyer_id: String,
    pub address_id: String,
    /// JSON-serialised [`CartSnapshot`]
    pub cart_items: String,
}

impl TryFrom<CheckoutRequest> for CheckoutMetadata {
    type Error = CheckoutRequestError;

    fn try_from(request: CheckoutRequest) -> Result<Self, Self::Error> {
        let CheckoutRequest { items, buyer_id, address_id } = request;
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        let (Some(items), Some(buyer_id), Some(address_id)) = (items, non_empty(buyer_id), non_empty(address_id))
        else {
            return Err(CheckoutRequestError::MissingParameters);
        };
        if items.is_empty() {
            return Err(CheckoutRequestError::MissingParameters);
        }
        if let Some(item) = items.iter().find(|i| i.quantity < 1) {
            return Err(CheckoutRequestError::InvalidQuantity(item.product.id.clone()));
        }
        let snapshot = items.into_iter().map(|i| CartLine::new(i.product.id, i.quantity)).collect::<CartSnapshot>();
        if let Some(line) = snapshot.merged().lines().iter().find(|l| l.quantity > MAX_LINE_QUANTITY) {
            return Err(CheckoutRequestError::InvalidQuantity(line.product_id.clone()));
        }
        Ok(Self::new(buyer_id, address_id, &snapshot))
    }
}

impl CheckoutMetadata {
    pub fn new(buyer_id: String, address_id: String, cart: &CartSnapshot) -> Self {
        Self { buyer_id, address_id, cart_items: cart.to_metadata_string() }
    }

    /// The flat string map the payment gateway expects for session metadata.
    pub fn to_metadata_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("buyerId".to_string(), self.buyer_id.clone()),
            ("addressId".to_string(), self.address_id.clone()),
            ("cartItems".to_string(), self.cart_items.clone()),
        ])
    }
}
