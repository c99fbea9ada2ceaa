use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, types::Json, FromRow, Row, Type};
pub use storefront_common::Money;
use thiserror::Error;

//--------------------------------------       SessionId       ---------------------------------------------------------
/// The payment gateway's checkout session identifier. It is the idempotency key for orders: there is at most one
/// order per session id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl FromStr for SessionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// Payment has been received and the order is being prepared for shipping. Every order starts here.
    Preparing,
    /// The order has been handed over to the carrier.
    Shipped,
    /// The order has reached the buyer.
    Delivered,
    /// The order was cancelled by the seller.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Preparing => write!(f, "Preparing"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Delivered => write!(f, "Delivered"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Preparing");
            OrderStatusType::Preparing
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Preparing" => Ok(Self::Preparing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------   ShippingAddress     ---------------------------------------------------------
/// A buyer's shipping address. When an order is created, the address is *copied* into the order, so that later edits
/// to the address book do not change historical orders.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub id: String,
    pub buyer_id: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

//--------------------------------------        Product        ---------------------------------------------------------
/// The subset of the catalog entry that order fulfillment cares about.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub session_id: SessionId,
    pub buyer_id: String,
    /// The amount the payment gateway actually charged. This is authoritative and is never recomputed from the items.
    pub total_amount: Money,
    /// Snapshot of the shipping address at the time the order was placed.
    pub address: ShippingAddress,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Order {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let address: Json<ShippingAddress> = row.try_get("address")?;
        let status: String = row.try_get("status")?;
        let status = status.parse::<OrderStatusType>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: Box::new(e),
        })?;
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            buyer_id: row.try_get("buyer_id")?,
            total_amount: row.try_get("total_amount")?,
            address: address.0,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price read from the catalog when the order was materialized.
    pub price: Money,
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// The checkout session id as assigned by the payment gateway
    pub session_id: SessionId,
    pub buyer_id: String,
    /// The total charged by the payment gateway
    pub total_amount: Money,
    pub address: ShippingAddress,
    pub items: Vec<NewOrderItem>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(session_id: SessionId, buyer_id: String, total_amount: Money, address: ShippingAddress) -> Self {
        Self { session_id, buyer_id, total_amount, address, items: Vec::new(), created_at: Utc::now() }
    }

    pub fn with_item(mut self, item: NewOrderItem) -> Self {
        self.items.push(item);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: Money,
}

impl NewOrderItem {
    pub fn new<S: Into<String>>(product_id: S, quantity: i64, price: Money) -> Self {
        Self { product_id: product_id.into(), quantity, price }
    }
}

//--------------------------------------   InsertOrderResult   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    /// The order and all of its items were stored.
    Inserted(Order, Vec<OrderItem>),
    /// An order for this session id already exists. Nothing was written.
    AlreadyExists(SessionId),
}

//--------------------------------------     SellerOrder       ---------------------------------------------------------
/// An order with its line items, as shown in the seller panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<SellerOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SellerOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: String,
    /// `None` if the product has since been removed from the catalog
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price: Money,
}
