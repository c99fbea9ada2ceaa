use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderItem, SessionId};

/// What happened to a payment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// First sight of this checkout session. The order and its items were stored.
    Created(Order, Vec<OrderItem>),
    /// An order for this checkout session already exists. Nothing was changed.
    AlreadyProcessed(SessionId),
    /// The event is not a checkout completion. Carries the event type.
    Ignored(String),
}

impl FulfillmentOutcome {
    pub fn order(&self) -> Option<&Order> {
        match self {
            FulfillmentOutcome::Created(order, _) => Some(order),
            _ => None,
        }
    }
}

/// What to do when a paid cart asks for more than is in stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockPolicy {
    /// Create the order anyway. Stock is floored at zero and the seller sorts out the shortfall. The buyer has
    /// already paid, so this is the default.
    #[default]
    AllowOversell,
    /// Refuse to create the order. The notification is answered with a retryable failure.
    RejectOversell,
}

impl Display for StockPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockPolicy::AllowOversell => write!(f, "allow"),
            StockPolicy::RejectOversell => write!(f, "reject"),
        }
    }
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" | "allow_oversell" => Ok(StockPolicy::AllowOversell),
            "reject" | "reject_oversell" => Ok(StockPolicy::RejectOversell),
            other => Err(format!("Unknown oversell policy: {other}")),
        }
    }
}
