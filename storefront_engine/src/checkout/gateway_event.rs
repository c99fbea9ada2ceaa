use std::collections::HashMap;

use log::trace;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    checkout::{CartLine, CartSnapshot, MAX_LINE_QUANTITY},
    db_types::{Money, SessionId},
};

/// The only event type that triggers order materialization.
pub const CHECKOUT_COMPLETED_EVENT: &str = "checkout.session.completed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventFormatError {
    #[error("The event envelope could not be parsed. {0}")]
    InvalidEnvelope(String),
    #[error("The checkout session is missing the '{0}' field")]
    MissingField(&'static str),
    #[error("The checkout session field '{field}' is invalid. {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A verified notification that a checkout session was paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    /// The gateway's id for this delivery, if it supplied one. Only used for logging.
    pub event_id: Option<String>,
    pub session_id: SessionId,
    /// Amount charged, in minor units
    pub amount_total: Money,
    pub buyer_id: String,
    pub address_id: String,
    pub cart: CartSnapshot,
}

/// Inbound webhook envelope, tagged by the gateway's event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    CheckoutCompleted(CompletionEvent),
    /// Any other event type. These are acknowledged without further processing.
    Ignored { event_type: String },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    object: Value,
}

#[derive(Deserialize)]
struct CheckoutSession {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl GatewayEvent {
    /// Parses the raw webhook body. The body must already have passed signature verification.
    pub fn from_slice(payload: &[u8]) -> Result<Self, EventFormatError> {
        let envelope: Envelope =
            serde_json::from_slice(payload).map_err(|e| EventFormatError::InvalidEnvelope(e.to_string()))?;
        trace!("📨️ Parsed event envelope of type {}", envelope.event_type);
        if envelope.event_type != CHECKOUT_COMPLETED_EVENT {
            return Ok(Self::Ignored { event_type: envelope.event_type });
        }
        let data = envelope.data.ok_or(EventFormatError::MissingField("data.object"))?;
        let session: CheckoutSession = serde_json::from_value(data.object)
            .map_err(|e| EventFormatError::InvalidField { field: "data.object", reason: e.to_string() })?;
        let event = CompletionEvent::try_from_session(envelope.id, session)?;
        Ok(Self::CheckoutCompleted(event))
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::CheckoutCompleted(_) => CHECKOUT_COMPLETED_EVENT,
            Self::Ignored { event_type } => event_type.as_str(),
        }
    }
}

impl CompletionEvent {
    fn try_from_session(event_id: Option<String>, mut session: CheckoutSession) -> Result<Self, EventFormatError> {
        let session_id = session.id.filter(|s| !s.is_empty()).ok_or(EventFormatError::MissingField("id"))?;
        let amount_total = session.amount_total.ok_or(EventFormatError::MissingField("amount_total"))?;
        if amount_total < 0 {
            return Err(EventFormatError::InvalidField {
                field: "amount_total",
                reason: format!("{amount_total} is negative"),
            });
        }
        let buyer_id = take_metadata(&mut session.metadata, &["buyerId", "userId"], "buyerId")?;
        let address_id = take_metadata(&mut session.metadata, &["addressId"], "addressId")?;
        let cart_items = take_metadata(&mut session.metadata, &["cartItems"], "cartItems")?;
        let cart = parse_cart(&cart_items)?;
        Ok(Self {
            event_id,
            session_id: SessionId(session_id),
            amount_total: Money::from(amount_total),
            buyer_id,
            address_id,
            cart,
        })
    }
}

fn take_metadata(
    metadata: &mut HashMap<String, String>,
    keys: &[&str],
    name: &'static str,
) -> Result<String, EventFormatError> {
    keys.iter()
        .filter_map(|k| metadata.remove(*k))
        .find(|v| !v.trim().is_empty())
        .ok_or(EventFormatError::MissingField(name))
}

fn parse_cart(cart_items: &str) -> Result<CartSnapshot, EventFormatError> {
    let lines: Vec<CartLine> = serde_json::from_str(cart_items)
        .map_err(|e| EventFormatError::InvalidField { field: "cartItems", reason: e.to_string() })?;
    let cart = CartSnapshot::new(lines);
    check_cart(&cart)?;
    Ok(cart)
}

/// Checks that a cart snapshot can be turned into an order: at least one line, no blank product ids, and a quantity
/// between 1 and [`MAX_LINE_QUANTITY`] for every product once duplicate lines are merged.
pub fn check_cart(cart: &CartSnapshot) -> Result<(), EventFormatError> {
    let invalid = |reason: String| EventFormatError::InvalidField { field: "cartItems", reason };
    let lines = cart.lines();
    if lines.is_empty() {
        return Err(invalid("the cart is empty".into()));
    }
    if let Some(line) = lines.iter().find(|l| l.product_id.trim().is_empty()) {
        return Err(invalid(format!("a cart line has an empty product id (quantity {})", line.quantity)));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
        return Err(invalid(format!("product {} has invalid quantity {}", line.product_id, line.quantity)));
    }
    if let Some(line) = cart.merged().lines().iter().find(|l| l.quantity > MAX_LINE_QUANTITY) {
        return Err(invalid(format!(
            "product {} has quantity {}, more than the maximum of {MAX_LINE_QUANTITY}",
            line.product_id, line.quantity
        )));
    }
    Ok(())
}
