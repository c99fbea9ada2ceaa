use serde::{Deserialize, Serialize};

/// The largest quantity of a single product that one order may contain.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// One line of the cart as captured at checkout time. Only identity and quantity are captured; prices are always
/// re-read from the catalog when the order is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

impl CartLine {
    pub fn new<S: Into<String>>(product_id: S, quantity: i64) -> Self {
        Self { product_id: product_id.into(), quantity }
    }
}

/// The cart as it was when the buyer started checkout. It travels inside the payment session metadata, so later
/// changes to the live cart cannot affect a paid order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot(Vec<CartLine>);

impl CartSnapshot {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self(lines)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    /// Collapses repeated product ids into a single line, summing their quantities. The order in which products were
    /// first seen is preserved. Sums that do not fit in an `i64` saturate, so they always exceed [`MAX_LINE_QUANTITY`].
    pub fn merged(&self) -> Self {
        let mut result: Vec<CartLine> = Vec::with_capacity(self.0.len());
        for line in &self.0 {
            match result.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(line.quantity).unwrap_or(i64::MAX);
                },
                None => result.push(line.clone()),
            }
        }
        Self(result)
    }

    /// The distinct product ids referenced by the snapshot, in first-seen order.
    pub fn product_ids(&self) -> Vec<String> {
        self.merged().0.into_iter().map(|l| l.product_id).collect()
    }

    /// The metadata representation of the snapshot, i.e. `[{"productId":"p1","quantity":2}]`
    pub fn to_metadata_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FromIterator<CartLine> for CartSnapshot {
    fn from_iter<T: IntoIterator<Item = CartLine>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
