use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;

//--------------------------------------        Money         ---------------------------------------------------------
/// An amount of money in the smallest unit of the store currency (e.g. cents or kuruş).
///
/// Amounts are always integers. The payment gateway reports totals in minor units, and catalog prices are stored the
/// same way, so no floating point ever touches a price.
///
/// Quantities and amounts arrive from outside the process, so arithmetic is only offered in checked form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Money(i64);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// `None` if the sum does not fit.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// The amount for `quantity` units at this price. `None` if the result does not fit.
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Self)
    }
}
