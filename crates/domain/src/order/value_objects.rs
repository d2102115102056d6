//! Value objects for the order domain.

use serde::{Deserialize, Serialize};

/// An amount in cents. Prices, totals and revenue all use it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Price of `quantity` portions, saturating at the `i64` bounds.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    pub fn checked_times(&self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

/// Highest accepted price per portion ($1,000,000).
pub const MAX_PRICE: Money = Money(100_000_000);

/// Highest accepted quantity on one order line.
pub const MAX_QUANTITY: u32 = 9_999;

/// Highest accepted order total ($10,000,000).
pub const MAX_TOTAL: Money = Money(1_000_000_000);

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Dish or drink name.
    pub name: String,

    /// Portions ordered, at least 1.
    pub quantity: u32,

    /// Price per portion, never negative.
    pub price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(name: impl Into<String>, quantity: u32, price: Money) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Returns quantity times price.
    pub fn subtotal(&self) -> Money {
        self.price.times(self.quantity)
    }
}
