//! # Money Module
//!
//! Provides the `Price` type for catalog prices and cart totals.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With f64:                                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Catalog prices arrive as JSON numbers (109.95, 22.3, 7.95).            │
//! │  We parse them into a base-10 Decimal once, at the wire boundary,       │
//! │  and keep full precision in every store.                                │
//! │                                                                         │
//! │  Rounding to 2 places happens ONLY when a value is shown:               │
//! │    stored: 1.005   ──► displayed: $1.01                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Price;
//!
//! let price = Price::from_cents(999); // $9.99
//! let total: Price = [price, price].into_iter().sum();
//! assert_eq!(total, Price::from_cents(1998));
//! assert_eq!(total.to_string(), "$19.98");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::DISPLAY_DECIMALS;

// =============================================================================
// Price Type
// =============================================================================

/// A monetary amount in the catalog's currency, in major units (dollars).
///
/// On the wire a price is a JSON number; in memory it is a `Decimal` so that
/// sums are exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Largest representable amount. Sums saturate here.
    pub const MAX: Price = Price(Decimal::MAX);

    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Price(amount)
    }

    /// Creates a price from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use storefront_core::money::Price;
    ///
    /// assert_eq!(Price::from_cents(1099).to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Price(Decimal::new(cents, 2))
    }

    /// Returns the underlying full-precision amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns a zero price.
    #[inline]
    pub const fn zero() -> Self {
        Price(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to `decimals` places, half away from zero.
    ///
    /// This is a presentation-boundary operation; stores keep the unrounded
    /// value.
    ///
    /// ```rust
    /// use storefront_core::money::Price;
    ///
    /// let price: Price = "1.005".parse().unwrap();
    /// assert_eq!(price.rounded(2), "1.01".parse::<Price>().unwrap());
    /// ```
    pub fn rounded(&self, decimals: u32) -> Price {
        Price(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the price rounded to [`DISPLAY_DECIMALS`] with a `$` symbol.
///
/// ## Note
/// For the configured currency symbol use `StorefrontConfig::format_price`
/// in storefront-state.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded(DISPLAY_DECIMALS).0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}${:.prec$}",
            sign,
            rounded.abs(),
            prec = DISPLAY_DECIMALS as usize
        )
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Price)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Price(amount)
    }
}

impl Add for Price {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Price(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Price {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
