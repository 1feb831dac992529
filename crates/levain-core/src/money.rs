//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All monetary values in Levain are integer **cents** (the smallest currency
//! unit). The database, the cart, checkout totals, and the reports all move
//! cents around; only display code renders a decimal point. Floating point
//! never touches an amount.
//!
//! ## Usage
//! ```rust
//! use levain_core::money::Money;
//!
//! // Create from cents (the only constructor from raw amounts)
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_cents(500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that intermediate arithmetic (tendered − total, subtotal −
/// discount) can go negative before being floored by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use levain_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion (the part before the decimal point).
    #[inline]
    pub const fn major_units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99, sign dropped).
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use levain_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Divides by a positive integer, rounding half away from zero.
    ///
    /// Used for per-unit averages (revenue ÷ quantity). Integer math
    /// throughout; widened to i128 so large revenues cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use levain_core::money::Money;
    ///
    /// // 10.00 over 3 units: 3.33 each (the lost cent is explicit)
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// // 1.25 over 2 units rounds up to 0.63
    /// assert_eq!(Money::from_cents(125).divide_rounded(2).cents(), 63);
    /// ```
    pub fn divide_rounded(&self, divisor: i64) -> Money {
        debug_assert!(divisor > 0, "divisor must be positive");
        let n = self.0 as i128;
        let d = divisor as i128;
        let rounded = if n >= 0 {
            (2 * n + d) / (2 * d)
        } else {
            (2 * n - d) / (2 * d)
        };
        Money(rounded as i64)
    }

    /// Mean of a slice of values, rounded half away from zero.
    /// Returns zero for an empty slice.
    pub fn mean(values: &[Money]) -> Money {
        if values.is_empty() {
            return Money::zero();
        }
        let sum: i128 = values.iter().map(|m| m.0 as i128).sum();
        let n = values.len() as i128;
        let rounded = if sum >= 0 {
            (2 * sum + n) / (2 * n)
        } else {
            (2 * sum - n) / (2 * n)
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with two decimal places and no currency symbol
/// ("12.34"). This is the format the CSV exporter and receipts use;
/// localized symbols are a presentation concern outside this crate.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.major_units().abs(),
            self.minor_units()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major_units(), 10);
        assert_eq!(money.minor_units(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_floor_at_zero_via_max() {
        let subtotal = Money::from_cents(500);
        let discount = Money::from_cents(700);
        let total = (subtotal - discount).max(Money::zero());
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_divide_rounded() {
        assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
        assert_eq!(Money::from_cents(125).divide_rounded(2).cents(), 63);
        assert_eq!(Money::from_cents(100).divide_rounded(1).cents(), 100);
    }

    #[test]
    fn test_mean() {
        let values: Vec<Money> = [1000, 2000, 3000, 4000, 5000, 6000, 7000]
            .iter()
            .map(|c| Money::from_cents(*c))
            .collect();
        assert_eq!(Money::mean(&values).cents(), 4000);

        assert_eq!(Money::mean(&[]), Money::zero());
        // Mean of 1 and 2 cents rounds up to 2
        assert_eq!(
            Money::mean(&[Money::from_cents(1), Money::from_cents(2)]).cents(),
            2
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }
}
