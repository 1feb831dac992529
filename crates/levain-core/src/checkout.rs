//! # Checkout Math
//!
//! Pure total/change calculation for checkout.
//!
//! The arithmetic contract, applied to the cart's frozen unit prices:
//!
//! ```text
//! subtotal = Σ (unit_price_snapshot × qty)
//! total    = max(0, subtotal − discount)
//! change   = max(0, tendered − total)        (cash only)
//! ```
//!
//! Validation against the live catalog and the database transaction live in
//! levain-pos / levain-db; nothing here can fail.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;

/// The money outcome of a checkout, computed before anything is persisted
/// and stored verbatim on the sale row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    /// Sum of line totals before discount.
    pub subtotal: Money,
    /// Discount as entered; never negative.
    pub discount: Money,
    /// Grand total, floored at zero.
    pub total: Money,
    /// Cash handed over, when paying cash.
    pub tendered: Option<Money>,
    /// Change due back, when paying cash.
    pub change: Option<Money>,
}

impl CheckoutTotals {
    /// Computes totals for a cart with a discount and an optional tendered
    /// amount.
    ///
    /// A discount larger than the subtotal floors the total at zero rather
    /// than going negative; tendered below the total yields zero change
    /// (the shortfall is the register's problem, not this function's).
    pub fn compute(cart: &Cart, discount: Money, tendered: Option<Money>) -> Self {
        let subtotal = cart.subtotal();
        let total = (subtotal - discount).max(Money::zero());
        let change = tendered.map(|t| (t - total).max(Money::zero()));

        CheckoutTotals {
            subtotal,
            discount,
            total,
            tendered,
            change,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use chrono::Utc;

    fn cart_with(prices_and_qtys: &[(i64, i64)]) -> Cart {
        let now = Utc::now();
        let mut cart = Cart::new();
        for (i, (price_cents, qty)) in prices_and_qtys.iter().enumerate() {
            let product = Product {
                id: format!("p-{}", i),
                name: format!("Product {}", i),
                ingredients: String::new(),
                price_cents: *price_cents,
                stock: 1000,
                is_active: true,
                is_archived: false,
                expiration_date: None,
                image_url: None,
                created_at: now,
                updated_at: now,
            };
            cart.add_line(&product, *qty).unwrap();
        }
        cart
    }

    #[test]
    fn test_total_is_subtotal_minus_discount() {
        let cart = cart_with(&[(300, 4), (2500, 1)]); // 12.00 + 25.00
        let totals = CheckoutTotals::compute(&cart, Money::from_cents(200), None);

        assert_eq!(totals.subtotal.cents(), 3700);
        assert_eq!(totals.total.cents(), 3500);
        assert_eq!(totals.change, None);
    }

    #[test]
    fn test_total_floors_at_zero() {
        let cart = cart_with(&[(300, 1)]);
        let totals = CheckoutTotals::compute(&cart, Money::from_cents(9999), None);
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_change_is_tendered_minus_total() {
        let cart = cart_with(&[(1500, 2)]); // 30.00
        let totals = CheckoutTotals::compute(
            &cart,
            Money::zero(),
            Some(Money::from_cents(5000)),
        );
        assert_eq!(totals.total.cents(), 3000);
        assert_eq!(totals.change.unwrap().cents(), 2000);
    }

    #[test]
    fn test_change_floors_at_zero() {
        let cart = cart_with(&[(1500, 2)]);
        let totals = CheckoutTotals::compute(
            &cart,
            Money::zero(),
            Some(Money::from_cents(1000)),
        );
        assert_eq!(totals.change.unwrap(), Money::zero());
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let cart = Cart::new();
        let totals = CheckoutTotals::compute(&cart, Money::zero(), None);
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }
}
