//! # Cart Module
//!
//! The per-session shopping cart.
//!
//! A cart accumulates candidate purchase lines before checkout. Each line
//! freezes the product's name and unit price at the moment it is added; a
//! later catalog price change does not move lines already in a cart.
//!
//! ## Stock clamping
//! The cart never carries more of a product than the catalog had in stock
//! when the mutation happened. Oversized requests are not rejected: the
//! quantity is clamped to the available stock and the mutation reports
//! [`CartMutation::Clamped`] so the caller can warn the cashier. Hard
//! failures are reserved for genuinely invalid input.
//!
//! The cart itself is pure data; resolving product ids against the catalog
//! (and deciding sellability) is the service layer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of a cart: a product reference plus frozen display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart; always >= 1 while the line exists.
    pub quantity: i64,

    /// When this line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a product, freezing name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Mutation Outcome
// =============================================================================

/// Result of a cart mutation.
///
/// `Clamped` is a warning, not a failure: the cart was changed, just not by
/// as much as requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CartMutation {
    /// The requested quantity was applied in full; `quantity` is the
    /// line's new quantity.
    Applied { quantity: i64 },
    /// The line was capped at the available stock.
    Clamped {
        requested: i64,
        applied: i64,
        stock: i64,
    },
    /// The line was removed.
    Removed,
    /// Nothing matched; the cart is unchanged.
    Untouched,
}

impl CartMutation {
    /// True when the mutation hit the stock ceiling.
    #[inline]
    pub const fn is_clamped(&self) -> bool {
        matches!(self, CartMutation::Clamped { .. })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges
///   quantities)
/// - Line quantity is always >= 1 (dropping to zero removes the line)
/// - At most [`MAX_CART_LINES`] lines, [`MAX_LINE_QUANTITY`] per line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a quantity of a product, merging with an existing line.
    ///
    /// The caller has already resolved the product and checked it is
    /// sellable; this method only enforces cart-shape rules and the stock
    /// ceiling.
    ///
    /// ## Behavior
    /// - Requested quantity must be positive
    /// - `current + qty` above the product's stock clamps to exactly the
    ///   stock level, reported as [`CartMutation::Clamped`]
    ///
    /// ## Errors
    /// - `CartTooLarge` when a new line would exceed [`MAX_CART_LINES`]
    /// - `QuantityTooLarge` when the merged quantity would exceed
    ///   [`MAX_LINE_QUANTITY`]
    pub fn add_line(&mut self, product: &Product, qty: i64) -> CoreResult<CartMutation> {
        if qty <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let current = self
            .lines
            .iter()
            .find(|l| l.product_id == product.id)
            .map(|l| l.quantity)
            .unwrap_or(0);

        if current == 0 && self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let desired = current + qty;
        if desired > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: desired,
                max: MAX_LINE_QUANTITY,
            });
        }

        let applied = desired.min(product.stock);
        if applied <= 0 {
            // Stock raced to zero between the sellability check and here;
            // leave nothing behind.
            self.lines.retain(|l| l.product_id != product.id);
            return Ok(CartMutation::Clamped {
                requested: desired,
                applied: 0,
                stock: product.stock,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = applied,
            None => self.lines.push(CartLine::from_product(product, applied)),
        }

        if applied == desired {
            Ok(CartMutation::Applied { quantity: applied })
        } else {
            Ok(CartMutation::Clamped {
                requested: desired,
                applied,
                stock: product.stock,
            })
        }
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `qty <= 0` removes the line
    /// - `qty` above `stock` (or [`MAX_LINE_QUANTITY`]) clamps down
    /// - An unknown product id leaves the cart untouched; the caller logs
    ///   it and carries on
    pub fn set_quantity(&mut self, product_id: &str, qty: i64, stock: i64) -> CartMutation {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return CartMutation::Untouched;
        };

        if qty <= 0 {
            self.lines.remove(index);
            return CartMutation::Removed;
        }

        let applied = qty.min(MAX_LINE_QUANTITY).min(stock);
        if applied <= 0 {
            self.lines.remove(index);
            return CartMutation::Removed;
        }

        self.lines[index].quantity = applied;
        if applied == qty {
            CartMutation::Applied { quantity: applied }
        } else {
            CartMutation::Clamped {
                requested: qty,
                applied,
                stock,
            }
        }
    }

    /// Removes a line by product id. Unknown ids are ignored.
    pub fn remove_line(&mut self, product_id: &str) -> CartMutation {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() == before {
            CartMutation::Untouched
        } else {
            CartMutation::Removed
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Number of distinct lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals, before any discount.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            ingredients: String::new(),
            price_cents,
            stock,
            is_active: true,
            is_archived: false,
            expiration_date: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 50);

        let outcome = cart.add_line(&product, 2).unwrap();
        assert_eq!(outcome, CartMutation::Applied { quantity: 2 });
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 50);

        cart.add_line(&product, 2).unwrap();
        cart.add_line(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 4);

        let outcome = cart.add_line(&product, 10).unwrap();
        assert_eq!(
            outcome,
            CartMutation::Clamped {
                requested: 10,
                applied: 4,
                stock: 4
            }
        );
        // Never exceeds stock, lands exactly on it
        assert_eq!(cart.get("1").unwrap().quantity, 4);
    }

    #[test]
    fn test_add_merge_clamps_to_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 5);

        cart.add_line(&product, 3).unwrap();
        let outcome = cart.add_line(&product, 4).unwrap();
        assert!(outcome.is_clamped());
        assert_eq!(cart.get("1").unwrap().quantity, 5);
    }

    #[test]
    fn test_add_rejects_nonpositive_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 5);
        assert!(cart.add_line(&product, 0).is_err());
        assert!(cart.add_line(&product, -3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_snapshot_is_frozen() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 500, 10);
        cart.add_line(&product, 1).unwrap();

        // Catalog price changes after the add; the line keeps the snapshot
        product.price_cents = 900;
        cart.add_line(&product, 1).unwrap();

        assert_eq!(cart.get("1").unwrap().unit_price_cents, 500);
        assert_eq!(cart.subtotal().cents(), 1000);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_line(&product, 2).unwrap();

        let outcome = cart.set_quantity("1", 6, 10);
        assert_eq!(outcome, CartMutation::Applied { quantity: 6 });
        assert_eq!(cart.get("1").unwrap().quantity, 6);
    }

    #[test]
    fn test_set_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_line(&product, 2).unwrap();

        let outcome = cart.set_quantity("1", 25, 10);
        assert_eq!(
            outcome,
            CartMutation::Clamped {
                requested: 25,
                applied: 10,
                stock: 10
            }
        );
        assert_eq!(cart.get("1").unwrap().quantity, 10);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.set_quantity("1", 0, 10), CartMutation::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_is_untouched() {
        let mut cart = Cart::new();
        let product = test_product("1", 500, 10);
        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.set_quantity("missing", 3, 10), CartMutation::Untouched);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 500, 10), 1).unwrap();
        cart.add_line(&test_product("2", 700, 10), 1).unwrap();

        assert_eq!(cart.remove_line("1"), CartMutation::Removed);
        assert_eq!(cart.remove_line("1"), CartMutation::Untouched);
        assert_eq!(cart.line_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }
}
