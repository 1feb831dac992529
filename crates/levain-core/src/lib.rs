//! # levain-core: Pure Business Logic for Levain POS
//!
//! This crate is the heart of Levain POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Web frontend (external) - routing, templates, sessions, auth       │
//! └───────────────────────────────┬─────────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────────┐
//! │  levain-pos - session carts, checkout engine, reports, audit        │
//! └───────────────────────────────┬─────────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────────┐
//! │               ★ levain-core (THIS CRATE) ★                          │
//! │                                                                     │
//! │   types      money      cart      checkout      forecast            │
//! │   Product    Money      Cart      totals        moving average      │
//! │   Sale       cents      clamping  change        top sellers         │
//! │                                                                     │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS                │
//! └───────────────────────────────┬─────────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────────┐
//! │  levain-db - SQLite queries, migrations, repositories               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, User, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The per-session cart with stock clamping
//! - [`checkout`] - Total/discount/change math
//! - [`forecast`] - Historical series types and the moving-average forecast
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid
//!    float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use levain_core::cart::Cart;
//! use levain_core::checkout::CheckoutTotals;
//! use levain_core::money::Money;
//!
//! let cart = Cart::new();
//! let totals = CheckoutTotals::compute(
//!     &cart,
//!     Money::from_cents(0),
//!     Some(Money::from_cents(500)),
//! );
//! assert_eq!(totals.total, Money::zero());
//! assert_eq!(totals.change, Some(Money::from_cents(500)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod forecast;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use levain_core::Money` instead of
// `use levain_core::money::Money`

pub use cart::{Cart, CartLine, CartMutation};
pub use checkout::CheckoutTotals;
pub use error::{CoreError, CoreResult, ValidationError};
pub use forecast::{
    moving_average_forecast, DailyPoint, DailySummary, ForecastPoint, QuantityPoint, TopSeller,
};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps receipt sizes reasonable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
