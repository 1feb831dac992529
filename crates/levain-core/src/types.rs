//! # Domain Types
//!
//! Core domain types used throughout Levain POS.
//!
//! ## Identity
//! Every entity carries a UUID v4 string id. Ids are generated by the
//! storage layer at insert time and never change afterwards.
//!
//! ## Money fields
//! Row-shaped structs store amounts as `*_cents: i64` columns and expose
//! [`Money`] through accessor methods, so the structs map 1:1 onto their
//! tables while calculation code works in the `Money` type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// ## Sellability
/// A product can be sold iff it is active, not archived, has stock, and is
/// not past its expiration date. See [`Product::is_sellable`]; checkout
/// re-evaluates this against current catalog state, never against the
/// snapshot a cart captured earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the POS grid and on receipts.
    pub name: String,

    /// Free-text ingredient list; may be empty.
    pub ingredients: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative; decremented only inside the
    /// checkout transaction.
    pub stock: i64,

    /// Whether the product is offered for sale at all.
    pub is_active: bool,

    /// Soft removal flag. Archived products stay referenced by historical
    /// line items but disappear from every selling surface.
    pub is_archived: bool,

    /// Last day the product may be sold, inclusive. None = no expiry.
    pub expiration_date: Option<NaiveDate>,

    /// Where the product photo lives, if one was uploaded.
    pub image_url: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks the sellability invariant against the given calendar day:
    /// `is_active && !is_archived && stock > 0 && not expired`.
    pub fn is_sellable(&self, today: NaiveDate) -> bool {
        self.unsellable_reason(today).is_none()
    }

    /// Returns why the product cannot be sold today, or None if it can.
    ///
    /// The reason string is user-facing ("expired", "out of stock", ...)
    /// and feeds the checkout validation report.
    pub fn unsellable_reason(&self, today: NaiveDate) -> Option<&'static str> {
        if self.is_archived {
            return Some("archived");
        }
        if !self.is_active {
            return Some("not for sale");
        }
        if self.stock <= 0 {
            return Some("out of stock");
        }
        if let Some(expiration) = self.expiration_date {
            if expiration < today {
                return Some("expired");
            }
        }
        None
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the only method with tendered/change amounts.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Mobile wallet payment.
    EWallet,
}

impl PaymentMethod {
    /// Stable lowercase name, matching the database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::EWallet => "e_wallet",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "e_wallet" | "ewallet" => Ok(PaymentMethod::EWallet),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec![
                    "cash".to_string(),
                    "card".to_string(),
                    "e_wallet".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// Staff role. An explicit enum rather than a generic privilege flag:
/// admins manage the catalog and read reports, cashiers run the register.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cashier,
}

impl Role {
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff account. Authentication itself happens outside this system;
/// we only hold the identity the audit trail and sales reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once created.
///
/// Tendered amount and change are persisted here (nullable, cash only)
/// so a receipt can be reproduced long after the cashier's session ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub cashier_id: String,
    /// Grand total after discount, floored at zero.
    pub total_cents: i64,
    pub discount_cents: i64,
    pub payment_method: PaymentMethod,
    pub tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn tendered(&self) -> Option<Money> {
        self.tendered_cents.map(Money::from_cents)
    }

    #[inline]
    pub fn change(&self) -> Option<Money> {
        self.change_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line of a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time the line entered the cart (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl SaleLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Login History
// =============================================================================

/// One login session of a staff user. `logout_at` stays empty until the
/// user logs out; abandoned sessions simply keep an open record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LoginHistory {
    pub id: String,
    pub user_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub login_at: DateTime<Utc>,
    pub logout_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive calendar-date range for reports and analytics.
///
/// Construction fails fast on a reversed range instead of letting queries
/// silently return empty series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// ## Errors
    /// `CoreError::InvalidRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Range of the `days` calendar days ending at `end` (inclusive).
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        let start = end - chrono::Duration::days(i64::from(days.saturating_sub(1)));
        DateRange { start, end }
    }

    #[inline]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Pandesal".to_string(),
            ingredients: String::new(),
            price_cents: 300,
            stock,
            is_active: true,
            is_archived: false,
            expiration_date: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_sellable_happy_path() {
        let p = product(10);
        assert!(p.is_sellable(day("2026-08-01")));
        assert_eq!(p.unsellable_reason(day("2026-08-01")), None);
    }

    #[test]
    fn test_sellable_requires_stock() {
        let p = product(0);
        assert!(!p.is_sellable(day("2026-08-01")));
        assert_eq!(p.unsellable_reason(day("2026-08-01")), Some("out of stock"));
    }

    #[test]
    fn test_sellable_respects_flags() {
        let mut p = product(10);
        p.is_active = false;
        assert_eq!(p.unsellable_reason(day("2026-08-01")), Some("not for sale"));

        let mut p = product(10);
        p.is_archived = true;
        // Archived wins over every other reason
        p.is_active = false;
        assert_eq!(p.unsellable_reason(day("2026-08-01")), Some("archived"));
    }

    #[test]
    fn test_sellable_expiration_is_inclusive() {
        let mut p = product(10);
        p.expiration_date = Some(day("2026-08-01"));
        assert!(p.is_sellable(day("2026-08-01")));
        assert!(!p.is_sellable(day("2026-08-02")));
        assert_eq!(p.unsellable_reason(day("2026-08-02")), Some("expired"));
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("CARD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "e_wallet".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::EWallet
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_date_range_rejects_reversed() {
        assert!(DateRange::new(day("2026-08-02"), day("2026-08-01")).is_err());
        let range = DateRange::new(day("2026-08-01"), day("2026-08-31")).unwrap();
        assert!(range.contains(day("2026-08-15")));
        assert!(!range.contains(day("2026-09-01")));
    }

    #[test]
    fn test_date_range_trailing_days() {
        let range = DateRange::trailing_days(day("2026-08-07"), 7);
        assert_eq!(range.start(), day("2026-08-01"));
        assert_eq!(range.end(), day("2026-08-07"));
    }
}
