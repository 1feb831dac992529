//! # levain-db: Database Layer for Levain POS
//!
//! This crate provides database access for the Levain POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! levain-pos (service layer)
//!      │
//!      ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     levain-db (THIS CRATE)                      │
//! │                                                                 │
//! │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │
//! │   │   Database    │    │  Repositories  │    │  Migrations  │  │
//! │   │   (pool.rs)   │◄───│ product, sale, │    │  (embedded)  │  │
//! │   │   SqlitePool  │    │ analytics,     │    │ 001_init.sql │  │
//! │   │   WAL mode    │    │ user, login    │    │              │  │
//! │   └───────────────┘    └────────────────┘    └──────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use levain_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/levain.db")).await?;
//!
//! let grid = db.products().list_active(200).await?;
//! let sale = db.sales().record_checkout(new_sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::analytics::AnalyticsRepository;
pub use repository::login::LoginHistoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::{NewSale, SaleRepository};
pub use repository::user::UserRepository;
