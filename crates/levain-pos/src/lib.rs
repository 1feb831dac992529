//! # levain-pos: Service Layer for Levain POS
//!
//! The surface a server-rendered web frontend calls into. Handlers stay
//! thin: resolve the session and the authenticated user, call one method
//! here, render the result.
//!
//! ## Services
//!
//! - [`pos::PosService`] - product grid, cart mutation, checkout, receipts
//! - [`report::ReportService`] - daily series, top sellers, forecast, CSV
//! - [`audit::LoginAudit`] - login/logout bookkeeping
//! - [`session::SessionStore`] - per-session carts (owned by `PosService`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use levain_db::{Database, DbConfig};
//! use levain_pos::{CheckoutRequest, PosService};
//! use levain_core::PaymentMethod;
//!
//! let db = Database::new(DbConfig::new("levain.db")).await?;
//! let pos = PosService::new(db.clone());
//!
//! pos.add_to_cart(&session_id, &product_id, 2).await?;
//! let receipt = pos
//!     .checkout(CheckoutRequest {
//!         session_id: &session_id,
//!         cashier_id: &user.id,
//!         discount_cents: 0,
//!         payment_method: PaymentMethod::Cash,
//!         tendered_cents: Some(10_000),
//!     })
//!     .await?;
//! ```
//!
//! ## Error Contract
//!
//! Every method returns [`error::PosError`], the taxonomy the web layer
//! renders: business-rule violations carry their details, storage failures
//! are logged here and surface generically. Checkout failures always leave
//! the pre-checkout state intact.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod error;
pub mod pos;
pub mod report;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::LoginAudit;
pub use error::{PosError, PosResult};
pub use pos::{CartView, CheckoutRequest, PosService, Receipt};
pub use report::{ForecastOverview, ReportService};
pub use session::SessionStore;
