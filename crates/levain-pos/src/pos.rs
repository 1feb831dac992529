//! # POS Service
//!
//! The register itself: product grid, cart mutation, checkout, receipts.
//!
//! ## Checkout Flow
//! ```text
//! checkout(request)
//!   │
//!   ├── empty cart? ──────────────► EmptyCart (no-op)
//!   │
//!   ├── re-validate every line against CURRENT catalog state
//!   │   (sellability + stock ≥ qty; snapshots may be stale)
//!   │       any violation ───────► InvalidCart, every offender named,
//!   │                              cart preserved
//!   │
//!   ├── compute totals from the frozen cart prices
//!   │
//!   ├── record_checkout ─ one transaction: sale + line items + stock
//!   │       decrement failure ───► InvalidCart, cart preserved
//!   │       other failure ───────► Persistence, cart preserved
//!   │
//!   └── clear session cart, return the receipt
//! ```
//!
//! Re-validation exists because stock may have moved between "add to cart"
//! and "checkout"; the conditional decrement inside the transaction then
//! closes the remaining race.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use levain_core::{
    validation, Cart, CartLine, CartMutation, CheckoutTotals, CoreError, Money, PaymentMethod,
    Product, Sale, SaleLineItem, ValidationError,
};
use levain_db::{Database, NewSale};

use crate::error::{PosError, PosResult};
use crate::session::SessionStore;

/// How many products the POS grid shows at most.
const GRID_LIMIT: u32 = 500;

// =============================================================================
// Views
// =============================================================================

/// Cart contents plus totals, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal_cents: i64,
    pub total_quantity: i64,
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().to_vec(),
            subtotal_cents: cart.subtotal().cents(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// A finalized sale as shown to the customer: the durable sale row plus
/// its line items. Tendered/change amounts live on the sale itself, so
/// this view can be rebuilt any time from the sale id alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub sale: Sale,
    pub lines: Vec<SaleLineItem>,
}

impl Receipt {
    /// Sum of line totals before the discount.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// Everything a checkout needs from the caller.
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    /// Session whose cart is being committed.
    pub session_id: &'a str,
    /// The authenticated cashier.
    pub cashier_id: &'a str,
    /// Discount in cents; must be non-negative.
    pub discount_cents: i64,
    pub payment_method: PaymentMethod,
    /// Cash handed over; ignored for non-cash methods.
    pub tendered_cents: Option<i64>,
}

// =============================================================================
// POS Service
// =============================================================================

/// The register service: owns the session carts and orchestrates catalog,
/// checkout, and receipts over the database.
#[derive(Debug)]
pub struct PosService {
    db: Database,
    sessions: SessionStore,
}

impl PosService {
    /// Creates a POS service over an opened database.
    pub fn new(db: Database) -> Self {
        PosService {
            db,
            sessions: SessionStore::new(),
        }
    }

    /// The product grid: active, non-archived products by name.
    pub async fn product_grid(&self) -> PosResult<Vec<Product>> {
        Ok(self.db.products().list_active(GRID_LIMIT).await?)
    }

    /// The session's current cart.
    pub fn cart_view(&self, session_id: &str) -> CartView {
        self.sessions.with_cart(session_id, CartView::from_cart)
    }

    /// Adds a quantity of a product to the session's cart.
    ///
    /// ## Errors
    /// - `Domain(ProductNotFound)` for an unknown product id
    /// - `Domain(Unsellable)` when the product fails the sellability check
    ///
    /// A request exceeding the available stock is not an error: the line
    /// is clamped and [`CartMutation::Clamped`] is returned so the caller
    /// can flash a warning.
    pub async fn add_to_cart(
        &self,
        session_id: &str,
        product_id: &str,
        qty: i64,
    ) -> PosResult<CartMutation> {
        validation::validate_quantity(qty).map_err(CoreError::from)?;

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let today = Utc::now().date_naive();
        if let Some(reason) = product.unsellable_reason(today) {
            return Err(CoreError::Unsellable {
                name: product.name,
                reason,
            }
            .into());
        }

        let mutation = self
            .sessions
            .with_cart_mut(session_id, |cart| cart.add_line(&product, qty))
            .map_err(PosError::Domain)?;

        if let CartMutation::Clamped {
            requested,
            applied,
            stock,
        } = mutation
        {
            warn!(
                product = %product.name,
                requested,
                applied,
                stock,
                "Cart line clamped to available stock"
            );
        }

        Ok(mutation)
    }

    /// Sets the quantity of a cart line.
    ///
    /// `qty <= 0` removes the line; a quantity above the current stock is
    /// clamped. Unknown ids (not in the catalog, or not in the cart) are
    /// logged no-ops, mirroring how stale quantity forms behave.
    pub async fn update_cart(
        &self,
        session_id: &str,
        product_id: &str,
        qty: i64,
    ) -> PosResult<CartMutation> {
        let Some(product) = self.db.products().get_by_id(product_id).await? else {
            warn!(product_id = %product_id, "Cart update for unknown product ignored");
            return Ok(CartMutation::Untouched);
        };

        let mutation = self.sessions.with_cart_mut(session_id, |cart| {
            cart.set_quantity(product_id, qty, product.stock)
        });

        match mutation {
            CartMutation::Untouched => {
                warn!(product_id = %product_id, "Cart update for product not in cart ignored");
            }
            CartMutation::Clamped {
                requested,
                applied,
                stock,
            } => {
                warn!(
                    product = %product.name,
                    requested,
                    applied,
                    stock,
                    "Cart line clamped to available stock"
                );
            }
            _ => {}
        }

        Ok(mutation)
    }

    /// Empties the session's cart (cancelled sale).
    pub fn clear_cart(&self, session_id: &str) {
        self.sessions.clear(session_id);
    }

    /// Atomically converts the session's cart into a durable sale.
    ///
    /// See the module docs for the flow. On success the cart is cleared
    /// and the receipt returned; on any failure the cart is preserved and
    /// nothing was persisted.
    pub async fn checkout(&self, request: CheckoutRequest<'_>) -> PosResult<Receipt> {
        validation::validate_discount_cents(request.discount_cents).map_err(CoreError::from)?;
        if request.tendered_cents.is_some_and(|t| t < 0) {
            return Err(CoreError::from(ValidationError::MustBeNonNegative {
                field: "tendered".to_string(),
            })
            .into());
        }

        let cart = self.sessions.snapshot(request.session_id);
        if cart.is_empty() {
            debug!(session_id = %request.session_id, "Checkout of empty cart is a no-op");
            return Err(PosError::EmptyCart);
        }

        self.validate_cart(&cart).await?;

        let tendered = match request.payment_method {
            PaymentMethod::Cash => request.tendered_cents.map(Money::from_cents),
            _ => None,
        };
        let totals =
            CheckoutTotals::compute(&cart, Money::from_cents(request.discount_cents), tendered);

        let sale = self
            .db
            .sales()
            .record_checkout(NewSale {
                cashier_id: request.cashier_id,
                totals,
                payment_method: request.payment_method,
                lines: cart.lines(),
            })
            .await?;

        self.sessions.clear(request.session_id);

        info!(
            sale_id = %sale.id,
            cashier_id = %request.cashier_id,
            total_cents = sale.total_cents,
            lines = cart.line_count(),
            "Sale completed"
        );

        let receipt = self.receipt(&sale.id).await?;
        debug!(
            payload = %serde_json::to_string(&receipt).unwrap_or_default(),
            "Receipt assembled"
        );
        Ok(receipt)
    }

    /// Re-validates every cart line against current catalog state.
    ///
    /// All violations are collected before failing so the cashier sees the
    /// full damage at once, not one product per attempt.
    async fn validate_cart(&self, cart: &Cart) -> PosResult<()> {
        let today = Utc::now().date_naive();
        let mut offenders = Vec::new();

        for line in cart.lines() {
            match self.db.products().get_by_id(&line.product_id).await? {
                None => offenders.push(format!("{} (no longer in catalog)", line.name)),
                Some(product) => {
                    if let Some(reason) = product.unsellable_reason(today) {
                        offenders.push(format!("{} ({})", product.name, reason));
                    } else if product.stock < line.quantity {
                        offenders.push(format!(
                            "{} (only {} left)",
                            product.name, product.stock
                        ));
                    }
                }
            }
        }

        if offenders.is_empty() {
            Ok(())
        } else {
            Err(PosError::InvalidCart {
                products: offenders,
            })
        }
    }

    /// Rebuilds the receipt view for a recorded sale.
    pub async fn receipt(&self, sale_id: &str) -> PosResult<Receipt> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let lines = self.db.sales().get_line_items(sale_id).await?;

        Ok(Receipt { sale, lines })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
