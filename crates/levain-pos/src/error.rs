//! # Service Error Type
//!
//! The error taxonomy the calling web layer sees.
//!
//! ## Categories
//! ```text
//! Domain       - business-rule violation; user corrects input and retries
//! EmptyCart    - checkout of an empty cart; caller redirects, nothing lost
//! InvalidCart  - cart failed re-validation; cart preserved for correction,
//!                message names every offending product
//! Persistence  - storage failure; transaction rolled back, details logged,
//!                only a generic message crosses this boundary
//! ```
//!
//! Every checkout failure leaves the system in the pre-checkout state: no
//! partial stock decrement, no orphan sale, cart intact.

use thiserror::Error;
use tracing::error;

use levain_core::CoreError;
use levain_db::DbError;

/// Service-level errors returned to the web layer.
#[derive(Debug, Error)]
pub enum PosError {
    /// Recoverable business-rule violation (not found, unsellable,
    /// invalid range, cart limits, bad input). Safe to show to the user.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Checkout was attempted with an empty cart. A no-op: the caller
    /// redirects back to the register.
    #[error("Cart is empty")]
    EmptyCart,

    /// One or more cart lines failed re-validation against current
    /// catalog state. Lists every offending product; the cart is kept so
    /// the cashier can fix it.
    #[error("Some items can no longer be sold: {}", products.join(", "))]
    InvalidCart { products: Vec<String> },

    /// Storage-layer failure. The transaction was rolled back; details
    /// went to the log, not to the user.
    #[error("The operation could not be completed; please try again")]
    Persistence,
}

impl PosError {
    /// True when the failure preserved the cart for correction.
    pub fn preserves_cart(&self) -> bool {
        !matches!(self, PosError::EmptyCart)
    }
}

/// Collapses storage errors into the service taxonomy.
///
/// A failed conditional stock decrement is a cart problem (the shelf
/// emptied under the cashier), so it surfaces as `InvalidCart`. Everything
/// else is logged and reported generically.
impl From<DbError> for PosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InsufficientStock { product, .. } => PosError::InvalidCart {
                products: vec![product],
            },
            other => {
                error!(error = %other, "Storage operation failed");
                PosError::Persistence
            }
        }
    }
}

/// Result type for service operations.
pub type PosResult<T> = Result<T, PosError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_becomes_invalid_cart() {
        let err: PosError = DbError::InsufficientStock {
            product: "Pandesal".to_string(),
            requested: 4,
        }
        .into();

        match err {
            PosError::InvalidCart { products } => assert_eq!(products, vec!["Pandesal"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_db_errors_are_generic() {
        let err: PosError = DbError::QueryFailed("boom".to_string()).into();
        assert!(matches!(err, PosError::Persistence));
        // The generic message leaks no storage detail
        assert!(!err.to_string().contains("boom"));
    }

    #[test]
    fn test_empty_cart_does_not_claim_cart_preserved() {
        assert!(!PosError::EmptyCart.preserves_cart());
        assert!(PosError::Persistence.preserves_cart());
    }
}
