//! # Session Cart Store
//!
//! Per-session carts, keyed by an opaque session id issued by the external
//! session framework.
//!
//! ## Thread Safety
//! One mutex guards the whole map. Cart operations are short (a vector of
//! at most [`levain_core::MAX_CART_LINES`] lines), and a single-shop POS
//! has a handful of concurrent sessions, so finer-grained locking would
//! buy nothing.
//!
//! Carts are never shared across sessions and never persisted: an expired
//! session takes its cart with it.

use std::collections::HashMap;
use std::sync::Mutex;

use levain_core::Cart;

/// In-memory store of per-session carts.
#[derive(Debug, Default)]
pub struct SessionStore {
    carts: Mutex<HashMap<String, Cart>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        SessionStore {
            carts: Mutex::new(HashMap::new()),
        }
    }

    /// Executes a function with read access to the session's cart.
    /// A session without a cart reads as an empty cart.
    pub fn with_cart<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let carts = self.carts.lock().expect("session store mutex poisoned");
        match carts.get(session_id) {
            Some(cart) => f(cart),
            None => f(&Cart::new()),
        }
    }

    /// Executes a function with write access to the session's cart,
    /// creating an empty cart on first touch.
    pub fn with_cart_mut<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut carts = self.carts.lock().expect("session store mutex poisoned");
        let cart = carts.entry(session_id.to_string()).or_default();
        f(cart)
    }

    /// Clones the session's cart (empty when the session has none).
    /// Checkout validates and commits against this snapshot, leaving the
    /// stored cart untouched until the sale is durable.
    pub fn snapshot(&self, session_id: &str) -> Cart {
        self.with_cart(session_id, Clone::clone)
    }

    /// Empties the session's cart.
    pub fn clear(&self, session_id: &str) {
        let mut carts = self.carts.lock().expect("session store mutex poisoned");
        carts.remove(session_id);
    }

    /// Number of sessions currently holding a cart.
    pub fn session_count(&self) -> usize {
        self.carts.lock().expect("session store mutex poisoned").len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use levain_core::Product;

    fn product(id: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            ingredients: String::new(),
            price_cents: 500,
            stock: 10,
            is_active: true,
            is_archived: false,
            expiration_date: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        store.with_cart_mut("alice", |cart| cart.add_line(&product("1"), 2).unwrap());
        store.with_cart_mut("bob", |cart| cart.add_line(&product("2"), 1).unwrap());

        assert_eq!(store.with_cart("alice", |c| c.total_quantity()), 2);
        assert_eq!(store.with_cart("bob", |c| c.total_quantity()), 1);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_unknown_session_reads_empty() {
        let store = SessionStore::new();
        assert!(store.with_cart("ghost", |c| c.is_empty()));
        // Reading does not create a session
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = SessionStore::new();
        store.with_cart_mut("alice", |cart| cart.add_line(&product("1"), 2).unwrap());

        let mut snapshot = store.snapshot("alice");
        snapshot.clear();

        // The stored cart is unaffected by mutating the snapshot
        assert_eq!(store.with_cart("alice", |c| c.total_quantity()), 2);
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::new();
        store.with_cart_mut("alice", |cart| cart.add_line(&product("1"), 2).unwrap());

        store.clear("alice");
        assert!(store.with_cart("alice", |c| c.is_empty()));
        assert_eq!(store.session_count(), 0);
    }
}
