//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Name/ingredient substring search for the back office
//! - Active-product listing for the POS grid
//! - Stock receiving
//! - Archival (products referenced by sales are never deleted)
//!
//! Stock *decrements* are deliberately absent here: they happen only inside
//! the checkout transaction owned by the sale repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use levain_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("ube", 20).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const PRODUCT_COLUMNS: &str = "id, name, ingredients, price_cents, stock, \
     is_active, is_archived, expiration_date, image_url, created_at, updated_at";

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches non-archived products by name or ingredients.
    ///
    /// Case-insensitive substring match, ordered by name. An empty query
    /// returns the full (non-archived) catalog up to `limit`.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_all(limit).await;
        }

        let pattern = format!("%{}%", query.to_lowercase());

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE (lower(name) LIKE ?1 OR lower(ingredients) LIKE ?1)
               AND is_archived = 0
             ORDER BY name
             LIMIT ?2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products offered on the POS grid: active and not archived.
    /// Out-of-stock products are included; the cart refuses them with a
    /// proper reason instead of hiding them.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1 AND is_archived = 0
             ORDER BY name
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists the whole non-archived catalog for the back office,
    /// inactive products included.
    pub async fn list_all(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_archived = 0
             ORDER BY name
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID, archived or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id generated beforehand via
    ///   [`generate_product_id`])
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, name, ingredients, price_cents, stock,
                is_active, is_archived, expiration_date, image_url,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.ingredients)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.is_archived)
        .bind(product.expiration_date)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product's editable fields.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the id doesn't exist.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?2,
                ingredients = ?3,
                price_cents = ?4,
                stock = ?5,
                is_active = ?6,
                expiration_date = ?7,
                image_url = ?8,
                updated_at = ?9
             WHERE id = ?1 AND is_archived = 0",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.ingredients)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.expiration_date)
        .bind(&product.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Receives stock: adds `units` (positive) to the current level.
    ///
    /// Selling stock is not done here; the checkout transaction decrements
    /// with its own conditional update.
    pub async fn receive_stock(&self, id: &str, units: i64) -> DbResult<()> {
        debug!(id = %id, units = %units, "Receiving stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET stock = stock + ?2, updated_at = ?3
             WHERE id = ?1 AND is_archived = 0",
        )
        .bind(id)
        .bind(units)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Archives a product (soft removal).
    ///
    /// Historical line items keep referencing it; it just disappears from
    /// the catalog surfaces. This is the only way a product leaves the
    /// catalog - hard deletes would break sales history.
    pub async fn archive(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Archiving product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET is_archived = 1, is_active = 0, updated_at = ?2
             WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts non-archived products (for diagnostics and seed guards).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_archived = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
