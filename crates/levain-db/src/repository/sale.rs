//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Checkout Recording
//! ```text
//! record_checkout(new_sale)
//!   BEGIN
//!     INSERT INTO sales …
//!     for each cart line:
//!       UPDATE products SET stock = stock - qty
//!        WHERE id = ? AND stock >= qty        ← conditional decrement
//!       (0 rows affected ⇒ InsufficientStock ⇒ ROLLBACK)
//!       INSERT INTO sale_line_items …
//!   COMMIT
//! ```
//!
//! Everything happens in one transaction: either the sale, all of its line
//! items, and all stock decrements land together, or none of them do. The
//! `stock >= qty` guard is what makes concurrent checkouts of the same
//! product safe - the database refuses the decrement that would oversell,
//! and the losing transaction rolls back.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use levain_core::{CartLine, CheckoutTotals, PaymentMethod, Sale, SaleLineItem};

/// Everything needed to durably record one checkout.
#[derive(Debug, Clone)]
pub struct NewSale<'a> {
    /// The cashier committing the sale.
    pub cashier_id: &'a str,
    /// Totals already computed from the cart's frozen prices.
    pub totals: CheckoutTotals,
    pub payment_method: PaymentMethod,
    /// The cart lines; one sale_line_items row each.
    pub lines: &'a [CartLine],
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

const SALE_COLUMNS: &str = "id, cashier_id, total_cents, discount_cents, \
     payment_method, tendered_cents, change_cents, created_at";

const LINE_COLUMNS: &str =
    "id, sale_id, product_id, name_snapshot, unit_price_cents, quantity, line_total_cents";

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a checkout atomically: sale row, line items, and stock
    /// decrements all land in one transaction.
    ///
    /// ## Errors
    /// - `DbError::InsufficientStock` when a product's stock no longer
    ///   covers its cart line (the conditional decrement matched no row).
    ///   Nothing is persisted.
    /// - Any other `DbError` also leaves the database untouched; the
    ///   transaction is rolled back on drop.
    pub async fn record_checkout(&self, new_sale: NewSale<'_>) -> DbResult<Sale> {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            cashier_id: new_sale.cashier_id.to_string(),
            total_cents: new_sale.totals.total.cents(),
            discount_cents: new_sale.totals.discount.cents(),
            payment_method: new_sale.payment_method,
            tendered_cents: new_sale.totals.tendered.map(|m| m.cents()),
            change_cents: new_sale.totals.change.map(|m| m.cents()),
            created_at: now,
        };

        debug!(
            sale_id = %sale.id,
            total_cents = sale.total_cents,
            lines = new_sale.lines.len(),
            "Recording checkout"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales (
                id, cashier_id, total_cents, discount_cents,
                payment_method, tendered_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&sale.id)
        .bind(&sale.cashier_id)
        .bind(sale.total_cents)
        .bind(sale.discount_cents)
        .bind(sale.payment_method)
        .bind(sale.tendered_cents)
        .bind(sale.change_cents)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in new_sale.lines {
            // Decrement before inserting the line item so a vanished or
            // under-stocked product surfaces as InsufficientStock, not as
            // a foreign-key error.
            let decremented = sqlx::query(
                "UPDATE products
                 SET stock = stock - ?2, updated_at = ?3
                 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(DbError::InsufficientStock {
                    product: line.name.clone(),
                    requested: line.quantity,
                });
            }

            sqlx::query(
                "INSERT INTO sale_line_items (
                    id, sale_id, product_id, name_snapshot,
                    unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(&line.product_id)
            .bind(&line.name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total().cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(sale_id = %sale.id, "Checkout recorded");
        Ok(sale)
    }

    /// Inserts a sale with caller-supplied rows, without touching stock.
    ///
    /// Used by the demo seeder and data imports, where historical sales
    /// carry their own timestamps and the stock ledger is not replayed.
    /// Live checkouts must go through [`SaleRepository::record_checkout`].
    pub async fn insert_historical(&self, sale: &Sale, lines: &[SaleLineItem]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales (
                id, cashier_id, total_cents, discount_cents,
                payment_method, tendered_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&sale.id)
        .bind(&sale.cashier_id)
        .bind(sale.total_cents)
        .bind(sale.discount_cents)
        .bind(sale.payment_method)
        .bind(sale.tendered_cents)
        .bind(sale.change_cents)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO sale_line_items (
                    id, sale_id, product_id, name_snapshot,
                    unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.product_id)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale =
            sqlx::query_as::<_, Sale>(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, in the order they were rung up.
    pub async fn get_line_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(&format!(
            "SELECT {LINE_COLUMNS}
             FROM sale_line_items
             WHERE sale_id = ?1
             ORDER BY rowid"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts recorded sales (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use levain_core::{Cart, Money, Product, Role};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn bread(name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
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

    async fn cashier(db: &Database) -> String {
        db.users()
            .insert("cashier", Role::Cashier)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_record_checkout_persists_everything() {
        let db = test_db().await;
        let cashier_id = cashier(&db).await;

        let pandesal = bread("Pandesal", 300, 100);
        let ensaymada = bread("Ensaymada", 2500, 10);
        db.products().insert(&pandesal).await.unwrap();
        db.products().insert(&ensaymada).await.unwrap();

        let mut cart = Cart::new();
        cart.add_line(&pandesal, 10).unwrap();
        cart.add_line(&ensaymada, 2).unwrap();

        let totals = CheckoutTotals::compute(
            &cart,
            Money::from_cents(500),
            Some(Money::from_cents(10000)),
        );

        let sale = db
            .sales()
            .record_checkout(NewSale {
                cashier_id: &cashier_id,
                totals,
                payment_method: PaymentMethod::Cash,
                lines: cart.lines(),
            })
            .await
            .unwrap();

        // 30.00 + 50.00 - 5.00 discount
        assert_eq!(sale.total_cents, 7500);
        assert_eq!(sale.change_cents, Some(2500));

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 7500);
        assert_eq!(loaded.payment_method, PaymentMethod::Cash);

        let items = db.sales().get_line_items(&sale.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name_snapshot, "Pandesal");
        assert_eq!(items[0].line_total_cents, 3000);

        // Stock was decremented inside the same transaction
        let p = db.products().get_by_id(&pandesal.id).await.unwrap().unwrap();
        assert_eq!(p.stock, 90);
        let e = db.products().get_by_id(&ensaymada.id).await.unwrap().unwrap();
        assert_eq!(e.stock, 8);
    }

    #[tokio::test]
    async fn test_record_checkout_is_all_or_nothing() {
        let db = test_db().await;
        let cashier_id = cashier(&db).await;

        let pandesal = bread("Pandesal", 300, 100);
        let scarce = bread("Ube Loaf", 7000, 5);
        db.products().insert(&pandesal).await.unwrap();
        db.products().insert(&scarce).await.unwrap();

        // Build the cart while stock was plentiful…
        let mut cart = Cart::new();
        cart.add_line(&pandesal, 10).unwrap();
        cart.add_line(&scarce, 5).unwrap();

        // …then the shelf empties before the commit.
        sqlx::query("UPDATE products SET stock = 1 WHERE id = ?1")
            .bind(&scarce.id)
            .execute(db.pool())
            .await
            .unwrap();

        let totals = CheckoutTotals::compute(&cart, Money::zero(), None);
        let err = db
            .sales()
            .record_checkout(NewSale {
                cashier_id: &cashier_id,
                totals,
                payment_method: PaymentMethod::Card,
                lines: cart.lines(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // No sale, no line items, and the first line's decrement was undone
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let p = db.products().get_by_id(&pandesal.id).await.unwrap().unwrap();
        assert_eq!(p.stock, 100);
        let u = db.products().get_by_id(&scarce.id).await.unwrap().unwrap();
        assert_eq!(u.stock, 1);
    }

    #[tokio::test]
    async fn test_record_checkout_cannot_oversell_exact_boundary() {
        let db = test_db().await;
        let cashier_id = cashier(&db).await;

        let last_tray = bread("Spanish Bread", 1500, 3);
        db.products().insert(&last_tray).await.unwrap();

        let mut cart = Cart::new();
        cart.add_line(&last_tray, 3).unwrap();

        let totals = CheckoutTotals::compute(&cart, Money::zero(), None);
        db.sales()
            .record_checkout(NewSale {
                cashier_id: &cashier_id,
                totals,
                payment_method: PaymentMethod::EWallet,
                lines: cart.lines(),
            })
            .await
            .unwrap();

        let p = db.products().get_by_id(&last_tray.id).await.unwrap().unwrap();
        assert_eq!(p.stock, 0);
    }

    #[tokio::test]
    async fn test_insert_historical_does_not_touch_stock() {
        let db = test_db().await;
        let cashier_id = cashier(&db).await;
        let pandesal = bread("Pandesal", 300, 50);
        db.products().insert(&pandesal).await.unwrap();

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            cashier_id,
            total_cents: 600,
            discount_cents: 0,
            payment_method: PaymentMethod::Cash,
            tendered_cents: None,
            change_cents: None,
            created_at: Utc::now() - chrono::Duration::days(30),
        };
        let line = SaleLineItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            product_id: pandesal.id.clone(),
            name_snapshot: pandesal.name.clone(),
            unit_price_cents: 300,
            quantity: 2,
            line_total_cents: 600,
        };

        db.sales().insert_historical(&sale, &[line]).await.unwrap();

        assert_eq!(db.sales().count().await.unwrap(), 1);
        let p = db.products().get_by_id(&pandesal.id).await.unwrap().unwrap();
        assert_eq!(p.stock, 50);
    }
}
