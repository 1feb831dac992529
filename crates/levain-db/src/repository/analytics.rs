//! # Analytics Repository
//!
//! Read-only aggregation over sale line items, joined to their parent
//! sales (for the calendar date) and products (for the name).
//!
//! All daily series are **ascending by date** and sparse: a day with no
//! sales simply has no row. The forecast in levain-core depends on the
//! ascending order - its "last window" must be the most recent days.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use levain_core::{DailyPoint, DailySummary, DateRange, QuantityPoint, TopSeller};

/// Repository for historical sales aggregation.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Revenue per calendar day over the range, ascending by date.
    pub async fn daily_sales(&self, range: DateRange) -> DbResult<Vec<DailyPoint>> {
        debug!(start = %range.start(), end = %range.end(), "Aggregating daily sales");

        let points = sqlx::query_as::<_, DailyPoint>(
            "SELECT date(s.created_at) AS date,
                    COALESCE(SUM(li.line_total_cents), 0) AS revenue_cents
             FROM sale_line_items li
             INNER JOIN sales s ON s.id = li.sale_id
             WHERE date(s.created_at) BETWEEN date(?1) AND date(?2)
             GROUP BY date(s.created_at)
             ORDER BY date(s.created_at) ASC",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// Units sold per calendar day over the range, ascending by date.
    pub async fn daily_quantity(&self, range: DateRange) -> DbResult<Vec<QuantityPoint>> {
        debug!(start = %range.start(), end = %range.end(), "Aggregating daily quantity");

        let points = sqlx::query_as::<_, QuantityPoint>(
            "SELECT date(s.created_at) AS date,
                    COALESCE(SUM(li.quantity), 0) AS quantity
             FROM sale_line_items li
             INNER JOIN sales s ON s.id = li.sale_id
             WHERE date(s.created_at) BETWEEN date(?1) AND date(?2)
             GROUP BY date(s.created_at)
             ORDER BY date(s.created_at) ASC",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// Revenue and units per calendar day in one pass - the CSV report's
    /// row source.
    pub async fn daily_summary(&self, range: DateRange) -> DbResult<Vec<DailySummary>> {
        debug!(start = %range.start(), end = %range.end(), "Aggregating daily summary");

        let rows = sqlx::query_as::<_, DailySummary>(
            "SELECT date(s.created_at) AS date,
                    COALESCE(SUM(li.line_total_cents), 0) AS revenue_cents,
                    COALESCE(SUM(li.quantity), 0) AS quantity
             FROM sale_line_items li
             INNER JOIN sales s ON s.id = li.sale_id
             WHERE date(s.created_at) BETWEEN date(?1) AND date(?2)
             GROUP BY date(s.created_at)
             ORDER BY date(s.created_at) ASC",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The best-selling products of the range, descending by units sold,
    /// truncated to `limit`. Grouping is by the product's current catalog
    /// name (renames merge history under the new name). Ties are returned
    /// in whatever order SQLite settles on.
    pub async fn top_sellers(&self, range: DateRange, limit: u32) -> DbResult<Vec<TopSeller>> {
        debug!(start = %range.start(), end = %range.end(), limit, "Ranking top sellers");

        let sellers = sqlx::query_as::<_, TopSeller>(
            "SELECT p.name AS product_name,
                    COALESCE(SUM(li.quantity), 0) AS quantity,
                    COALESCE(SUM(li.line_total_cents), 0) AS revenue_cents
             FROM sale_line_items li
             INNER JOIN sales s ON s.id = li.sale_id
             INNER JOIN products p ON p.id = li.product_id
             WHERE date(s.created_at) BETWEEN date(?1) AND date(?2)
             GROUP BY p.name
             ORDER BY quantity DESC
             LIMIT ?3",
        )
        .bind(range.start())
        .bind(range.end())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sellers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
