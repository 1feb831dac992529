//! # Reporting & Forecast Service
//!
//! Decision-support over the sales history: daily series, top sellers,
//! the moving-average forecast, and the CSV export.
//!
//! Date ranges are validated up front - a reversed range is an error, not
//! an empty report. All series come back ascending by date (the analytics
//! repository's documented order), which is also what the forecast's
//! "last window" logic assumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use levain_core::{
    moving_average_forecast, DailyPoint, DateRange, ForecastPoint, QuantityPoint, TopSeller,
};
use levain_db::Database;

use crate::error::{PosError, PosResult};

/// Days of history feeding the forecast view.
const FORECAST_HISTORY_DAYS: u32 = 60;
/// Days projected forward.
const FORECAST_HORIZON: u32 = 7;
/// Moving-average window, in days.
const FORECAST_WINDOW: usize = 7;
/// Products shown on the forecast page.
const FORECAST_TOP_LIMIT: u32 = 5;

/// Everything the forecast page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOverview {
    /// Daily revenue of the trailing history window, ascending.
    pub history: Vec<DailyPoint>,
    /// Flat-line projection for the coming days.
    pub forecast: Vec<ForecastPoint>,
    /// Best sellers over the same history window.
    pub top_sellers: Vec<TopSeller>,
}

/// Read-only reporting over the sales history.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a report service over an opened database.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Daily revenue between `start` and `end` (inclusive), ascending.
    /// Days without sales are absent from the series.
    pub async fn daily_sales(&self, start: NaiveDate, end: NaiveDate) -> PosResult<Vec<DailyPoint>> {
        let range = DateRange::new(start, end)?;
        Ok(self.db.analytics().daily_sales(range).await?)
    }

    /// Daily units sold between `start` and `end` (inclusive), ascending.
    pub async fn daily_quantity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PosResult<Vec<QuantityPoint>> {
        let range = DateRange::new(start, end)?;
        Ok(self.db.analytics().daily_quantity(range).await?)
    }

    /// The `limit` best-selling products of the range, by units sold.
    pub async fn top_sellers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> PosResult<Vec<TopSeller>> {
        let range = DateRange::new(start, end)?;
        Ok(self.db.analytics().top_sellers(range, limit).await?)
    }

    /// Assembles the forecast page: 60 days of history, a 7-day flat
    /// moving-average projection, and the top five sellers.
    pub async fn forecast_overview(&self, today: NaiveDate) -> PosResult<ForecastOverview> {
        let range = DateRange::trailing_days(today, FORECAST_HISTORY_DAYS);

        let history = self.db.analytics().daily_sales(range).await?;
        let forecast = moving_average_forecast(&history, FORECAST_HORIZON, FORECAST_WINDOW);
        let top_sellers = self
            .db
            .analytics()
            .top_sellers(range, FORECAST_TOP_LIMIT)
            .await?;

        debug!(
            history_days = history.len(),
            horizon = FORECAST_HORIZON,
            "Forecast assembled"
        );

        Ok(ForecastOverview {
            history,
            forecast,
            top_sellers,
        })
    }

    /// Exports the daily summary as CSV.
    ///
    /// UTF-8, comma-delimited, header `Date,Revenue,Quantity`, one row per
    /// aggregated date in ascending order, revenue with two decimals,
    /// quantity as an integer.
    pub async fn sales_csv(&self, start: NaiveDate, end: NaiveDate) -> PosResult<String> {
        let range = DateRange::new(start, end)?;
        let rows = self.db.analytics().daily_summary(range).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Date", "Revenue", "Quantity"])
            .and_then(|_| {
                rows.iter().try_for_each(|row| {
                    writer.write_record([
                        row.date.to_string(),
                        row.revenue().to_string(),
                        row.quantity.to_string(),
                    ])
                })
            })
            .map_err(|e| {
                error!(error = %e, "CSV serialization failed");
                PosError::Persistence
            })?;

        let bytes = writer.into_inner().map_err(|e| {
            error!(error = %e, "CSV writer flush failed");
            PosError::Persistence
        })?;

        String::from_utf8(bytes).map_err(|e| {
            error!(error = %e, "CSV output was not valid UTF-8");
            PosError::Persistence
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use levain_core::{CoreError, PaymentMethod, Product, Role, Sale, SaleLineItem};
    use levain_db::repository::product::generate_product_id;
    use levain_db::DbConfig;
    use uuid::Uuid;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_history(db: &Database, entries: &[(&str, i64, i64)]) {
        let cashier = db.users().insert("cashier", Role::Cashier).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: "Pandesal".to_string(),
            ingredients: String::new(),
            price_cents: 300,
            stock: 10000,
            is_active: true,
            is_archived: false,
            expiration_date: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        for (date, revenue_cents, qty) in entries {
            let created_at = Utc.from_utc_datetime(&day(date).and_hms_opt(9, 0, 0).unwrap());
            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                cashier_id: cashier.id.clone(),
                total_cents: *revenue_cents,
                discount_cents: 0,
                payment_method: PaymentMethod::Cash,
                tendered_cents: None,
                change_cents: None,
                created_at,
            };
            let line = SaleLineItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                unit_price_cents: revenue_cents / qty,
                quantity: *qty,
                line_total_cents: *revenue_cents,
            };
            db.sales().insert_historical(&sale, &[line]).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_reversed_range_fails_fast() {
        let reports = ReportService::new(test_db().await);

        let err = reports
            .daily_sales(day("2026-08-07"), day("2026-08-01"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PosError::Domain(CoreError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_sales_csv_exact_format() {
        let db = test_db().await;
        seed_history(
            &db,
            &[("2026-08-03", 4550, 7), ("2026-08-01", 1200, 4)],
        )
        .await;
        let reports = ReportService::new(db);

        let csv = reports
            .sales_csv(day("2026-08-01"), day("2026-08-07"))
            .await
            .unwrap();

        assert_eq!(
            csv,
            "Date,Revenue,Quantity\n2026-08-01,12.00,4\n2026-08-03,45.50,7\n"
        );
    }

    #[tokio::test]
    async fn test_sales_csv_empty_range_is_header_only() {
        let reports = ReportService::new(test_db().await);
        let csv = reports
            .sales_csv(day("2026-08-01"), day("2026-08-07"))
            .await
            .unwrap();
        assert_eq!(csv, "Date,Revenue,Quantity\n");
    }

    #[tokio::test]
    async fn test_forecast_overview_empty_history_is_flat_zero() {
        let reports = ReportService::new(test_db().await);
        let overview = reports.forecast_overview(day("2026-08-07")).await.unwrap();

        assert!(overview.history.is_empty());
        assert_eq!(overview.forecast.len(), 7);
        assert!(overview.forecast.iter().all(|p| p.revenue_cents == 0));
        assert!(overview.top_sellers.is_empty());
    }

    #[tokio::test]
    async fn test_forecast_overview_averages_recent_week() {
        let db = test_db().await;
        // Ten days of history; the last seven average to 40.00
        seed_history(
            &db,
            &[
                ("2026-07-29", 9900, 1),
                ("2026-07-30", 9900, 1),
                ("2026-07-31", 9900, 1),
                ("2026-08-01", 1000, 1),
                ("2026-08-02", 2000, 1),
                ("2026-08-03", 3000, 1),
                ("2026-08-04", 4000, 1),
                ("2026-08-05", 5000, 1),
                ("2026-08-06", 6000, 1),
                ("2026-08-07", 7000, 1),
            ],
        )
        .await;
        let reports = ReportService::new(db);

        let overview = reports.forecast_overview(day("2026-08-07")).await.unwrap();
        assert_eq!(overview.forecast.len(), 7);
        assert!(overview.forecast.iter().all(|p| p.revenue_cents == 4000));
        // History is ascending, so its last entry is the newest day
        assert_eq!(
            overview.history.last().unwrap().date,
            day("2026-08-07")
        );
    }
}
