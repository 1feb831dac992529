//! # Analytics & Forecast Types
//!
//! Value types for the historical series and the naive moving-average
//! forecast.
//!
//! The series come out of SQL aggregation in levain-db; the forecast math
//! lives here because it is pure. All series are **ascending by calendar
//! date** and sparse: a day with no sales is absent, not zero. The forecast
//! relies on that ordering when it takes the "last window" of history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Series Points
// =============================================================================

/// Revenue of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

impl DailyPoint {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Units sold on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuantityPoint {
    pub date: NaiveDate,
    pub quantity: i64,
}

/// Combined daily row feeding the CSV report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailySummary {
    pub date: NaiveDate,
    pub revenue_cents: i64,
    pub quantity: i64,
}

impl DailySummary {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

// =============================================================================
// Top Sellers
// =============================================================================

/// Aggregate of one product over a report range, ranked by units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TopSeller {
    pub product_name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

impl TopSeller {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    /// Average realized unit price (revenue ÷ quantity), rounded to the
    /// nearest cent; zero when nothing was sold.
    pub fn avg_price(&self) -> Money {
        if self.quantity == 0 {
            return Money::zero();
        }
        self.revenue().divide_rounded(self.quantity)
    }
}

// =============================================================================
// Forecast
// =============================================================================

/// One projected future day. `day` counts from 1 (tomorrow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub day: u32,
    pub revenue_cents: i64,
}

impl ForecastPoint {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Naive moving-average forecast.
///
/// Averages the revenue of the last `window` entries of `history` (which is
/// ascending by date, so "last" means most recent) and repeats that single
/// value for each of the `horizon` future days. A flat line, deliberately:
/// with a small bakery's volumes anything fancier is noise.
///
/// Empty history projects flat zero. The average is rounded to whole cents.
///
/// ## Example
/// ```rust
/// use levain_core::forecast::{moving_average_forecast, DailyPoint};
///
/// let history: Vec<DailyPoint> = (1..=9)
///     .map(|d| DailyPoint {
///         date: format!("2026-08-0{}", d).parse().unwrap(),
///         revenue_cents: d * 1000,
///     })
///     .collect();
///
/// let points = moving_average_forecast(&history, 7, 7);
/// assert_eq!(points.len(), 7);
/// // last 7 of 3000..=9000 average to 6000
/// assert!(points.iter().all(|p| p.revenue_cents == 6000));
/// ```
pub fn moving_average_forecast(
    history: &[DailyPoint],
    horizon: u32,
    window: usize,
) -> Vec<ForecastPoint> {
    if history.is_empty() {
        return (1..=horizon)
            .map(|day| ForecastPoint {
                day,
                revenue_cents: 0,
            })
            .collect();
    }

    let tail_start = history.len().saturating_sub(window.max(1));
    let tail: Vec<Money> = history[tail_start..].iter().map(|p| p.revenue()).collect();
    let avg = Money::mean(&tail);

    (1..=horizon)
        .map(|day| ForecastPoint {
            day,
            revenue_cents: avg.cents(),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
