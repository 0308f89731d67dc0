use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_email: String,
    pub product_name: String,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the revenue-per-day aggregate.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue_cents: i64,
    pub orders: i64,
}

/// Paid-order totals for the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_cents: i64,
    pub order_count: i64,
    pub average_order_cents: i64,
}
