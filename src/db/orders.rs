use sqlx::PgPool;

use crate::models::{DailyRevenue, Order, RevenueSummary};

pub async fn revenue_summary(pool: &PgPool) -> Result<RevenueSummary, sqlx::Error> {
    sqlx::query_as::<_, RevenueSummary>(
        "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT AS total_cents,
                COUNT(*)::BIGINT AS order_count,
                COALESCE(AVG(amount_cents), 0)::BIGINT AS average_order_cents
         FROM orders WHERE status = 'paid'",
    )
    .fetch_one(pool)
    .await
}

/// Revenue per calendar day over the last 7 days, most recent first.
/// Days without orders are absent rather than zero-filled.
pub async fn daily_revenue(pool: &PgPool) -> Result<Vec<DailyRevenue>, sqlx::Error> {
    sqlx::query_as::<_, DailyRevenue>(
        "SELECT created_at::DATE AS day,
                SUM(amount_cents)::BIGINT AS revenue_cents,
                COUNT(*)::BIGINT AS orders
         FROM orders
         WHERE status = 'paid' AND created_at > now() - INTERVAL '7 days'
         GROUP BY day ORDER BY day DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
}
