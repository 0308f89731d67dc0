use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{DailyRevenue, Order};
use crate::state::SharedState;

#[derive(Serialize)]
pub struct RevenueResponse {
    pub total_cents: i64,
    pub order_count: i64,
    pub average_order_cents: i64,
    pub daily: Vec<DailyRevenue>,
    pub recent: Vec<Order>,
}

/// Paid-order revenue rollup for the admin dashboard. Read-only.
pub async fn revenue(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<RevenueResponse>, AppError> {
    let summary = db::orders::revenue_summary(&state.pool).await?;
    let daily = db::orders::daily_revenue(&state.pool).await?;
    let recent = db::orders::recent(&state.pool, 10).await?;

    Ok(Json(RevenueResponse {
        total_cents: summary.total_cents,
        order_count: summary.order_count,
        average_order_cents: summary.average_order_cents,
        daily,
        recent,
    }))
}
