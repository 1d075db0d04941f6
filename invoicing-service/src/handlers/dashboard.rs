//! Dashboard aggregation handlers. All of these are pure reads computed over
//! a single snapshot of the data file.

use axum::extract::{Json, Query, State};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use billing_core::dashboard::{
    self, ClientStats, Dashboard, PeriodGranularity, PeriodRevenue, ServiceStats,
};
use billing_core::AppError;

use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
pub struct RevenueByPeriodQuery {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// GET /api/dashboard
pub async fn overview(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let snapshot = state.ledger.store().load().await;
    let today = Utc::now().date_naive();

    Ok(Json(DashboardResponse {
        dashboard: dashboard::build_dashboard(&snapshot, today),
    }))
}

/// GET /api/dashboard/client-stats
pub async fn client_stats(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<Vec<ClientStats>> {
    let snapshot = state.ledger.store().load().await;
    Json(dashboard::client_stats(&snapshot))
}

/// GET /api/dashboard/service-stats
pub async fn service_stats(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<Vec<ServiceStats>> {
    let snapshot = state.ledger.store().load().await;
    Json(dashboard::service_stats(&snapshot))
}

/// GET /api/dashboard/revenue-by-period?period=month|quarter&year=YYYY
pub async fn revenue_by_period(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(query): Query<RevenueByPeriodQuery>,
) -> Json<Vec<PeriodRevenue>> {
    let snapshot = state.ledger.store().load().await;
    let granularity = query
        .period
        .as_deref()
        .map(PeriodGranularity::from_string)
        .unwrap_or_default();
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    Json(dashboard::revenue_by_period(&snapshot, year, granularity))
}
