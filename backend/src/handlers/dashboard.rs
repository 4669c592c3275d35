//! Dashboard handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{Certificate, DashboardStats, MonthlyCount};

use crate::AppState;

const DEFAULT_MONTHS: u32 = 6;
const MAX_MONTHS: u32 = 36;
const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

/// Aggregate counters
pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.registry.read().await.stats())
}

/// Certificates issued per month, oldest month first
pub async fn monthly_issuance(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Json<Vec<MonthlyCount>> {
    let months = query.months.unwrap_or(DEFAULT_MONTHS).clamp(1, MAX_MONTHS);
    Json(state.registry.read().await.monthly_issuance(months))
}

/// Certificates close to expiry, soonest first
pub async fn upcoming_renewals(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Json<Vec<Certificate>> {
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    Json(state.registry.read().await.upcoming_renewals(limit))
}
