//! Dashboard statistics endpoint for the back office.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{compute_dashboard_stats, DashboardStats};
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: DashboardStats,
}

/// Get dashboard statistics
///
/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = compute_dashboard_stats(&state.db).await.map_err(|e| {
        tracing::error!("Failed to compute dashboard stats: {}", e);
        ApiError::database("Failed to compute statistics")
    })?;

    Ok(Json(StatsResponse {
        success: true,
        data: stats,
    }))
}
