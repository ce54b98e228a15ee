use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use super::service::{HealthIndexService, MAX_HISTORY_DAYS, MIN_HISTORY_DAYS};
use super::views::{HistorySeries, LatestSnapshot};
use crate::error::AppError;

pub const DEFAULT_HISTORY_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    #[serde(default)]
    days: Option<i64>,
}

/// Router builder exposing the index snapshot and history endpoints.
pub fn index_router(service: Arc<HealthIndexService>) -> Router {
    Router::new()
        .route("/api/v1/health", get(liveness_handler))
        .route("/api/v1/rhi/latest", get(latest_handler))
        .route("/api/v1/rhi/history", get(history_handler))
        .with_state(service)
}

pub(crate) async fn liveness_handler() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

pub(crate) async fn latest_handler(
    State(service): State<Arc<HealthIndexService>>,
) -> Json<LatestSnapshot> {
    Json(service.latest())
}

pub(crate) async fn history_handler(
    State(service): State<Arc<HealthIndexService>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistorySeries>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let days = u32::try_from(days)
        .ok()
        .filter(|days| (MIN_HISTORY_DAYS..=MAX_HISTORY_DAYS).contains(days))
        .ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "days must be between {MIN_HISTORY_DAYS} and {MAX_HISTORY_DAYS}, got {days}"
            ))
        })?;

    Ok(Json(service.history(days)))
}
