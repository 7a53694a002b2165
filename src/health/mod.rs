/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`): status, version and uptime
 * - Liveness check (`/health/live`): the process answers
 * - Detailed health check (`/health/details`): per-component status
 * - Version (`/health/version`)
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::metrics::{self, MetricsSnapshot};
use crate::AppState;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: HashMap<String, HealthDetail>,
    pub metrics: MetricsSnapshot,
}

fn detail(status: HealthStatus, message: Option<String>) -> HealthDetail {
    HealthDetail {
        status,
        message,
        timestamp: Utc::now(),
    }
}

/// Probes the forecasting pipeline and the series cache.
pub fn collect_health(state: &AppState) -> HealthInfo {
    let mut details = HashMap::new();

    let pipeline = match state.planning.forecast() {
        Ok(forecast) => detail(
            HealthStatus::Up,
            Some(format!("{} forecast points", forecast.points.len())),
        ),
        Err(err) => {
            warn!("Pipeline health check failed: {}", err);
            detail(HealthStatus::Down, Some(err.response_message()))
        }
    };
    details.insert("pipeline".to_string(), pipeline);

    let cache = match state.planning.cache() {
        None => detail(HealthStatus::Up, Some("disabled".to_string())),
        Some(cache) => match cache.len() {
            Ok(entries) => detail(HealthStatus::Up, Some(format!("{} cached series", entries))),
            Err(err) => {
                warn!("Series cache health check failed: {}", err);
                detail(HealthStatus::Degraded, Some(err.to_string()))
            }
        },
    };
    details.insert("series_cache".to_string(), cache);

    let status = if details.values().any(|d| d.status == HealthStatus::Down) {
        HealthStatus::Down
    } else if details.values().any(|d| d.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Up
    };

    HealthInfo {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        details,
        metrics: metrics::snapshot(),
    }
}

fn status_code(status: &HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check endpoint called");
    let health = collect_health(&state);

    (
        status_code(&health.status),
        Json(json!({
            "status": health.status,
            "version": health.version,
            "uptime_seconds": health.uptime_seconds,
            "timestamp": health.timestamp,
        })),
    )
}

/// Liveness check endpoint
pub async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "uptime_seconds": state.uptime_seconds(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Detailed health check endpoint
pub async fn detailed_health(State(state): State<AppState>) -> impl IntoResponse {
    let health = collect_health(&state);
    (status_code(&health.status), Json(health))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness_check))
        .route("/details", get(detailed_health))
        .route("/version", get(version_info))
}
