//! SmartStock Planning Library
//!
//! Demand simulation, trend forecasting and replenishment policy
//! (Economic Order Quantity, safety stock, reorder point), served over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod cache;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod middleware_helpers;
pub mod ml;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use crate::cache::InMemorySeriesCache;
use crate::services::planning::PlanningService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub planning: Arc<PlanningService>,
    pub config: config::AppConfig,
    pub started_at: Instant,
}

impl AppState {
    /// Builds the planning service from configuration, with the in-memory
    /// series cache when enabled.
    pub fn new(config: config::AppConfig) -> Self {
        let mut planning = PlanningService::from_config(&config);
        if config.series_cache_enabled {
            planning = planning.with_cache(Arc::new(InMemorySeriesCache::new()));
        }
        Self {
            planning: Arc::new(planning),
            config,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new().nest("/planning", handlers::planning_routes())
}

async fn metrics_endpoint() -> Response {
    match metrics::export_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            ::tracing::error!("Failed to export metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Full application router with tracing and request-id layers.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .route("/metrics", get(metrics_endpoint))
        .route(openapi::OPENAPI_JSON_PATH, get(openapi::openapi_json))
        .nest("/api/v1", api_v1_routes())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn state_respects_cache_toggle() {
        let cached = AppState::new(config::AppConfig::default());
        assert!(cached.planning.cache().is_some());

        let uncached = AppState::new(config::AppConfig {
            series_cache_enabled: false,
            ..Default::default()
        });
        assert!(uncached.planning.cache().is_none());
    }
}
