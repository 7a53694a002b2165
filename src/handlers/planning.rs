use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{planning_parameters::PlanningParameters, sales_history::HistoryPoint},
    services::{
        dashboard::DashboardView,
        inventory_policy::{calculate_policy, InventoryPolicy, PolicyInputs},
        planning::DemandForecast,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the planning Router scoped under `/api/v1/planning`.
pub fn planning_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/history", get(get_history))
        .route("/forecast", get(get_forecast))
        .route("/policy", post(calculate_policy_handler))
}

/// Operator parameters; anything omitted falls back to the configured defaults
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Fixed cost per order
    pub order_cost: Option<f64>,
    /// Annual holding cost per unit
    pub holding_cost: Option<f64>,
    /// Replenishment lead time in days
    #[param(minimum = 1, maximum = 14)]
    pub lead_time_days: Option<u32>,
    /// Service level in percent (80, 85, 90, 95, 98 or 99)
    pub service_level_pct: Option<u32>,
}

impl DashboardQuery {
    pub fn resolve(&self, defaults: &PlanningParameters) -> PlanningParameters {
        PlanningParameters {
            order_cost: self.order_cost.unwrap_or(defaults.order_cost),
            holding_cost: self.holding_cost.unwrap_or(defaults.holding_cost),
            lead_time_days: self.lead_time_days.unwrap_or(defaults.lead_time_days),
            service_level_pct: self.service_level_pct.unwrap_or(defaults.service_level_pct),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Number of most recent days to return (default: configured chart window)
    #[param(minimum = 1)]
    pub days: Option<usize>,
}

/// Explicit inputs for the stand-alone policy calculator
#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct PolicyRequest {
    #[validate(range(min = 0.0))]
    #[schema(example = 1500.0)]
    pub monthly_forecast_total: f64,
    #[validate(range(min = 0.0))]
    #[schema(example = 10.0)]
    pub historical_std_dev: f64,
    #[validate(range(min = 0.0))]
    #[schema(example = 100.0)]
    pub order_cost: f64,
    #[schema(example = 5.0)]
    pub holding_cost: f64,
    #[validate(range(min = 1, max = 365))]
    #[schema(example = 5)]
    pub lead_time_days: u32,
    #[schema(example = 95.0)]
    pub service_level_pct: f64,
}

impl From<PolicyRequest> for PolicyInputs {
    fn from(req: PolicyRequest) -> Self {
        PolicyInputs {
            monthly_forecast_total: req.monthly_forecast_total,
            historical_std_dev: req.historical_std_dev,
            order_cost: req.order_cost,
            holding_cost: req.holding_cost,
            lead_time_days: req.lead_time_days,
            service_level_pct: req.service_level_pct,
        }
    }
}

/// Full dashboard payload for one set of operator parameters
#[utoipa::path(
    get,
    path = "/api/v1/planning/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard computed", body = ApiResponse<DashboardView>),
        (status = 400, description = "Invalid planning parameters", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough history to fit a trend", body = crate::errors::ErrorResponse)
    ),
    tag = "Planning"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult<DashboardView> {
    let Query(query) = query?;
    let parameters = query.resolve(&state.config.planning_defaults);
    let result = state.planning.compute(&parameters)?;
    let view = DashboardView::from_result(&result, state.planning.history_window_days());

    info!(
        eoq_units = view.headline.eoq_units,
        reorder_point_units = view.headline.reorder_point_units,
        "Dashboard served"
    );
    Ok(Json(ApiResponse::success(view)))
}

/// Most recent days of simulated sales history
#[utoipa::path(
    get,
    path = "/api/v1/planning/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History window", body = ApiResponse<Vec<HistoryPoint>>),
        (status = 400, description = "Invalid window", body = crate::errors::ErrorResponse)
    ),
    tag = "Planning"
)]
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Vec<HistoryPoint>> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(state.planning.history_window_days());
    if days == 0 {
        return Err(ServiceError::ValidationError(
            "Days must be at least 1".to_string(),
        ));
    }

    let history = state.planning.history()?;
    Ok(Json(ApiResponse::success(history.tail(days))))
}

/// Trend line and forecast points
#[utoipa::path(
    get,
    path = "/api/v1/planning/forecast",
    responses(
        (status = 200, description = "Demand forecast", body = ApiResponse<DemandForecast>),
        (status = 422, description = "Not enough history to fit a trend", body = crate::errors::ErrorResponse)
    ),
    tag = "Planning"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
) -> ApiResult<DemandForecast> {
    let forecast = state.planning.forecast()?;
    Ok(Json(ApiResponse::success(forecast)))
}

/// EOQ, safety stock and reorder point for explicit inputs
#[utoipa::path(
    post,
    path = "/api/v1/planning/policy",
    request_body = PolicyRequest,
    responses(
        (status = 200, description = "Policy calculated", body = ApiResponse<InventoryPolicy>),
        (status = 400, description = "Invalid inputs", body = crate::errors::ErrorResponse)
    ),
    tag = "Planning"
)]
pub async fn calculate_policy_handler(
    request: Result<Json<PolicyRequest>, JsonRejection>,
) -> ApiResult<InventoryPolicy> {
    let Json(request) = request?;
    request.validate()?;
    let policy = calculate_policy(&request.into())?;
    Ok(Json(ApiResponse::success(policy)))
}
