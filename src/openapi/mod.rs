use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartStock Planning API",
        version = "1.0.0",
        description = r#"
# SmartStock Inventory Planning API

Demand forecasting and replenishment planning over a simulated sales history.

## Features

- **Sales history**: deterministic synthetic daily sales
- **Forecast**: linear trend extrapolated 30 days ahead
- **Policy**: Economic Order Quantity, safety stock and reorder point
- **Dashboard**: chart series and headline figures in one payload

## Error Handling

Errors use a consistent JSON body:

```json
{
  "error": "Bad Request",
  "message": "Invalid parameter: holding_cost must be greater than zero (got 0)",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Planning", description = "Forecasting and inventory policy endpoints")
    ),
    paths(
        crate::handlers::planning::get_dashboard,
        crate::handlers::planning::get_history,
        crate::handlers::planning::get_forecast,
        crate::handlers::planning::calculate_policy_handler,
    ),
    components(
        schemas(
            crate::models::planning_parameters::PlanningParameters,
            crate::models::sales_history::HistoryPoint,
            crate::models::forecast_point::ForecastPoint,
            crate::ml::forecasting::TrendModel,
            crate::services::planning::DemandForecast,
            crate::services::inventory_policy::InventoryPolicy,
            crate::services::dashboard::DashboardView,
            crate::services::dashboard::HeadlineFigures,
            crate::services::dashboard::DemandChart,
            crate::services::dashboard::BufferBand,
            crate::handlers::planning::PolicyRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDocV1::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("SmartStock Planning API"));
        assert!(json.contains("/api/v1/planning/dashboard"));
        assert!(json.contains("/api/v1/planning/policy"));
        assert!(json.contains("DashboardView"));
    }
}
