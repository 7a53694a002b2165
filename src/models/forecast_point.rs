use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Predicted demand for one future day.
///
/// Predictions come straight from the fitted line and are not clamped, so a
/// falling trend can produce negative values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastPoint {
    /// Day index continuing the historical series (last index + offset)
    pub day_index: usize,
    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub date: NaiveDate,
    pub predicted_units: f64,
}
