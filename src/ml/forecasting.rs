use chrono::Days;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::ml::statistics::mean;
use crate::models::forecast_point::ForecastPoint;
use crate::models::sales_history::HistoricalSeries;

pub const DEFAULT_FORECAST_HORIZON_DAYS: usize = 30;

/// Days summed into the monthly demand total, independent of the chart horizon.
pub const MONTHLY_FORECAST_DAYS: usize = 30;

/// Ordinary least-squares line through `(day_index, units_sold)`.
///
/// No seasonal term; only the straight-line trend is extrapolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations the line was fitted on
    pub observations: usize,
}

impl TrendModel {
    /// Fits the line over the entire series.
    #[instrument(skip(series), fields(observations = series.len()))]
    pub fn fit(series: &HistoricalSeries) -> Result<Self, ServiceError> {
        let n = series.len();
        if n < 2 {
            return Err(ServiceError::InsufficientData(format!(
                "trend fit needs at least 2 observations, got {}",
                n
            )));
        }

        let count = n as f64;
        let mean_x = (count - 1.0) / 2.0;
        let mean_y = mean(series.units()).unwrap_or_default();

        let (sxx, sxy) = series
            .units()
            .enumerate()
            .fold((0.0_f64, 0.0_f64), |(sxx, sxy), (i, y)| {
                let dx = i as f64 - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        debug!(slope, intercept, "Fitted linear demand trend");

        Ok(Self {
            slope,
            intercept,
            observations: n,
        })
    }

    pub fn predict(&self, day_index: usize) -> f64 {
        self.intercept + self.slope * day_index as f64
    }

    /// Extrapolates `horizon` days past the end of `series`.
    ///
    /// Offset `k` (1-based) is evaluated at day index `len - 1 + k` and dated
    /// `last_date + k`.
    pub fn forecast(
        &self,
        series: &HistoricalSeries,
        horizon: usize,
    ) -> Result<Vec<ForecastPoint>, ServiceError> {
        let last_date = series.last_date().ok_or_else(|| {
            ServiceError::InsufficientData("cannot forecast past an empty history".to_string())
        })?;
        let last_index = series.len() - 1;

        (1..=horizon)
            .map(|k| {
                let date = last_date.checked_add_days(Days::new(k as u64)).ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "forecast date overflows the calendar at offset {}",
                        k
                    ))
                })?;
                let day_index = last_index + k;
                Ok(ForecastPoint {
                    day_index,
                    date,
                    predicted_units: self.predict(day_index),
                })
            })
            .collect()
    }

    /// Whole units predicted over the [`MONTHLY_FORECAST_DAYS`] following `series`.
    pub fn monthly_total(&self, series: &HistoricalSeries) -> Result<i64, ServiceError> {
        let month = self.forecast(series, MONTHLY_FORECAST_DAYS)?;
        Ok(forecast_total_units(&month))
    }
}

/// Total predicted units over a forecast, truncated toward zero to whole units.
pub fn forecast_total_units(points: &[ForecastPoint]) -> i64 {
    points.iter().map(|p| p.predicted_units).sum::<f64>().trunc() as i64
}
