/*!
 * # Dashboard View
 *
 * Turns a [`PlanningResult`] into the payload a dashboard renders: the
 * recent history window, the forecast overlay, the reorder point threshold,
 * the buffer band and the headline figures in whole units.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{
        forecast_point::ForecastPoint, planning_parameters::PlanningParameters,
        sales_history::HistoryPoint,
    },
    services::{inventory_policy::InventoryPolicy, planning::PlanningResult},
};

/// Figures shown in the metric tiles
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HeadlineFigures {
    /// Forecast demand over the next 30 days
    pub monthly_forecast_units: i64,
    pub eoq_units: i64,
    pub safety_stock_units: i64,
    pub reorder_point_units: i64,
    pub demand_std_dev: f64,
    pub policy: InventoryPolicy,
}

/// Shaded region between average daily demand and the reorder point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct BufferBand {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemandChart {
    pub history: Vec<HistoryPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub reorder_point: f64,
    /// Absent when the forecast horizon is empty
    pub buffer_band: Option<BufferBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub parameters: PlanningParameters,
    pub headline: HeadlineFigures,
    pub chart: DemandChart,
    pub advisory: String,
    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    pub fn from_result(result: &PlanningResult, history_window_days: usize) -> Self {
        let policy = result.policy;
        let headline = HeadlineFigures {
            monthly_forecast_units: result.forecast.monthly_forecast_total,
            eoq_units: whole_units(policy.eoq),
            safety_stock_units: whole_units(policy.safety_stock),
            reorder_point_units: whole_units(policy.reorder_point),
            demand_std_dev: result.demand_std_dev,
            policy,
        };

        let forecast = result.forecast.points.clone();
        let buffer_band = match (forecast.first(), forecast.last()) {
            (Some(first), Some(last)) => Some(BufferBand {
                start_date: first.date,
                end_date: last.date,
                lower: policy.average_daily_demand,
                upper: policy.reorder_point,
            }),
            _ => None,
        };

        let advisory = advisory_message(
            result.parameters.service_level_pct,
            headline.safety_stock_units,
            headline.eoq_units,
        );

        Self {
            parameters: result.parameters,
            headline,
            chart: DemandChart {
                history: result.history.tail(history_window_days),
                forecast,
                reorder_point: policy.reorder_point,
                buffer_band,
            },
            advisory,
            generated_at: Utc::now(),
        }
    }
}

/// Truncates toward zero, the way the tiles display quantities.
pub fn whole_units(value: f64) -> i64 {
    value.trunc() as i64
}

pub fn advisory_message(service_level_pct: u32, safety_stock_units: i64, eoq_units: i64) -> String {
    format!(
        "To maintain a {}% service level, hold {} units of safety stock. \
         Order {} units per replenishment to minimise total cost.",
        service_level_pct, safety_stock_units, eoq_units
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::planning::PlanningService;

    fn default_view() -> DashboardView {
        let result = PlanningService::default()
            .compute(&PlanningParameters::default())
            .unwrap();
        DashboardView::from_result(&result, 60)
    }

    #[test]
    fn chart_windows_have_expected_lengths() {
        let view = default_view();
        assert_eq!(view.chart.history.len(), 60);
        assert_eq!(view.chart.forecast.len(), 30);
        assert_eq!(view.chart.history.last().unwrap().day_index, 729);
        assert_eq!(view.chart.forecast[0].day_index, 730);
    }

    #[test]
    fn buffer_band_spans_forecast_dates() {
        let view = default_view();
        let band = view.chart.buffer_band.unwrap();
        assert_eq!(band.start_date, view.chart.forecast[0].date);
        assert_eq!(band.end_date, view.chart.forecast[29].date);
        assert_eq!(band.lower, view.headline.policy.average_daily_demand);
        assert_eq!(band.upper, view.chart.reorder_point);
    }

    #[test]
    fn headline_units_are_truncated() {
        let view = default_view();
        let policy = view.headline.policy;
        assert_eq!(view.headline.eoq_units, policy.eoq.trunc() as i64);
        assert_eq!(
            view.headline.reorder_point_units,
            policy.reorder_point.trunc() as i64
        );
        assert!(view.advisory.contains("95% service level"));
        assert!(view
            .advisory
            .contains(&format!("hold {} units", view.headline.safety_stock_units)));
    }

    #[test]
    fn whole_units_truncates_toward_zero() {
        assert_eq!(whole_units(848.53), 848);
        assert_eq!(whole_units(-3.7), -3);
    }

    #[test]
    fn advisory_wording() {
        assert_eq!(
            advisory_message(95, 36, 848),
            "To maintain a 95% service level, hold 36 units of safety stock. \
             Order 848 units per replenishment to minimise total cost."
        );
    }
}
