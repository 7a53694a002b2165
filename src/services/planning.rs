use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    cache::SeriesCache,
    config::AppConfig,
    errors::ServiceError,
    metrics,
    ml::{
        forecasting::DEFAULT_FORECAST_HORIZON_DAYS, generate_series, statistics::sample_std_dev,
        SimulationConfig, TrendModel,
    },
    models::{
        forecast_point::ForecastPoint, planning_parameters::PlanningParameters,
        sales_history::HistoricalSeries,
    },
    services::inventory_policy::{calculate_policy, InventoryPolicy, PolicyInputs},
};

pub const DEFAULT_HISTORY_WINDOW_DAYS: usize = 60;

/// Trend forecast over the configured horizon
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DemandForecast {
    pub trend: TrendModel,
    pub points: Vec<ForecastPoint>,
    /// Sum of the first 30 forecast days, truncated to whole units.
    /// Does not depend on how many `points` are charted.
    pub monthly_forecast_total: i64,
}

/// Everything one pipeline run derives from the history and the parameters
#[derive(Debug, Clone)]
pub struct PlanningResult {
    pub parameters: PlanningParameters,
    pub history: Arc<HistoricalSeries>,
    pub forecast: DemandForecast,
    /// Sample standard deviation of the full history
    pub demand_std_dev: f64,
    pub policy: InventoryPolicy,
}

/// Runs generator -> forecaster -> calculator.
///
/// Each call recomputes every derived figure. Only the generated history is
/// memoized, and only when a cache is injected.
#[derive(Clone)]
pub struct PlanningService {
    simulation: SimulationConfig,
    forecast_horizon_days: usize,
    history_window_days: usize,
    cache: Option<Arc<dyn SeriesCache>>,
}

impl PlanningService {
    pub fn new(simulation: SimulationConfig) -> Self {
        Self {
            simulation,
            forecast_horizon_days: DEFAULT_FORECAST_HORIZON_DAYS,
            history_window_days: DEFAULT_HISTORY_WINDOW_DAYS,
            cache: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.simulation.clone())
            .with_forecast_horizon(config.forecast_horizon_days as usize)
            .with_history_window(config.history_window_days as usize)
    }

    pub fn with_cache(mut self, cache: Arc<dyn SeriesCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_forecast_horizon(mut self, days: usize) -> Self {
        self.forecast_horizon_days = days;
        self
    }

    pub fn with_history_window(mut self, days: usize) -> Self {
        self.history_window_days = days;
        self
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    pub fn forecast_horizon_days(&self) -> usize {
        self.forecast_horizon_days
    }

    pub fn history_window_days(&self) -> usize {
        self.history_window_days
    }

    pub fn cache(&self) -> Option<&Arc<dyn SeriesCache>> {
        self.cache.as_ref()
    }

    /// Returns the simulated history, from the cache when one is injected.
    ///
    /// A failing cache is logged and bypassed; generation is always possible.
    pub fn history(&self) -> Result<Arc<HistoricalSeries>, ServiceError> {
        let key = self.simulation.series_key();

        if let Some(cache) = &self.cache {
            match cache.get(&key) {
                Ok(Some(series)) => {
                    debug!(seed = key.seed, "Sales history served from cache");
                    return Ok(series);
                }
                Ok(None) => {}
                Err(err) => warn!("Series cache lookup failed: {}", err),
            }
        }

        let series = Arc::new(generate_series(&self.simulation)?);
        info!(
            observations = series.len(),
            seed = key.seed,
            "Generated sales history"
        );

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.insert(key, series.clone()) {
                warn!("Series cache insert failed: {}", err);
            }
        }
        Ok(series)
    }

    /// Fits the trend over `history` and extrapolates the configured horizon.
    pub fn forecast_from(&self, history: &HistoricalSeries) -> Result<DemandForecast, ServiceError> {
        let trend = TrendModel::fit(history)?;
        let points = trend.forecast(history, self.forecast_horizon_days)?;
        let monthly_forecast_total = trend.monthly_total(history)?;
        Ok(DemandForecast {
            trend,
            points,
            monthly_forecast_total,
        })
    }

    pub fn forecast(&self) -> Result<DemandForecast, ServiceError> {
        let history = self.history()?;
        self.forecast_from(&history)
    }

    /// Full recomputation for one set of operator parameters.
    #[instrument(skip(self), fields(lead_time_days = parameters.lead_time_days, service_level_pct = parameters.service_level_pct))]
    pub fn compute(&self, parameters: &PlanningParameters) -> Result<PlanningResult, ServiceError> {
        let started = Instant::now();
        let result = self.run_pipeline(parameters);
        metrics::record_computation(
            result.as_ref().map(|_| ()).map_err(ServiceError::kind),
            started.elapsed(),
        );

        if let Err(err) = &result {
            warn!(error_type = err.kind(), "Planning computation failed: {}", err);
        }
        result
    }

    fn run_pipeline(&self, parameters: &PlanningParameters) -> Result<PlanningResult, ServiceError> {
        parameters.validate().map_err(|e| {
            ServiceError::invalid_parameter(format!("planning parameters: {}", e))
        })?;

        let history = self.history()?;
        let forecast = self.forecast_from(&history)?;
        let demand_std_dev = sample_std_dev(history.units())?;

        let policy = calculate_policy(&PolicyInputs {
            monthly_forecast_total: forecast.monthly_forecast_total as f64,
            historical_std_dev: demand_std_dev,
            order_cost: parameters.order_cost,
            holding_cost: parameters.holding_cost,
            lead_time_days: parameters.lead_time_days,
            service_level_pct: f64::from(parameters.service_level_pct),
        })?;

        info!(
            monthly_forecast_total = forecast.monthly_forecast_total,
            eoq = policy.eoq,
            safety_stock = policy.safety_stock,
            reorder_point = policy.reorder_point,
            "Planning computation completed"
        );

        Ok(PlanningResult {
            parameters: *parameters,
            history,
            forecast,
            demand_std_dev,
            policy,
        })
    }
}

impl Default for PlanningService {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
