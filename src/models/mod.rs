// Demand data
pub mod forecast_point;
pub mod sales_history;

// Operator input
pub mod planning_parameters;

pub use forecast_point::ForecastPoint;
pub use planning_parameters::PlanningParameters;
pub use sales_history::{HistoricalSeries, HistoryPoint, SalesObservation};
