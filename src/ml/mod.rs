/*!
 * # Demand Modelling
 *
 * Synthetic sales history, the linear trend forecaster and the statistics
 * both rely on.
 */

/// Seeded synthetic sales history
pub mod demand_simulation;

/// Linear trend forecaster
pub mod forecasting;

/// Mean, standard deviation and normal quantiles
pub mod statistics;

pub use demand_simulation::{generate_series, SeriesKey, SimulationConfig};
pub use forecasting::{forecast_total_units, TrendModel};
