/*!
 * # Synthetic Demand Simulation
 *
 * Produces a deterministic daily sales history: a seasonal sine wave around a
 * base level plus Gaussian noise drawn from a seeded generator. The same
 * configuration always yields the same series within this crate; agreement
 * with other random number libraries is not attempted.
 */

use chrono::{Days, NaiveDate};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, instrument};
use validator::{Validate, ValidationError};

use crate::errors::ServiceError;
use crate::models::sales_history::{HistoricalSeries, SalesObservation};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_HORIZON_DAYS: u32 = 730;
pub const DEFAULT_BASE_DEMAND: f64 = 50.0;
pub const DEFAULT_AMPLITUDE: f64 = 20.0;
pub const DEFAULT_CYCLES: f64 = 4.0;
pub const DEFAULT_NOISE_STD_DEV: f64 = 10.0;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Shape of the simulated sales history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed for the noise generator
    pub seed: u64,
    /// Calendar date of day index 0
    pub start_date: NaiveDate,
    /// Number of simulated days
    #[validate(range(min = 1, max = 36500))]
    pub horizon_days: u32,
    /// Level the seasonal wave oscillates around (units/day)
    #[validate(custom = "validate_finite")]
    pub base_demand: f64,
    /// Peak deviation of the seasonal wave (units/day)
    #[validate(custom = "validate_finite")]
    pub amplitude: f64,
    /// Number of full seasonal cycles across the horizon
    #[validate(custom = "validate_finite")]
    pub cycles: f64,
    /// Standard deviation of the daily noise (units/day)
    #[validate(custom = "validate_non_negative")]
    pub noise_std_dev: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start_date: default_start_date(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            base_demand: DEFAULT_BASE_DEMAND,
            amplitude: DEFAULT_AMPLITUDE,
            cycles: DEFAULT_CYCLES,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
        }
    }
}

/// Memoization key for a generated series.
///
/// Floating point shape parameters are keyed by their bit patterns so that the
/// key stays `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub horizon_days: u32,
    shape_bits: [u64; 4],
}

impl SimulationConfig {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            seed: self.seed,
            start_date: self.start_date,
            horizon_days: self.horizon_days,
            shape_bits: [
                self.base_demand.to_bits(),
                self.amplitude.to_bits(),
                self.cycles.to_bits(),
                self.noise_std_dev.to_bits(),
            ],
        }
    }

    /// Noise-free seasonal demand for a day index.
    pub fn seasonal_level(&self, day_index: u32) -> f64 {
        let phase = 2.0 * PI * self.cycles * f64::from(day_index) / f64::from(self.horizon_days);
        self.base_demand + self.amplitude * phase.sin()
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("finite");
        err.message = Some("Must be a finite number".into());
        Err(err)
    }
}

fn validate_non_negative(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Must be a finite number greater than or equal to 0".into());
        Err(err)
    }
}

/// Generates the simulated sales history.
///
/// Each day's value is the seasonal level plus noise, truncated toward zero.
/// No floor is applied, so rare negative days are kept as-is.
#[instrument(skip(config), fields(seed = config.seed, horizon_days = config.horizon_days))]
pub fn generate_series(config: &SimulationConfig) -> Result<HistoricalSeries, ServiceError> {
    config.validate().map_err(|e| {
        ServiceError::invalid_parameter(format!("simulation configuration: {}", e))
    })?;

    let noise = Normal::new(0.0, config.noise_std_dev)
        .map_err(|e| ServiceError::invalid_parameter(format!("noise distribution: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut observations = Vec::with_capacity(config.horizon_days as usize);
    for day_index in 0..config.horizon_days {
        let date = config
            .start_date
            .checked_add_days(Days::new(u64::from(day_index)))
            .ok_or_else(|| {
                ServiceError::invalid_parameter(format!(
                    "simulation horizon overflows the calendar at day {}",
                    day_index
                ))
            })?;
        let raw = config.seasonal_level(day_index) + noise.sample(&mut rng);
        observations.push(SalesObservation {
            date,
            units_sold: raw.trunc() as i64,
        });
    }

    debug!(observations = observations.len(), "Generated synthetic sales history");
    HistoricalSeries::new(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_config_produces_two_years_from_new_year_2024() {
        let series = generate_series(&SimulationConfig::default()).unwrap();
        assert_eq!(series.len(), 730);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2025, 12, 30));
    }

    #[test]
    fn same_seed_same_series() {
        let config = SimulationConfig::default();
        let a = generate_series(&config).unwrap();
        let b = generate_series(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_changes_series() {
        let a = generate_series(&SimulationConfig::default()).unwrap();
        let b = generate_series(&SimulationConfig {
            seed: 7,
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn noise_free_series_truncates_the_seasonal_wave() {
        let config = SimulationConfig {
            noise_std_dev: 0.0,
            ..Default::default()
        };
        let series = generate_series(&config).unwrap();
        for (i, obs) in series.observations().iter().enumerate() {
            let expected = config.seasonal_level(i as u32).trunc() as i64;
            assert_eq!(obs.units_sold, expected, "day {}", i);
        }
        // Quarter of the first cycle sits on the crest of the wave.
        let crest = series.observations()[730 / 16].units_sold;
        assert!(crest >= 69 && crest <= 70);
    }

    #[test]
    fn truncation_rounds_toward_zero_for_negative_values() {
        let config = SimulationConfig {
            base_demand: -0.5,
            amplitude: 0.0,
            noise_std_dev: 0.0,
            horizon_days: 3,
            ..Default::default()
        };
        let series = generate_series(&config).unwrap();
        assert!(series.observations().iter().all(|o| o.units_sold == 0));
    }

    #[test]
    fn simulated_mean_is_close_to_base_demand() {
        let series = generate_series(&SimulationConfig::default()).unwrap();
        let mean = series.units().sum::<f64>() / series.len() as f64;
        // Four whole cycles cancel the wave; truncation biases slightly downward.
        assert!((mean - 50.0).abs() < 2.5, "mean was {}", mean);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let config = SimulationConfig {
            horizon_days: 0,
            ..Default::default()
        };
        assert_matches!(
            generate_series(&config),
            Err(ServiceError::InvalidParameter(_))
        );
    }

    #[test]
    fn negative_noise_is_rejected() {
        let config = SimulationConfig {
            noise_std_dev: -1.0,
            ..Default::default()
        };
        assert_matches!(
            generate_series(&config),
            Err(ServiceError::InvalidParameter(_))
        );
    }

    #[test]
    fn series_key_tracks_every_generation_input() {
        let base = SimulationConfig::default();
        assert_eq!(base.series_key(), SimulationConfig::default().series_key());

        let shifted = SimulationConfig {
            amplitude: 25.0,
            ..Default::default()
        };
        assert_ne!(base.series_key(), shifted.series_key());
    }
}
