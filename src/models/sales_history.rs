use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Units sold on a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesObservation {
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,
    /// May be negative for noisy synthetic data; no floor is applied.
    pub units_sold: i64,
}

/// An observation together with its position in the series, which is the
/// regression's independent variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryPoint {
    pub day_index: usize,
    #[schema(value_type = String, format = Date, example = "2025-12-30")]
    pub date: NaiveDate,
    pub units_sold: i64,
}

/// Contiguous daily sales history.
///
/// Dates advance by exactly one day per observation and the day index of an
/// observation is its position in the series. The series is immutable once
/// built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    observations: Vec<SalesObservation>,
}

impl HistoricalSeries {
    /// Builds a series, rejecting gaps, duplicates or out-of-order dates.
    pub fn new(observations: Vec<SalesObservation>) -> Result<Self, ServiceError> {
        for (position, pair) in observations.windows(2).enumerate() {
            let expected = pair[0].date.checked_add_days(Days::new(1));
            if expected != Some(pair[1].date) {
                return Err(ServiceError::invalid_parameter(format!(
                    "sales history is not a contiguous daily sequence at index {} ({} followed by {})",
                    position + 1,
                    pair[0].date,
                    pair[1].date
                )));
            }
        }
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[SalesObservation] {
        &self.observations
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Unit counts as floating point values, in day-index order.
    pub fn units(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.units_sold as f64)
    }

    pub fn points(&self) -> impl Iterator<Item = HistoryPoint> + '_ {
        self.observations
            .iter()
            .enumerate()
            .map(|(day_index, o)| HistoryPoint {
                day_index,
                date: o.date,
                units_sold: o.units_sold,
            })
    }

    /// The most recent `days` observations (or the whole series if shorter).
    pub fn tail(&self, days: usize) -> Vec<HistoryPoint> {
        let skip = self.len().saturating_sub(days);
        self.points().skip(skip).collect()
    }
}
