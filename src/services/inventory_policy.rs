/*!
 * # Inventory Policy Calculator
 *
 * Textbook replenishment formulas:
 *
 * - Economic Order Quantity: `sqrt(2 * annual_demand * order_cost / holding_cost)`
 * - Safety stock: `z * demand_std_dev * sqrt(lead_time_days)`
 * - Reorder point: `average_daily_demand * lead_time_days + safety_stock`
 *
 * Demand is expressed as a 30-day forecast total; annual demand is twelve of
 * those and daily demand one thirtieth.
 */

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::ml::statistics::inverse_standard_normal_cdf;

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Inputs of a policy calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PolicyInputs {
    /// Forecast demand for the next 30 days (units)
    #[schema(example = 1500.0)]
    pub monthly_forecast_total: f64,
    /// Sample standard deviation of daily historical demand (units)
    #[schema(example = 10.0)]
    pub historical_std_dev: f64,
    /// Fixed cost per order (currency)
    #[schema(example = 100.0)]
    pub order_cost: f64,
    /// Annual holding cost per unit (currency), must be positive
    #[schema(example = 5.0)]
    pub holding_cost: f64,
    /// Replenishment lead time in days
    #[schema(example = 5)]
    pub lead_time_days: u32,
    /// Target service level in percent, strictly between 0 and 100
    #[schema(example = 95.0)]
    pub service_level_pct: f64,
}

/// Recommended ordering parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryPolicy {
    pub average_daily_demand: f64,
    pub annual_demand: f64,
    /// Economic Order Quantity (units per order)
    pub eoq: f64,
    /// Standard normal quantile of the service level
    pub z_score: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
}

/// Economic Order Quantity.
///
/// Fails when the holding cost is not strictly positive or when the
/// quantity under the square root is negative (negative demand or cost).
pub fn economic_order_quantity(
    annual_demand: f64,
    order_cost: f64,
    holding_cost: f64,
) -> Result<f64, ServiceError> {
    if !holding_cost.is_finite() || holding_cost <= 0.0 {
        return Err(ServiceError::invalid_parameter(format!(
            "holding_cost must be greater than zero (got {})",
            holding_cost
        )));
    }

    let radicand = 2.0 * annual_demand * order_cost / holding_cost;
    if !radicand.is_finite() || radicand < 0.0 {
        return Err(ServiceError::invalid_parameter(format!(
            "annual demand ({}) and order cost ({}) must not be negative",
            annual_demand, order_cost
        )));
    }
    Ok(radicand.sqrt())
}

/// z-score for a service level given in percent.
pub fn service_level_z_score(service_level_pct: f64) -> Result<f64, ServiceError> {
    if !service_level_pct.is_finite() || service_level_pct <= 0.0 || service_level_pct >= 100.0
    {
        return Err(ServiceError::invalid_parameter(format!(
            "service_level_pct must lie strictly between 0 and 100 (got {})",
            service_level_pct
        )));
    }
    inverse_standard_normal_cdf(service_level_pct / 100.0)
}

pub fn safety_stock(z_score: f64, demand_std_dev: f64, lead_time_days: u32) -> f64 {
    z_score * demand_std_dev * f64::from(lead_time_days).sqrt()
}

pub fn reorder_point(average_daily_demand: f64, lead_time_days: u32, safety_stock: f64) -> f64 {
    average_daily_demand * f64::from(lead_time_days) + safety_stock
}

/// Computes the full policy. Every input is checked before any figure is
/// produced, so a failure never yields a partial result.
#[instrument(level = "debug")]
pub fn calculate_policy(inputs: &PolicyInputs) -> Result<InventoryPolicy, ServiceError> {
    let annual_demand = inputs.monthly_forecast_total * MONTHS_PER_YEAR;
    let eoq = economic_order_quantity(annual_demand, inputs.order_cost, inputs.holding_cost)?;
    let z_score = service_level_z_score(inputs.service_level_pct)?;

    let average_daily_demand = inputs.monthly_forecast_total / DAYS_PER_MONTH;
    let safety_stock = safety_stock(z_score, inputs.historical_std_dev, inputs.lead_time_days);
    let reorder_point = reorder_point(average_daily_demand, inputs.lead_time_days, safety_stock);

    debug!(eoq, safety_stock, reorder_point, "Calculated inventory policy");

    Ok(InventoryPolicy {
        average_daily_demand,
        annual_demand,
        eoq,
        z_score,
        safety_stock,
        reorder_point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn reference_inputs() -> PolicyInputs {
        PolicyInputs {
            monthly_forecast_total: 1500.0,
            historical_std_dev: 10.0,
            order_cost: 100.0,
            holding_cost: 5.0,
            lead_time_days: 5,
            service_level_pct: 95.0,
        }
    }

    #[test]
    fn reference_scenario() {
        let policy = calculate_policy(&reference_inputs()).unwrap();

        assert_eq!(policy.average_daily_demand, 50.0);
        assert_eq!(policy.annual_demand, 18000.0);
        assert!((policy.eoq - 720_000.0_f64.sqrt()).abs() < 1e-9);
        assert!((policy.eoq - 848.53).abs() < 0.01);
        assert!((policy.z_score - 1.645).abs() < 1e-3);
        assert!((policy.safety_stock - 36.78).abs() < 0.01);
        assert!((policy.reorder_point - 286.78).abs() < 0.01);
    }

    #[test]
    fn reorder_point_is_lead_time_demand_plus_safety_stock() {
        let policy = calculate_policy(&reference_inputs()).unwrap();
        assert_eq!(
            policy.reorder_point,
            policy.average_daily_demand * 5.0 + policy.safety_stock
        );
    }

    #[test]
    fn zero_holding_cost_is_invalid() {
        let inputs = PolicyInputs {
            holding_cost: 0.0,
            ..reference_inputs()
        };
        assert_matches!(
            calculate_policy(&inputs),
            Err(ServiceError::InvalidParameter(msg)) if msg.contains("holding_cost")
        );
    }

    #[test]
    fn negative_holding_cost_is_invalid() {
        assert_matches!(
            economic_order_quantity(1000.0, 10.0, -1.0),
            Err(ServiceError::InvalidParameter(_))
        );
    }

    #[test]
    fn service_level_bounds_are_invalid() {
        for level in [0.0, 100.0, -5.0, 120.0] {
            let inputs = PolicyInputs {
                service_level_pct: level,
                ..reference_inputs()
            };
            assert_matches!(
                calculate_policy(&inputs),
                Err(ServiceError::InvalidParameter(_)),
                "level {}",
                level
            );
        }
    }

    #[test]
    fn negative_demand_cannot_produce_an_order_quantity() {
        assert_matches!(
            economic_order_quantity(-12.0, 100.0, 5.0),
            Err(ServiceError::InvalidParameter(_))
        );
    }

    #[test]
    fn eoq_is_zero_without_demand() {
        assert_eq!(economic_order_quantity(0.0, 100.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn safety_stock_vanishes_without_variability() {
        assert_eq!(safety_stock(1.645, 0.0, 5), 0.0);
        assert_eq!(safety_stock(1.645, 10.0, 0), 0.0);
    }

    #[test]
    fn below_median_service_level_gives_negative_buffer() {
        let z = service_level_z_score(30.0).unwrap();
        assert!(z < 0.0);
        assert!(safety_stock(z, 10.0, 4) < 0.0);
    }
}
