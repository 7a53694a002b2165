use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Service levels offered to operators, in percent.
pub const SERVICE_LEVEL_OPTIONS: [u32; 6] = [80, 85, 90, 95, 98, 99];

pub const DEFAULT_ORDER_COST: f64 = 100.0;
pub const DEFAULT_HOLDING_COST: f64 = 5.0;
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 5;
pub const DEFAULT_SERVICE_LEVEL_PCT: u32 = 95;
pub const MIN_LEAD_TIME_DAYS: u32 = 1;
pub const MAX_LEAD_TIME_DAYS: u32 = 14;

/// Operator-chosen ordering parameters.
///
/// Validation covers the operator ranges only. A positive holding cost is
/// checked by the policy calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PlanningParameters {
    /// Fixed cost of placing one order (currency)
    #[schema(example = 100.0)]
    pub order_cost: f64,
    /// Cost of holding one unit in stock for a year (currency)
    #[schema(example = 5.0)]
    pub holding_cost: f64,
    /// Replenishment lead time in days (1-14)
    #[validate(range(min = 1, max = 14))]
    #[schema(example = 5, minimum = 1, maximum = 14)]
    pub lead_time_days: u32,
    /// Target service level in percent, one of 80, 85, 90, 95, 98, 99
    #[validate(custom = "validate_service_level")]
    #[schema(example = 95)]
    pub service_level_pct: u32,
}

impl Default for PlanningParameters {
    fn default() -> Self {
        Self {
            order_cost: DEFAULT_ORDER_COST,
            holding_cost: DEFAULT_HOLDING_COST,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            service_level_pct: DEFAULT_SERVICE_LEVEL_PCT,
        }
    }
}

fn validate_service_level(level: u32) -> Result<(), ValidationError> {
    if SERVICE_LEVEL_OPTIONS.contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new("service_level_pct");
        err.message = Some("Must be one of: 80, 85, 90, 95, 98, 99".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_operator_panel() {
        let params = PlanningParameters::default();
        assert_eq!(params.order_cost, 100.0);
        assert_eq!(params.holding_cost, 5.0);
        assert_eq!(params.lead_time_days, 5);
        assert_eq!(params.service_level_pct, 95);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn lead_time_outside_slider_range_fails() {
        let params = PlanningParameters {
            lead_time_days: 15,
            ..Default::default()
        };
        let errors = params.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("lead_time_days"));

        let params = PlanningParameters {
            lead_time_days: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn service_level_must_be_an_offered_option() {
        for level in SERVICE_LEVEL_OPTIONS {
            let params = PlanningParameters {
                service_level_pct: level,
                ..Default::default()
            };
            assert!(params.validate().is_ok(), "level {} rejected", level);
        }

        let params = PlanningParameters {
            service_level_pct: 100,
            ..Default::default()
        };
        let errors = params.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("service_level_pct"));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let params: PlanningParameters =
            serde_json::from_str(r#"{"lead_time_days": 7}"#).unwrap();
        assert_eq!(params.lead_time_days, 7);
        assert_eq!(params.order_cost, DEFAULT_ORDER_COST);
        assert_eq!(params.service_level_pct, DEFAULT_SERVICE_LEVEL_PCT);
    }
}
