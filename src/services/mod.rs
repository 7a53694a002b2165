// Replenishment formulas
pub mod inventory_policy;

// Generator -> forecaster -> calculator pipeline
pub mod planning;

// Presentation payload
pub mod dashboard;
