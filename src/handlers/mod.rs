pub mod planning;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

pub use planning::planning_routes;
