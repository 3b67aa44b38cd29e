pub mod planner;

pub use planner::{PlanResult, PlanStatus, Planner, PlannerContext};
