//! Dashboard aggregates from the server and their display mapping.

mod stats;
mod views;

pub(crate) use stats::OperatorPerformanceEnvelope;
pub use stats::{CallStats, DashboardStats, EvaluationStats, OperatorPerformance, RecentActivity};
pub use views::{
    breakdown, seconds_to_display_minutes, BreakdownEntry, DashboardSummary,
    OperatorPerformanceRow,
};
