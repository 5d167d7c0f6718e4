use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calls::Call;
use crate::evaluations::Evaluation;
use crate::users::UserId;
use crate::wire::{lenient_count, null_as_default};

/// Aggregates computed by `GET /dashboard/stats`. The client never recomputes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub period_days: Option<u32>,
    pub calls: CallStats,
    pub evaluations: EvaluationStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_duration_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_priority: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub by_category: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_overall_score: f64,
    #[serde(default)]
    pub coaching_needed: Option<u64>,
    #[serde(default)]
    pub exemplary: Option<u64>,
}

/// `GET /dashboard/recent-activity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_calls: Vec<Call>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_evaluations: Vec<Evaluation>,
}

/// One row of `GET /dashboard/operator-performance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPerformance {
    pub operator_id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operator_name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_calls: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_duration_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_score: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperatorPerformanceEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub operators: Vec<OperatorPerformance>,
}
