use std::collections::BTreeMap;

use serde::Serialize;

use super::stats::{DashboardStats, OperatorPerformance};
use crate::calls::{CallCategory, CallPriority, CallStatus};
use crate::evaluations::{format_score, PerformanceBand};
use crate::users::UserId;

/// One labelled slice of a server-side group-by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub label: String,
    pub value: u64,
}

/// Display-ready dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period_days: Option<u32>,
    pub total_calls: u64,
    pub avg_duration_minutes: u64,
    pub status_breakdown: Vec<BreakdownEntry>,
    pub priority_breakdown: Vec<BreakdownEntry>,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub total_evaluations: u64,
    pub avg_overall_score: f64,
    pub avg_overall_score_label: String,
    pub coaching_needed: Option<u64>,
    pub exemplary: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorPerformanceRow {
    pub operator_id: UserId,
    pub operator_name: String,
    pub total_calls: u64,
    pub avg_duration_minutes: u64,
    pub avg_score: f64,
    pub avg_score_label: String,
    pub band: PerformanceBand,
}

/// Whole minutes for a server-reported duration in seconds.
pub fn seconds_to_display_minutes(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds / 60.0).round() as u64
    } else {
        0
    }
}

/// Orders a key -> count mapping: known keys in domain order, then unknown
/// keys alphabetically. Counts are copied as-is.
pub fn breakdown(counts: &BTreeMap<String, u64>, known: &[(&str, &str)]) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = known
        .iter()
        .filter_map(|(key, label)| {
            counts.get(*key).map(|value| BreakdownEntry {
                key: (*key).to_string(),
                label: (*label).to_string(),
                value: *value,
            })
        })
        .collect();

    entries.extend(
        counts
            .iter()
            .filter(|(key, _)| !known.iter().any(|(known_key, _)| known_key == key))
            .map(|(key, value)| BreakdownEntry {
                key: key.clone(),
                label: key.clone(),
                value: *value,
            }),
    );

    entries
}

impl DashboardStats {
    pub fn summary(&self) -> DashboardSummary {
        let statuses = CallStatus::ordered();
        let status_keys: Vec<(&str, &str)> = statuses
            .iter()
            .map(|status| (status.key(), status.label()))
            .collect();
        let priorities = CallPriority::ordered();
        let priority_keys: Vec<(&str, &str)> = priorities
            .iter()
            .map(|priority| (priority.key(), priority.label()))
            .collect();
        let categories = CallCategory::ordered();
        let category_keys: Vec<(&str, &str)> = categories
            .iter()
            .map(|category| (category.key(), category.label()))
            .collect();

        DashboardSummary {
            period_days: self.period_days,
            total_calls: self.calls.total,
            avg_duration_minutes: seconds_to_display_minutes(self.calls.avg_duration_seconds),
            status_breakdown: breakdown(&self.calls.by_status, &status_keys),
            priority_breakdown: breakdown(&self.calls.by_priority, &priority_keys),
            category_breakdown: breakdown(&self.calls.by_category, &category_keys),
            total_evaluations: self.evaluations.total,
            avg_overall_score: self.evaluations.avg_overall_score,
            avg_overall_score_label: format_score(self.evaluations.avg_overall_score),
            coaching_needed: self.evaluations.coaching_needed,
            exemplary: self.evaluations.exemplary,
        }
    }
}

impl OperatorPerformance {
    pub fn to_row(&self) -> OperatorPerformanceRow {
        OperatorPerformanceRow {
            operator_id: self.operator_id,
            operator_name: self.operator_name.clone(),
            total_calls: self.total_calls,
            avg_duration_minutes: seconds_to_display_minutes(self.avg_duration_seconds),
            avg_score: self.avg_score,
            avg_score_label: format_score(self.avg_score),
            band: PerformanceBand::for_score(self.avg_score),
        }
    }
}
