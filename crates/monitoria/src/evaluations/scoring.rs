use serde::Serialize;

use super::domain::CriterionScores;

/// Mean of the scored (non-zero) criteria rounded to two decimals, or 0 when
/// nothing has been scored. Display and validation only: the stored overall
/// score is the one the server returns.
pub fn compute_overall_score(scores: &CriterionScores) -> f64 {
    let scored: Vec<u32> = scores
        .as_array()
        .into_iter()
        .filter(|score| *score > 0)
        .map(u32::from)
        .collect();

    if scored.is_empty() {
        return 0.0;
    }

    let total: u32 = scored.iter().sum();
    round_to_hundredths(f64::from(total) / scored.len() as f64)
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal rendering shared by every score-like field.
pub fn format_score(value: f64) -> String {
    format!("{:.2}", value)
}

/// Coarse grouping of an evaluation's overall score for list displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 4.5 {
            Self::Excellent
        } else if score >= 3.5 {
            Self::Good
        } else if score >= 2.5 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Grouping of an operator's average score on the performance dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Strong,
    Steady,
    NeedsAttention,
}

impl PerformanceBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::Strong
        } else if score >= 3.0 {
            Self::Steady
        } else {
            Self::NeedsAttention
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Steady => "Steady",
            Self::NeedsAttention => "Needs attention",
        }
    }
}
