use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::domain::{Criterion, EvaluationDraft, MAX_CRITERION_SCORE};

/// Evaluation form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationField {
    Criterion(Criterion),
    PositivePoints,
    ImprovementPoints,
}

impl EvaluationField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Criterion(criterion) => criterion.key(),
            Self::PositivePoints => "positive_points",
            Self::ImprovementPoints => "improvement_points",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    MissingCriterionScore,
    MissingRequiredText,
    ScoreOutOfRange { value: u8 },
}

/// Every violated field of a draft, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: BTreeMap<EvaluationField, FieldError>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: EvaluationField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: EvaluationField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Drops the error for a field the user just edited.
    pub fn clear(&mut self, field: EvaluationField) {
        self.errors.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EvaluationField, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    /// Prompts to show next to each failing field.
    pub fn messages(&self) -> Vec<(EvaluationField, String)> {
        self.iter()
            .map(|(field, error)| (field, message_for(field, error)))
            .collect()
    }

    fn insert(&mut self, field: EvaluationField, error: FieldError) {
        self.errors.insert(field, error);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(|field| field.key()).collect();
        write!(f, "{} field(s) need attention: {}", fields.len(), fields.join(", "))
    }
}

impl std::error::Error for ValidationReport {}

fn message_for(field: EvaluationField, error: FieldError) -> String {
    match (field, error) {
        (_, FieldError::MissingCriterionScore) => "this criterion must be scored".to_string(),
        (_, FieldError::ScoreOutOfRange { value }) => {
            format!("scores range from 1 to {MAX_CRITERION_SCORE}, got {value}")
        }
        (EvaluationField::PositivePoints, FieldError::MissingRequiredText) => {
            "describe at least one positive point".to_string()
        }
        (EvaluationField::ImprovementPoints, FieldError::MissingRequiredText) => {
            "describe at least one point to improve".to_string()
        }
        (EvaluationField::Criterion(_), FieldError::MissingRequiredText) => {
            "this field is required".to_string()
        }
    }
}

/// Checks a draft in one pass. Pure: callers block submission while the report is non-empty.
pub fn validate_evaluation(draft: &EvaluationDraft) -> ValidationReport {
    let mut report = ValidationReport::default();

    for criterion in Criterion::ALL {
        let score = draft.scores.get(criterion);
        if score == 0 {
            report.insert(
                EvaluationField::Criterion(criterion),
                FieldError::MissingCriterionScore,
            );
        } else if score > MAX_CRITERION_SCORE {
            report.insert(
                EvaluationField::Criterion(criterion),
                FieldError::ScoreOutOfRange { value: score },
            );
        }
    }

    if draft.positive_points.trim().is_empty() {
        report.insert(
            EvaluationField::PositivePoints,
            FieldError::MissingRequiredText,
        );
    }
    if draft.improvement_points.trim().is_empty() {
        report.insert(
            EvaluationField::ImprovementPoints,
            FieldError::MissingRequiredText,
        );
    }

    report
}
