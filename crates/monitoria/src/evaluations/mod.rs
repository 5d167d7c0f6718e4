//! Quality evaluations: domain records, the score engine, and form validation.

pub mod domain;
mod scoring;
mod validation;

#[cfg(test)]
mod tests;

pub(crate) use domain::{CreateEvaluationRequest, EvaluationEnvelope};
pub use domain::{
    Criterion, CriterionScores, Evaluation, EvaluationDraft, EvaluationId, ScoreOutOfRange,
    MAX_CRITERION_SCORE,
};
pub use scoring::{
    compute_overall_score, format_score, round_to_hundredths, PerformanceBand, ScoreBand,
};
pub use validation::{validate_evaluation, EvaluationField, FieldError, ValidationReport};
