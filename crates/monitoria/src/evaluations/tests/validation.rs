use super::common::*;
use crate::evaluations::{
    validate_evaluation, Criterion, EvaluationField, FieldError, ScoreOutOfRange,
};

#[test]
fn complete_draft_passes() {
    assert!(validate_evaluation(&complete_draft()).is_empty());
}

#[test]
fn whitespace_positive_points_is_the_only_error() {
    let mut draft = complete_draft();
    draft.positive_points = "   ".to_string();

    let report = validate_evaluation(&draft);

    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get(EvaluationField::PositivePoints),
        Some(FieldError::MissingRequiredText)
    );
}

#[test]
fn blank_draft_reports_every_required_field_at_once() {
    let report = validate_evaluation(&blank_draft());

    assert_eq!(report.len(), 8);
    for criterion in Criterion::ALL {
        assert_eq!(
            report.get(EvaluationField::Criterion(criterion)),
            Some(FieldError::MissingCriterionScore)
        );
    }
    assert!(report.contains(EvaluationField::PositivePoints));
    assert!(report.contains(EvaluationField::ImprovementPoints));
}

#[test]
fn optional_fields_are_never_required() {
    let mut draft = complete_draft();
    draft.general_comments = String::new();
    draft.requires_coaching = true;
    draft.is_exemplary = true;
    assert!(validate_evaluation(&draft).is_empty());
}

#[test]
fn report_preserves_field_order_and_messages() {
    let mut draft = complete_draft();
    draft.scores.closing = 0;
    draft.improvement_points = "\n\t".to_string();
    draft.scores.greeting = 0;

    let report = validate_evaluation(&draft);
    let keys: Vec<&str> = report.iter().map(|(field, _)| field.key()).collect();
    assert_eq!(
        keys,
        vec!["greeting_score", "closing_score", "improvement_points"]
    );

    let messages = report.messages();
    assert_eq!(messages[2].1, "describe at least one point to improve");
    assert!(report.to_string().contains("3 field(s)"));
}

#[test]
fn out_of_range_scores_are_rejected() {
    let mut draft = complete_draft();
    assert_eq!(
        draft.set_score(Criterion::Empathy, 6),
        Err(ScoreOutOfRange {
            criterion: Criterion::Empathy,
            score: 6
        })
    );
    assert_eq!(draft.scores.empathy, 5, "rejected score leaves the draft untouched");

    draft.scores.empathy = 9;
    let report = validate_evaluation(&draft);
    assert_eq!(
        report.get(EvaluationField::Criterion(Criterion::Empathy)),
        Some(FieldError::ScoreOutOfRange { value: 9 })
    );
}

#[test]
fn clearing_a_field_removes_only_that_error() {
    let mut report = validate_evaluation(&blank_draft());
    report.clear(EvaluationField::Criterion(Criterion::Greeting));
    assert_eq!(report.len(), 7);
    assert!(!report.contains(EvaluationField::Criterion(Criterion::Greeting)));
}
