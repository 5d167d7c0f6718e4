use crate::evaluations::{CriterionScores, EvaluationDraft};

pub(super) fn complete_draft() -> EvaluationDraft {
    EvaluationDraft {
        scores: CriterionScores::from_array([5, 4, 4, 5, 3, 4]),
        positive_points: "Warm greeting and confirmed the customer's identity".to_string(),
        improvement_points: "Summarise the agreed next steps before closing".to_string(),
        general_comments: String::new(),
        requires_coaching: false,
        is_exemplary: false,
    }
}

pub(super) fn blank_draft() -> EvaluationDraft {
    EvaluationDraft::default()
}

pub(super) const STORED_EVALUATION: &str = r#"{
    "id": 31,
    "call_id": 12,
    "evaluator_id": 2,
    "evaluator_name": "Carla Mendes",
    "greeting_score": 5,
    "communication_score": 4,
    "problem_solving_score": 3,
    "empathy_score": 5,
    "procedure_score": null,
    "closing_score": 4,
    "overall_score": 4.2,
    "positive_points": "Patient with the customer",
    "improvement_points": "Offer the self-service portal",
    "general_comments": null,
    "requires_coaching": false,
    "is_exemplary": true,
    "created_at": "2025-03-02T09:00:00.000001",
    "updated_at": "2025-03-02T09:00:00.000001"
}"#;
