//! View-level state: load states, the evaluation form machine, and the
//! cancellation scope each view owns.

mod authoring;
mod dashboard;
mod detail;
mod lists;
mod scope;
mod state;

pub use authoring::{
    AuthoringError, AuthoringState, AuthoringTarget, EvaluationAuthoring, PendingSubmission,
};
pub use dashboard::{DashboardView, DEFAULT_PERIOD_DAYS, DEFAULT_RECENT_LIMIT};
pub use detail::CallDetailView;
pub use lists::{CallListView, EvaluationListView};
pub use scope::{ScopeHandle, ViewScope};
pub use state::{ViewError, ViewState};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::calls::Call;
    use crate::evaluations::{Criterion, EvaluationField, FieldError};
    use crate::users::{User, UserId, UserRole};

    fn user(role: UserRole) -> User {
        User {
            id: UserId(1),
            username: "marina".to_string(),
            full_name: "Marina Costa".to_string(),
            email: None,
            role,
            is_active: true,
        }
    }

    fn call_without_evaluations() -> Call {
        serde_json::from_str(
            r#"{"id": 7, "protocol": "ATD-0007", "customer_name": "João",
                "subject": "Segunda via", "status": "resolved", "priority": "medium",
                "created_at": "2024-03-02T10:15:00", "evaluations": []}"#,
        )
        .expect("call decodes")
    }

    fn fill_valid(authoring: &mut EvaluationAuthoring) {
        for criterion in Criterion::ALL {
            authoring.set_score(criterion, 4).expect("score accepted");
        }
        authoring
            .set_positive_points("Cordial do início ao fim")
            .expect("text accepted");
        authoring
            .set_improvement_points("Confirmar dados antes de encerrar")
            .expect("text accepted");
    }

    #[test]
    fn operators_cannot_open_the_form() {
        let mut authoring = EvaluationAuthoring::new();
        let err = authoring
            .begin_new(&user(UserRole::Operator), &call_without_evaluations())
            .expect_err("operators cannot evaluate");
        assert!(matches!(err, AuthoringError::NotPermitted(UserRole::Operator)));
        assert_eq!(authoring.state(), &AuthoringState::Idle);
    }

    #[test]
    fn invalid_submit_stays_in_editing_with_errors() {
        let mut authoring = EvaluationAuthoring::new();
        authoring
            .begin_new(&user(UserRole::Supervisor), &call_without_evaluations())
            .expect("form opens");

        let err = authoring.start_submit().expect_err("blank draft rejected");

        match err {
            AuthoringError::Invalid(report) => assert_eq!(report.len(), 8),
            other => panic!("unexpected error {other:?}"),
        }
        let errors = authoring.errors().expect("still editing");
        assert_eq!(
            errors.get(EvaluationField::Criterion(Criterion::Empathy)),
            Some(FieldError::MissingCriterionScore)
        );
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut authoring = EvaluationAuthoring::new();
        authoring
            .begin_new(&user(UserRole::Admin), &call_without_evaluations())
            .expect("form opens");
        let _ = authoring.start_submit();

        authoring.set_score(Criterion::Greeting, 5).expect("score");
        authoring.set_positive_points("Boa escuta").expect("text");

        let errors = authoring.errors().expect("still editing");
        assert!(!errors.contains(EvaluationField::Criterion(Criterion::Greeting)));
        assert!(!errors.contains(EvaluationField::PositivePoints));
        assert!(errors.contains(EvaluationField::ImprovementPoints));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn second_submit_is_rejected_while_in_flight() {
        let mut authoring = EvaluationAuthoring::new();
        authoring
            .begin_new(&user(UserRole::Supervisor), &call_without_evaluations())
            .expect("form opens");
        fill_valid(&mut authoring);

        let pending = authoring.start_submit().expect("valid draft");
        assert!(authoring.is_submitting());
        assert!(matches!(pending.target, AuthoringTarget::New { .. }));
        assert!(matches!(authoring.start_submit(), Err(AuthoringError::Busy)));
        assert!(matches!(authoring.cancel(), Err(AuthoringError::Busy)));
        assert!(matches!(
            authoring.set_score(Criterion::Closing, 1),
            Err(AuthoringError::Busy)
        ));
    }

    #[test]
    fn failed_submit_returns_to_editing_with_message() {
        let mut authoring = EvaluationAuthoring::new();
        authoring
            .begin_new(&user(UserRole::Supervisor), &call_without_evaluations())
            .expect("form opens");
        fill_valid(&mut authoring);
        let pending = authoring.start_submit().expect("valid draft");

        let err = authoring.fail(ApiError::Request {
            status: 500,
            message: "Erro ao criar avaliação".to_string(),
        });

        assert!(matches!(err, AuthoringError::Submit(_)));
        assert_eq!(authoring.draft(), Some(&pending.draft));
        assert!(authoring
            .submit_error()
            .is_some_and(|message| message.contains("Erro ao criar avaliação")));
    }

    #[test]
    fn out_of_range_score_is_refused() {
        let mut authoring = EvaluationAuthoring::new();
        authoring
            .begin_new(&user(UserRole::Supervisor), &call_without_evaluations())
            .expect("form opens");
        assert!(matches!(
            authoring.set_score(Criterion::Empathy, 6),
            Err(AuthoringError::Score(_))
        ));
        assert_eq!(authoring.draft().map(|draft| draft.scores.empathy), Some(0));
    }

    #[test]
    fn detail_view_offers_form_only_once_loaded() {
        let view = CallDetailView::new(crate::calls::CallId(7));
        assert!(!view.can_offer_new_evaluation(&user(UserRole::Supervisor)));
        assert!(!view.offers_back_to_calls());
    }
}
