use crate::api::{ApiError, ApiTransport, CredentialStore, MonitoriaClient};
use crate::calls::{Call, CallId};
use crate::evaluations::{
    validate_evaluation, Criterion, Evaluation, EvaluationDraft, EvaluationField, EvaluationId,
    ScoreOutOfRange, ValidationReport,
};
use crate::users::{User, UserRole};

/// What a submission will create or replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoringTarget {
    New {
        call_id: CallId,
    },
    Existing {
        evaluation_id: EvaluationId,
        call_id: CallId,
    },
}

impl AuthoringTarget {
    pub fn call_id(&self) -> CallId {
        match self {
            Self::New { call_id } | Self::Existing { call_id, .. } => *call_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthoringState {
    Idle,
    Editing {
        target: AuthoringTarget,
        draft: EvaluationDraft,
        errors: ValidationReport,
        submit_error: Option<String>,
    },
    Submitting {
        target: AuthoringTarget,
        draft: EvaluationDraft,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("no evaluation form is open")]
    NotEditing,
    #[error("a submission is already in progress")]
    Busy,
    #[error("the call is not loaded")]
    CallUnavailable,
    #[error("this call already has an evaluation")]
    AlreadyEvaluated,
    #[error("evaluation {0:?} is not part of this call")]
    UnknownEvaluation(EvaluationId),
    #[error("the {} role cannot evaluate calls", .0.label())]
    NotPermitted(UserRole),
    #[error(transparent)]
    Score(#[from] ScoreOutOfRange),
    #[error(transparent)]
    Invalid(ValidationReport),
    #[error(transparent)]
    Submit(ApiError),
}

/// A validated draft on its way to the server.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub target: AuthoringTarget,
    pub draft: EvaluationDraft,
}

impl PendingSubmission {
    pub async fn send<T, S>(&self, client: &MonitoriaClient<T, S>) -> Result<Evaluation, ApiError>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        match self.target {
            AuthoringTarget::New { call_id } => client.create_evaluation(call_id, &self.draft).await,
            AuthoringTarget::Existing { evaluation_id, .. } => {
                client.update_evaluation(evaluation_id, &self.draft).await
            }
        }
    }
}

/// Form state machine for creating or editing one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationAuthoring {
    state: AuthoringState,
}

impl Default for EvaluationAuthoring {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationAuthoring {
    pub fn new() -> Self {
        Self {
            state: AuthoringState::Idle,
        }
    }

    pub fn state(&self) -> &AuthoringState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, AuthoringState::Submitting { .. })
    }

    pub fn draft(&self) -> Option<&EvaluationDraft> {
        match &self.state {
            AuthoringState::Idle => None,
            AuthoringState::Editing { draft, .. } | AuthoringState::Submitting { draft, .. } => {
                Some(draft)
            }
        }
    }

    pub fn errors(&self) -> Option<&ValidationReport> {
        match &self.state {
            AuthoringState::Editing { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn submit_error(&self) -> Option<&str> {
        match &self.state {
            AuthoringState::Editing { submit_error, .. } => submit_error.as_deref(),
            _ => None,
        }
    }

    /// Opens a blank form. Only offered while the call has no evaluation.
    pub fn begin_new(&mut self, user: &User, call: &Call) -> Result<(), AuthoringError> {
        self.ensure_not_submitting()?;
        ensure_evaluator(user)?;
        if !call.accepts_new_evaluation() {
            return Err(AuthoringError::AlreadyEvaluated);
        }
        self.open(
            AuthoringTarget::New { call_id: call.id },
            EvaluationDraft::default(),
        );
        Ok(())
    }

    /// Opens the form seeded from a stored evaluation.
    pub fn begin_edit(&mut self, user: &User, evaluation: &Evaluation) -> Result<(), AuthoringError> {
        self.ensure_not_submitting()?;
        ensure_evaluator(user)?;
        self.open(
            AuthoringTarget::Existing {
                evaluation_id: evaluation.id,
                call_id: evaluation.call_id,
            },
            EvaluationDraft::from_evaluation(evaluation),
        );
        Ok(())
    }

    pub fn set_score(&mut self, criterion: Criterion, score: u8) -> Result<(), AuthoringError> {
        match &mut self.state {
            AuthoringState::Idle => Err(AuthoringError::NotEditing),
            AuthoringState::Submitting { .. } => Err(AuthoringError::Busy),
            AuthoringState::Editing { draft, errors, .. } => {
                draft.set_score(criterion, score)?;
                errors.clear(EvaluationField::Criterion(criterion));
                Ok(())
            }
        }
    }

    pub fn set_positive_points(&mut self, text: impl Into<String>) -> Result<(), AuthoringError> {
        let text = text.into();
        self.edit(EvaluationField::PositivePoints, |draft| {
            draft.positive_points = text;
        })
    }

    pub fn set_improvement_points(&mut self, text: impl Into<String>) -> Result<(), AuthoringError> {
        let text = text.into();
        self.edit(EvaluationField::ImprovementPoints, |draft| {
            draft.improvement_points = text;
        })
    }

    pub fn set_general_comments(&mut self, text: impl Into<String>) -> Result<(), AuthoringError> {
        let text = text.into();
        self.edit_unchecked(|draft| draft.general_comments = text)
    }

    pub fn set_requires_coaching(&mut self, value: bool) -> Result<(), AuthoringError> {
        self.edit_unchecked(|draft| draft.requires_coaching = value)
    }

    pub fn set_is_exemplary(&mut self, value: bool) -> Result<(), AuthoringError> {
        self.edit_unchecked(|draft| draft.is_exemplary = value)
    }

    /// Discards the form. An in-flight submission cannot be cancelled here.
    pub fn cancel(&mut self) -> Result<(), AuthoringError> {
        self.ensure_not_submitting()?;
        self.state = AuthoringState::Idle;
        Ok(())
    }

    /// Validates and moves to `Submitting`. Invalid drafts stay in `Editing`
    /// with their errors attached.
    pub fn start_submit(&mut self) -> Result<PendingSubmission, AuthoringError> {
        let (target, draft) = match &mut self.state {
            AuthoringState::Idle => return Err(AuthoringError::NotEditing),
            AuthoringState::Submitting { .. } => return Err(AuthoringError::Busy),
            AuthoringState::Editing {
                target,
                draft,
                errors,
                submit_error,
            } => {
                let report = validate_evaluation(draft);
                if !report.is_empty() {
                    *errors = report.clone();
                    *submit_error = None;
                    return Err(AuthoringError::Invalid(report));
                }
                (*target, draft.clone())
            }
        };

        self.state = AuthoringState::Submitting {
            target,
            draft: draft.clone(),
        };
        Ok(PendingSubmission { target, draft })
    }

    /// Closes the form after a successful save.
    pub fn complete(&mut self) {
        if self.is_submitting() {
            self.state = AuthoringState::Idle;
        }
    }

    /// Returns to `Editing` with the failure attached so the user can retry.
    pub fn fail(&mut self, err: ApiError) -> AuthoringError {
        if let AuthoringState::Submitting { target, draft } =
            std::mem::replace(&mut self.state, AuthoringState::Idle)
        {
            let (errors, submit_error) = match &err {
                ApiError::Validation(report) => (report.clone(), None),
                other => (ValidationReport::default(), Some(other.to_string())),
            };
            self.state = AuthoringState::Editing {
                target,
                draft,
                errors,
                submit_error,
            };
        }
        match err {
            ApiError::Validation(report) => AuthoringError::Invalid(report),
            other => AuthoringError::Submit(other),
        }
    }

    /// Single-shot submit without a follow-up reload.
    pub async fn submit<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> Result<Evaluation, AuthoringError>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        let pending = self.start_submit()?;
        match pending.send(client).await {
            Ok(saved) => {
                self.complete();
                Ok(saved)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn open(&mut self, target: AuthoringTarget, draft: EvaluationDraft) {
        self.state = AuthoringState::Editing {
            target,
            draft,
            errors: ValidationReport::default(),
            submit_error: None,
        };
    }

    fn ensure_not_submitting(&self) -> Result<(), AuthoringError> {
        if self.is_submitting() {
            Err(AuthoringError::Busy)
        } else {
            Ok(())
        }
    }

    /// Applies an edit and clears the error recorded for `field`.
    fn edit(
        &mut self,
        field: EvaluationField,
        apply: impl FnOnce(&mut EvaluationDraft),
    ) -> Result<(), AuthoringError> {
        match &mut self.state {
            AuthoringState::Idle => Err(AuthoringError::NotEditing),
            AuthoringState::Submitting { .. } => Err(AuthoringError::Busy),
            AuthoringState::Editing { draft, errors, .. } => {
                apply(draft);
                errors.clear(field);
                Ok(())
            }
        }
    }

    fn edit_unchecked(
        &mut self,
        apply: impl FnOnce(&mut EvaluationDraft),
    ) -> Result<(), AuthoringError> {
        match &mut self.state {
            AuthoringState::Idle => Err(AuthoringError::NotEditing),
            AuthoringState::Submitting { .. } => Err(AuthoringError::Busy),
            AuthoringState::Editing { draft, .. } => {
                apply(draft);
                Ok(())
            }
        }
    }
}

fn ensure_evaluator(user: &User) -> Result<(), AuthoringError> {
    if user.can_evaluate() {
        Ok(())
    } else {
        Err(AuthoringError::NotPermitted(user.role))
    }
}
