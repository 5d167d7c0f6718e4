use crate::api::{ApiTransport, CredentialStore, MonitoriaClient};
use crate::calls::{Call, CallId};
use crate::evaluations::{Evaluation, EvaluationId};
use crate::users::User;

use super::authoring::{AuthoringError, EvaluationAuthoring};
use super::scope::ViewScope;
use super::state::{ViewError, ViewState};

/// One call with its evaluation and the form for authoring it.
#[derive(Debug)]
pub struct CallDetailView {
    call_id: CallId,
    state: ViewState<Call>,
    authoring: EvaluationAuthoring,
    scope: ViewScope,
}

impl CallDetailView {
    pub fn new(call_id: CallId) -> Self {
        Self {
            call_id,
            state: ViewState::Idle,
            authoring: EvaluationAuthoring::new(),
            scope: ViewScope::new(),
        }
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    pub fn state(&self) -> &ViewState<Call> {
        &self.state
    }

    pub fn call(&self) -> Option<&Call> {
        self.state.ready()
    }

    pub fn authoring(&self) -> &EvaluationAuthoring {
        &self.authoring
    }

    pub fn authoring_mut(&mut self) -> &mut EvaluationAuthoring {
        &mut self.authoring
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> &ViewState<Call>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.state = ViewState::Loading;
        let result = self.scope.run(client.get_call(self.call_id)).await;
        self.state = ViewState::settle(result, "call detail");
        &self.state
    }

    /// Missing calls render an empty state with a link back to the list.
    pub fn offers_back_to_calls(&self) -> bool {
        matches!(self.state, ViewState::Failed(ViewError::NotFound))
    }

    pub fn can_offer_new_evaluation(&self, user: &User) -> bool {
        user.can_evaluate()
            && !self.authoring.is_submitting()
            && self.call().is_some_and(Call::accepts_new_evaluation)
    }

    pub fn begin_new_evaluation(&mut self, user: &User) -> Result<(), AuthoringError> {
        let call = self.state.ready().ok_or(AuthoringError::CallUnavailable)?;
        self.authoring.begin_new(user, call)
    }

    pub fn begin_edit_evaluation(
        &mut self,
        user: &User,
        evaluation_id: EvaluationId,
    ) -> Result<(), AuthoringError> {
        let call = self.state.ready().ok_or(AuthoringError::CallUnavailable)?;
        let evaluation = call
            .evaluations
            .iter()
            .find(|evaluation| evaluation.id == evaluation_id)
            .ok_or(AuthoringError::UnknownEvaluation(evaluation_id))?;
        self.authoring.begin_edit(user, evaluation)
    }

    /// Saves the open form, then re-fetches the call before the form leaves
    /// `Submitting`, so the detail shows what the server stored.
    pub async fn submit_evaluation<T, S>(
        &mut self,
        client: &MonitoriaClient<T, S>,
    ) -> Result<Evaluation, AuthoringError>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        let pending = self.authoring.start_submit()?;
        let saved = match self.scope.run(pending.send(client)).await {
            Ok(saved) => saved,
            Err(err) => return Err(self.authoring.fail(err)),
        };

        let refreshed = self.scope.run(client.get_call(self.call_id)).await;
        self.state = ViewState::settle(refreshed, "call detail");
        self.authoring.complete();
        Ok(saved)
    }
}
