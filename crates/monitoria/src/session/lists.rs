use crate::api::{ApiTransport, CredentialStore, MonitoriaClient};
use crate::calls::Call;
use crate::evaluations::{Evaluation, EvaluationId};
use crate::query::{ListQuery, Page};
use crate::users::User;

use super::scope::ViewScope;
use super::state::{ViewError, ViewState};

fn known_pages<T>(state: &ViewState<Page<T>>) -> u32 {
    state.ready().map(|page| page.total_pages).unwrap_or(0)
}

/// Paged, filterable call list.
#[derive(Debug)]
pub struct CallListView {
    query: ListQuery,
    state: ViewState<Page<Call>>,
    scope: ViewScope,
}

impl Default for CallListView {
    fn default() -> Self {
        Self::new()
    }
}

impl CallListView {
    pub fn new() -> Self {
        Self::with_query(ListQuery::calls())
    }

    pub fn with_query(query: ListQuery) -> Self {
        Self {
            query,
            state: ViewState::Idle,
            scope: ViewScope::new(),
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn state(&self) -> &ViewState<Page<Call>> {
        &self.state
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> &ViewState<Page<Call>>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.state = ViewState::Loading;
        let result = self.scope.run(client.list_calls(&self.query)).await;
        self.state = ViewState::settle(result, "calls");
        &self.state
    }

    /// Any filter change returns to page one before reloading.
    pub async fn set_filter<T, S>(
        &mut self,
        client: &MonitoriaClient<T, S>,
        key: &str,
        value: &str,
    ) -> &ViewState<Page<Call>>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.query.set_filter(key, value);
        self.load(client).await
    }

    pub async fn next_page<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> bool
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        if !self.query.next_page(known_pages(&self.state)) {
            return false;
        }
        self.load(client).await;
        true
    }

    pub async fn previous_page<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> bool
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        if !self.query.previous_page() {
            return false;
        }
        self.load(client).await;
        true
    }
}

/// Paged, filterable evaluation list.
#[derive(Debug)]
pub struct EvaluationListView {
    query: ListQuery,
    state: ViewState<Page<Evaluation>>,
    scope: ViewScope,
}

impl Default for EvaluationListView {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationListView {
    pub fn new() -> Self {
        Self::with_query(ListQuery::evaluations())
    }

    pub fn with_query(query: ListQuery) -> Self {
        Self {
            query,
            state: ViewState::Idle,
            scope: ViewScope::new(),
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn state(&self) -> &ViewState<Page<Evaluation>> {
        &self.state
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> &ViewState<Page<Evaluation>>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.state = ViewState::Loading;
        let result = self.scope.run(client.list_evaluations(&self.query)).await;
        self.state = ViewState::settle(result, "evaluations");
        &self.state
    }

    pub async fn set_filter<T, S>(
        &mut self,
        client: &MonitoriaClient<T, S>,
        key: &str,
        value: &str,
    ) -> &ViewState<Page<Evaluation>>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.query.set_filter(key, value);
        self.load(client).await
    }

    pub async fn next_page<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> bool
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        if !self.query.next_page(known_pages(&self.state)) {
            return false;
        }
        self.load(client).await;
        true
    }

    pub async fn previous_page<T, S>(&mut self, client: &MonitoriaClient<T, S>) -> bool
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        if !self.query.previous_page() {
            return false;
        }
        self.load(client).await;
        true
    }

    /// Admin-only delete followed by a reload of the current page.
    pub async fn delete<T, S>(
        &mut self,
        client: &MonitoriaClient<T, S>,
        user: &User,
        evaluation_id: EvaluationId,
    ) -> Result<(), ViewError>
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        if !user.can_delete_evaluations() {
            return Err(ViewError::NotPermitted);
        }
        self.scope
            .run(client.delete_evaluation(evaluation_id))
            .await
            .map_err(|err| ViewError::from(&err))?;
        self.load(client).await;
        Ok(())
    }
}
