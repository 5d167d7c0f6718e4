use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::auth::AuthSession;
use super::credentials::{CredentialStore, Credentials};
use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};
use crate::calls::{Call, CallId};
use crate::dashboard::{DashboardStats, OperatorPerformance, OperatorPerformanceEnvelope, RecentActivity};
use crate::evaluations::{
    validate_evaluation, CreateEvaluationRequest, Evaluation, EvaluationDraft, EvaluationEnvelope,
    EvaluationId,
};
use crate::query::{paginate_result, CallListEnvelope, EvaluationListEnvelope, ListQuery, Page};
use crate::users::User;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Context object for one signed-in session: transport, credentials, and the
/// per-request time bound. Construct once and pass by reference.
pub struct MonitoriaClient<T, S> {
    transport: Arc<T>,
    auth: Arc<AuthSession<S>>,
    timeout: Duration,
}

impl<T, S> MonitoriaClient<T, S>
where
    T: ApiTransport + 'static,
    S: CredentialStore + 'static,
{
    pub fn new(transport: Arc<T>, auth: Arc<AuthSession<S>>, timeout: Duration) -> Self {
        Self {
            transport,
            auth,
            timeout,
        }
    }

    pub fn auth(&self) -> &AuthSession<S> {
        &self.auth
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }

    /// `POST /auth/login`. A rejected login is a plain request failure, not a refresh trigger.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = serde_json::to_value(LoginRequest { username, password })?;
        let response = self.send_bounded(ApiRequest::post("/auth/login", body)).await?;
        let login: LoginResponse = decode(response)?;

        self.auth
            .establish(Credentials {
                access_token: login.access_token,
                refresh_token: login.refresh_token,
                user: Some(login.user.clone()),
            })
            .await?;
        info!(username = %login.user.username, role = login.user.role.label(), "logged in");
        Ok(login.user)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.auth.end().await?;
        Ok(())
    }

    /// `GET /auth/me`; the stored user is refreshed with the answer.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let user: User = decode(self.execute(ApiRequest::get("/auth/me")).await?)?;
        self.auth.update_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn list_calls(&self, query: &ListQuery) -> Result<Page<Call>, ApiError> {
        let request = ApiRequest::get("/calls").with_query(query.params());
        let envelope: CallListEnvelope = decode(self.execute(request).await?)?;
        Ok(paginate_result(envelope, query.page()))
    }

    pub async fn get_call(&self, call_id: CallId) -> Result<Call, ApiError> {
        let request = ApiRequest::get(format!("/calls/{}", call_id.0));
        decode(self.execute(request).await?)
    }

    /// Validates locally first; an invalid draft never reaches the network.
    pub async fn create_evaluation(
        &self,
        call_id: CallId,
        draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        ensure_valid(draft)?;
        let body = serde_json::to_value(CreateEvaluationRequest { call_id, draft })?;
        let envelope: EvaluationEnvelope =
            decode(self.execute(ApiRequest::post("/evaluations", body)).await?)?;
        let evaluation = envelope.into_evaluation();
        info!(
            call_id = call_id.0,
            evaluation_id = evaluation.id.0,
            "evaluation created"
        );
        Ok(evaluation)
    }

    pub async fn update_evaluation(
        &self,
        evaluation_id: EvaluationId,
        draft: &EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        ensure_valid(draft)?;
        let body = serde_json::to_value(draft)?;
        let request = ApiRequest::put(format!("/evaluations/{}", evaluation_id.0), body);
        let envelope: EvaluationEnvelope = decode(self.execute(request).await?)?;
        info!(evaluation_id = evaluation_id.0, "evaluation updated");
        Ok(envelope.into_evaluation())
    }

    pub async fn get_evaluation(&self, evaluation_id: EvaluationId) -> Result<Evaluation, ApiError> {
        let request = ApiRequest::get(format!("/evaluations/{}", evaluation_id.0));
        decode(self.execute(request).await?)
    }

    pub async fn list_evaluations(&self, query: &ListQuery) -> Result<Page<Evaluation>, ApiError> {
        let request = ApiRequest::get("/evaluations").with_query(query.params());
        let envelope: EvaluationListEnvelope = decode(self.execute(request).await?)?;
        Ok(paginate_result(envelope, query.page()))
    }

    pub async fn delete_evaluation(&self, evaluation_id: EvaluationId) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/evaluations/{}", evaluation_id.0));
        ensure_success(self.execute(request).await?)?;
        info!(evaluation_id = evaluation_id.0, "evaluation deleted");
        Ok(())
    }

    pub async fn dashboard_stats(&self, days: u32) -> Result<DashboardStats, ApiError> {
        let request = ApiRequest::get("/dashboard/stats")
            .with_query(vec![("days".to_string(), days.to_string())]);
        decode(self.execute(request).await?)
    }

    pub async fn recent_activity(&self, limit: u32) -> Result<RecentActivity, ApiError> {
        let request = ApiRequest::get("/dashboard/recent-activity")
            .with_query(vec![("limit".to_string(), limit.to_string())]);
        decode(self.execute(request).await?)
    }

    pub async fn operator_performance(&self, days: u32) -> Result<Vec<OperatorPerformance>, ApiError> {
        let request = ApiRequest::get("/dashboard/operator-performance")
            .with_query(vec![("days".to_string(), days.to_string())]);
        let envelope: OperatorPerformanceEnvelope = decode(self.execute(request).await?)?;
        Ok(envelope.operators)
    }

    /// Sends with the current access token. A 401 gets one refresh and one
    /// retry; a second 401 ends the session.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = self.auth.access_token().await;
        let response = self
            .send_bounded(request.clone().with_bearer(token.clone()))
            .await?;
        if response.status != 401 {
            return Ok(response);
        }

        debug!(path = %request.path, "access token rejected");
        let fresh = self.refresh_access_token(token.as_deref()).await?;
        let retry = self.send_bounded(request.with_bearer(Some(fresh))).await?;
        if retry.status == 401 {
            self.auth.force_login("retried request rejected").await;
            return Err(ApiError::AuthFailure);
        }
        Ok(retry)
    }

    /// One refresh at a time. A caller that waited on the gate while another
    /// refreshed picks up the new token instead of refreshing again.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.auth.lock_refresh().await;

        let Some(credentials) = self.auth.credentials().await else {
            self.auth.force_login("no credentials to refresh").await;
            return Err(ApiError::AuthFailure);
        };
        if stale != Some(credentials.access_token.as_str()) {
            return Ok(credentials.access_token);
        }
        let Some(refresh_token) = credentials.refresh_token else {
            self.auth.force_login("no refresh token").await;
            return Err(ApiError::AuthFailure);
        };

        let request = ApiRequest::post("/auth/refresh", json!({})).with_bearer(Some(refresh_token));
        let refreshed = match self.send_bounded(request).await {
            Ok(response) if response.is_success() => response.json::<RefreshResponse>().ok(),
            Ok(response) => {
                warn!(status = response.status, "token refresh rejected");
                None
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                None
            }
        };

        match refreshed {
            Some(RefreshResponse { access_token }) => {
                self.auth.replace_access_token(access_token.clone()).await?;
                Ok(access_token)
            }
            None => {
                self.auth.force_login("refresh failed").await;
                Err(ApiError::AuthFailure)
            }
        }
    }

    async fn send_bounded(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs_f64(), "request timed out");
                Err(ApiError::Timeout(self.timeout))
            }
            Ok(Err(err)) => {
                warn!(error = %err, "transport failure");
                Err(ApiError::Transport(err))
            }
        }
    }
}

fn ensure_valid(draft: &EvaluationDraft) -> Result<(), ApiError> {
    let report = validate_evaluation(draft);
    if report.is_empty() {
        Ok(())
    } else {
        debug!(errors = report.len(), "evaluation draft rejected locally");
        Err(ApiError::Validation(report))
    }
}

fn ensure_success(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        let err = ApiError::from_response(&response);
        warn!(status = response.status, error = %err, "request failed");
        Err(err)
    }
}

fn decode<R: DeserializeOwned>(response: ApiResponse) -> Result<R, ApiError> {
    let response = ensure_success(response)?;
    Ok(response.json()?)
}
