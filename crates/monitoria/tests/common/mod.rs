//! Scripted transport and fixtures shared by the client integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use monitoria::api::{
    ApiRequest, ApiResponse, ApiTransport, AuthSession, Credentials, HttpMethod,
    MemoryCredentialStore, MonitoriaClient, TransportError,
};
use monitoria::users::{User, UserId, UserRole};

/// Answers every request through `handler` and records what was sent.
/// Each send yields once so concurrent callers interleave.
pub struct ScriptedTransport<F> {
    handler: F,
    log: Mutex<Vec<ApiRequest>>,
}

impl<F> ScriptedTransport<F>
where
    F: Fn(&ApiRequest) -> ApiResponse + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }
}

#[async_trait]
impl<F> ApiTransport for ScriptedTransport<F>
where
    F: Fn(&ApiRequest) -> ApiResponse + Send + Sync,
{
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        tokio::task::yield_now().await;
        Ok((self.handler)(&request))
    }
}

/// Never answers.
pub struct SilentTransport;

#[async_trait]
impl ApiTransport for SilentTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, TransportError> {
        std::future::pending().await
    }
}

pub type TestClient<T> = MonitoriaClient<T, MemoryCredentialStore>;

pub struct Harness<T> {
    pub client: TestClient<T>,
    pub store: Arc<MemoryCredentialStore>,
    pub transport: Arc<T>,
}

pub fn harness<T>(transport: T, credentials: Option<Credentials>) -> Harness<T>
where
    T: ApiTransport + 'static,
{
    let store = Arc::new(match credentials {
        Some(credentials) => MemoryCredentialStore::with_credentials(credentials),
        None => MemoryCredentialStore::new(),
    });
    let transport = Arc::new(transport);
    let auth = Arc::new(AuthSession::new(Arc::clone(&store)).expect("memory store loads"));
    let client = MonitoriaClient::new(Arc::clone(&transport), auth, Duration::from_secs(15));
    Harness {
        client,
        store,
        transport,
    }
}

pub fn stale_credentials() -> Credentials {
    Credentials {
        access_token: "stale".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        user: Some(user(UserRole::Supervisor)),
    }
}

pub fn user(role: UserRole) -> User {
    User {
        id: UserId(3),
        username: "marina".to_string(),
        full_name: "Marina Costa".to_string(),
        email: Some("marina@example.com".to_string()),
        role,
        is_active: true,
    }
}

pub fn user_json() -> Value {
    json!({
        "id": 3,
        "username": "marina",
        "full_name": "Marina Costa",
        "email": "marina@example.com",
        "role": "supervisor",
        "is_active": true
    })
}

pub fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

pub fn unauthorized() -> ApiResponse {
    respond(401, json!({"msg": "Token has expired"}))
}

pub fn bearer(request: &ApiRequest) -> Option<&str> {
    request.bearer.as_deref()
}

pub fn call_json(id: i64, evaluations: Vec<Value>) -> Value {
    json!({
        "id": id,
        "protocol": format!("ATD-{id:04}"),
        "customer_name": "João Pereira",
        "customer_phone": "(11) 98888-1234",
        "subject": "Segunda via de fatura",
        "description": "Cliente solicitou segunda via",
        "status": "resolved",
        "priority": "medium",
        "category": "support",
        "duration_seconds": 372,
        "created_at": "2024-03-02T10:15:00",
        "operator_id": 4,
        "operator_name": "Ana Souza",
        "evaluations": evaluations
    })
}

pub fn evaluation_json(id: i64, call_id: i64, overall_score: f64) -> Value {
    json!({
        "id": id,
        "call_id": call_id,
        "evaluator_id": 3,
        "evaluator_name": "Marina Costa",
        "greeting_score": 5,
        "communication_score": 4,
        "problem_solving_score": 4,
        "empathy_score": 5,
        "procedure_score": 3,
        "closing_score": 4,
        "overall_score": overall_score,
        "positive_points": "Cordial do início ao fim",
        "improvement_points": "Confirmar dados antes de encerrar",
        "general_comments": null,
        "requires_coaching": false,
        "is_exemplary": false,
        "created_at": "2024-03-02T11:00:00",
        "updated_at": null
    })
}

pub fn call_page_json(calls: Vec<Value>, total: u64, pages: u32, current_page: u32) -> Value {
    json!({
        "calls": calls,
        "total": total,
        "pages": pages,
        "current_page": current_page
    })
}
