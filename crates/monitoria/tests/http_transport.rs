//! The reqwest transport against a local stub of the monitoring API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use monitoria::api::{
    ApiError, ApiRequest, ApiTransport, AuthSession, MemoryCredentialStore, MonitoriaClient,
    ReqwestTransport,
};
use monitoria::calls::{CallId, CallStatus};
use monitoria::query::{CallFilter, ListQuery};

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "marina" && body["password"] == "s3cret" {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login realizado com sucesso",
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "user": {
                    "id": 3,
                    "username": "marina",
                    "full_name": "Marina Costa",
                    "email": "marina@example.com",
                    "role": "supervisor",
                    "is_active": true
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Credenciais inválidas"})),
        )
    }
}

async fn list_calls(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if bearer(&headers).as_deref() != Some("access-1") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"msg": "Missing Authorization Header"})));
    }
    let page: u32 = params
        .get("page")
        .and_then(|page| page.parse().ok())
        .unwrap_or(1);
    let status = params.get("status").cloned().unwrap_or_else(|| "open".to_string());
    (
        StatusCode::OK,
        Json(json!({
            "calls": [{
                "id": 7,
                "protocol": "ATD-0007",
                "customer_name": "João Pereira",
                "subject": "Segunda via de fatura",
                "status": status,
                "priority": "medium",
                "created_at": "2024-03-02T10:15:00",
                "evaluations": []
            }],
            "total": 21,
            "pages": 2,
            "current_page": page
        })),
    )
}

async fn show_call(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("Chamada {id} não encontrada")})),
    )
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/calls", get(list_calls))
        .route("/api/calls/:id", get(show_call));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serves");
    });
    addr
}

fn transport(addr: SocketAddr) -> ReqwestTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client builds");
    ReqwestTransport::with_client(client, format!("http://{addr}/api/"))
}

#[tokio::test]
async fn login_then_list_sends_bearer_and_query() {
    let addr = spawn_stub().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let auth = Arc::new(AuthSession::new(Arc::clone(&store)).expect("memory store loads"));
    let client = MonitoriaClient::new(Arc::new(transport(addr)), auth, Duration::from_secs(5));

    let user = client.login("marina", "s3cret").await.expect("login");
    assert_eq!(user.username, "marina");

    let mut query = ListQuery::calls();
    query.set_filter(CallFilter::Status.key(), "closed");
    query.set_page(2);
    let page = client.list_calls(&query).await.expect("page");

    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_items, 21);
    assert_eq!(page.items[0].protocol, "ATD-0007");
    assert_eq!(page.items[0].status, CallStatus::Closed);
}

#[tokio::test]
async fn error_body_message_reaches_the_caller() {
    let addr = spawn_stub().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let auth = Arc::new(AuthSession::new(store).expect("memory store loads"));
    let client = MonitoriaClient::new(Arc::new(transport(addr)), auth, Duration::from_secs(5));

    let err = client
        .login("marina", "wrong")
        .await
        .expect_err("bad password");
    assert_eq!(err.to_string(), "request failed (401): Credenciais inválidas");

    let err = client.get_call(CallId(999)).await.expect_err("missing");
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn raw_transport_reports_status_and_body() {
    let addr = spawn_stub().await;

    let response = transport(addr)
        .send(ApiRequest::get("/calls/12"))
        .await
        .expect("stub answers");

    assert_eq!(response.status, 404);
    assert_eq!(response.error_message(), "Chamada 12 não encontrada");
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let err = transport(addr)
        .send(ApiRequest::get("/auth/me"))
        .await
        .expect_err("nothing listening");

    assert!(matches!(err, monitoria::api::TransportError::Connection(_)));
}
