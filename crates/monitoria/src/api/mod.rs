//! HTTP access to the monitoring service: transport seam, credential
//! persistence, token refresh, and the typed client.

mod auth;
mod client;
mod credentials;
mod error;
mod http;
mod transport;

pub use auth::{AuthSession, SessionStatus};
pub use client::MonitoriaClient;
pub use credentials::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore, StoreError,
};
pub use error::ApiError;
pub use http::ReqwestTransport;
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, TransportError};
