use std::time::Duration;

use super::credentials::StoreError;
use super::transport::{ApiResponse, TransportError};
use crate::evaluations::ValidationReport;

/// Failure of a client operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(ValidationReport),
    #[error("authentication expired; log in again")]
    AuthFailure,
    #[error("not found")]
    NotFound,
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },
    #[error(transparent)]
    Transport(TransportError),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub(crate) fn from_response(response: &ApiResponse) -> Self {
        match response.status {
            404 => Self::NotFound,
            status => Self::Request {
                status,
                message: response.error_message(),
            },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure)
    }
}
