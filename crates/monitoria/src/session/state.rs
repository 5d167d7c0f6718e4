use tracing::warn;

use crate::api::ApiError;

/// Load state of a view's data.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ViewError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Maps a request outcome into a view state, logging failures.
    pub(crate) fn settle(result: Result<T, ApiError>, what: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => {
                warn!(view = what, error = %err, "load failed");
                Self::Failed(ViewError::from(&err))
            }
        }
    }
}

/// Failure shown in place of a view's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    LoginRequired,
    NotPermitted,
    Cancelled,
    Request(String),
}

impl ViewError {
    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "not found".to_string(),
            Self::LoginRequired => "session expired; log in again".to_string(),
            Self::NotPermitted => "not permitted for your role".to_string(),
            Self::Cancelled => "cancelled".to_string(),
            Self::Request(message) => message.clone(),
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => Self::NotFound,
            ApiError::AuthFailure => Self::LoginRequired,
            ApiError::Cancelled => Self::Cancelled,
            ApiError::Request { status: 403, .. } => Self::NotPermitted,
            other => Self::Request(other.to_string()),
        }
    }
}
