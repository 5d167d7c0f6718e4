use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

/// Lifetime of one view. Requests bound to the scope resolve to
/// `ApiError::Cancelled` once it is cancelled or dropped.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

/// Detached handle that can cancel a scope from elsewhere (a signal handler, a sibling task).
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    token: CancellationToken,
}

impl ScopeHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            token: self.token.clone(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Owns a clone of the token, so the returned future may be spawned.
    pub fn bind<F, R>(&self, request: F) -> impl Future<Output = Result<R, ApiError>> + Send
    where
        F: Future<Output = Result<R, ApiError>> + Send,
    {
        let token = self.token.clone();
        async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = request => result,
            }
        }
    }

    pub async fn run<F, R>(&self, request: F) -> Result<R, ApiError>
    where
        F: Future<Output = Result<R, ApiError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ApiError::Cancelled),
            result = request => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
