use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard, RwLock};
use tracing::{info, warn};

use super::credentials::{CredentialStore, Credentials, StoreError};
use crate::users::User;

/// Observable authentication state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    /// Credentials were rejected and cleared; the user must log in again.
    LoginRequired,
}

/// Credentials held in memory and mirrored to a store, plus the gate that
/// serializes token refreshes.
pub struct AuthSession<S> {
    store: Arc<S>,
    credentials: RwLock<Option<Credentials>>,
    refresh_gate: Mutex<()>,
    status: watch::Sender<SessionStatus>,
}

impl<S> AuthSession<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>) -> Result<Self, StoreError> {
        let credentials = store.load()?;
        let initial = if credentials.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        };
        let (status, _) = watch::channel(initial);

        Ok(Self {
            store,
            credentials: RwLock::new(credentials),
            refresh_gate: Mutex::new(()),
            status,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .await
            .as_ref()
            .map(|credentials| credentials.access_token.clone())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.credentials
            .read()
            .await
            .as_ref()
            .and_then(|credentials| credentials.user.clone())
    }

    pub async fn establish(&self, credentials: Credentials) -> Result<(), StoreError> {
        self.store.save(&credentials)?;
        *self.credentials.write().await = Some(credentials);
        self.status.send_replace(SessionStatus::Authenticated);
        Ok(())
    }

    /// Swaps in a refreshed access token, keeping the refresh token and user.
    /// Memory changes only once the store has accepted the new record.
    pub async fn replace_access_token(&self, access_token: String) -> Result<(), StoreError> {
        let mut guard = self.credentials.write().await;
        let Some(current) = guard.as_ref() else {
            return Ok(());
        };
        let updated = Credentials {
            access_token,
            ..current.clone()
        };
        self.store.save(&updated)?;
        *guard = Some(updated);
        info!("access token refreshed");
        Ok(())
    }

    pub async fn update_user(&self, user: User) -> Result<(), StoreError> {
        let mut guard = self.credentials.write().await;
        let Some(current) = guard.as_ref() else {
            return Ok(());
        };
        let updated = Credentials {
            user: Some(user),
            ..current.clone()
        };
        self.store.save(&updated)?;
        *guard = Some(updated);
        Ok(())
    }

    /// Explicit logout.
    pub async fn end(&self) -> Result<(), StoreError> {
        *self.credentials.write().await = None;
        self.store.clear()?;
        self.status.send_replace(SessionStatus::Anonymous);
        info!("logged out");
        Ok(())
    }

    /// Drops rejected credentials and asks for a fresh login.
    pub async fn force_login(&self, reason: &str) {
        warn!(reason, "credentials rejected; login required");
        *self.credentials.write().await = None;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored credentials");
        }
        self.status.send_replace(SessionStatus::LoginRequired);
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }
}
