use std::sync::Arc;

use monitoria::api::{AuthSession, FileCredentialStore, MonitoriaClient, ReqwestTransport};
use monitoria::config::AppConfig;
use monitoria::error::AppError;
use monitoria::telemetry;
use monitoria::users::User;
use tracing::debug;

pub(crate) type Client = MonitoriaClient<ReqwestTransport, FileCredentialStore>;

/// Everything a command needs: the configured client and the output mode.
pub(crate) struct Context {
    pub(crate) client: Client,
    pub(crate) json: bool,
}

impl Context {
    pub(crate) fn from_env(json: bool) -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let transport = Arc::new(ReqwestTransport::new(&config.api)?);
        let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
        let auth = Arc::new(AuthSession::new(store)?);
        debug!(
            ?config.environment,
            api = %config.api.base_url,
            credentials = %config.credentials_path.display(),
            "client configured"
        );

        Ok(Self {
            client: MonitoriaClient::new(transport, auth, config.api.request_timeout),
            json,
        })
    }

    /// Stored user when available, otherwise `/auth/me`.
    pub(crate) async fn user(&self) -> Result<User, AppError> {
        if let Some(user) = self.client.auth().current_user().await {
            return Ok(user);
        }
        if self.client.auth().access_token().await.is_none() {
            return Err(AppError::Usage(
                "not logged in; run `monitoria login --username <name>`".to_string(),
            ));
        }
        Ok(self.client.current_user().await?)
    }
}
