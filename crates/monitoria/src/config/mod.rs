use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CREDENTIALS_PATH: &str = ".monitoria/credentials.json";

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub credentials_path: PathBuf,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("MONITORIA_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("MONITORIA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api = ApiConfig::new(
            base_url,
            env::var("MONITORIA_REQUEST_TIMEOUT_SECS").ok().as_deref(),
        )?;

        let credentials_path = env::var("MONITORIA_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        let log_level = env::var("MONITORIA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api,
            credentials_path,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for reaching the monitoring API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Validates the base URL and parses an optional timeout in whole seconds.
    pub fn new(base_url: String, timeout_secs: Option<&str>) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&trimmed).map_err(|_| ConfigError::InvalidApiUrl {
            value: base_url.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl { value: base_url });
        }

        let secs = match timeout_secs {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: trimmed,
            request_timeout: Duration::from_secs(secs),
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl { value: String },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl { value } => {
                write!(f, "MONITORIA_API_URL must be an http(s) URL, got '{}'", value)
            }
            ConfigError::InvalidTimeout => write!(
                f,
                "MONITORIA_REQUEST_TIMEOUT_SECS must be a positive number of seconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
