//! Log output for the CLI. Diagnostics go to stderr so `--json` output on
//! stdout stays machine-readable.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directive, .. } => {
                write!(f, "MONITORIA_LOG_LEVEL '{directive}' is not a valid log filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a log subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Picks the filter: a parseable `RUST_LOG` override first, then the configured level.
fn log_filter(configured: &str, override_directive: Option<&str>) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = override_directive.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured).map_err(|source| TelemetryError::InvalidFilter {
        directive: configured.to_string(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let override_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(&config.log_level, override_directive.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn override_wins_when_it_parses() {
        let filter = log_filter("info", Some("monitoria=debug")).expect("override parses");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn unusable_override_falls_back_to_configured_level() {
        let filter = log_filter("warn", Some("monitoria=loud")).expect("configured level used");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn bad_configured_level_names_the_variable() {
        let err = log_filter("monitoria=loud", None).expect_err("invalid directive");
        assert!(err.to_string().starts_with("MONITORIA_LOG_LEVEL 'monitoria=loud'"));
    }
}
