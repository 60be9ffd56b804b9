//! Client configuration.

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.battlemetrics.com";

pub const TOKEN_VAR: &str = "BATTLEMETRICS_TOKEN";
pub const BASE_URL_VAR: &str = "BATTLEMETRICS_API_URL";
pub const TIMEOUT_VAR: &str = "BATTLEMETRICS_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("BATTLEMETRICS_TIMEOUT_SECS must be a positive number of seconds, got `{0}`")]
    InvalidTimeout(String),
}

/// Everything needed to construct a client. The token is redacted from
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: SecretString,
    /// Per-request timeout enforced by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: SecretString::from(token.into()),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `BATTLEMETRICS_TOKEN`, `BATTLEMETRICS_API_URL` and
    /// `BATTLEMETRICS_TIMEOUT_SECS`. Only the token is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(TOKEN_VAR).map_err(|_| ConfigError::MissingVar(TOKEN_VAR))?;
        let mut config = Self::new(token);
        if let Ok(base_url) = std::env::var(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(config.token.expose_secret(), "super-secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn from_env_reads_all_vars() {
        temp_env::with_vars(
            [
                (TOKEN_VAR, Some("tok")),
                (BASE_URL_VAR, Some("http://127.0.0.1:9000")),
                (TIMEOUT_VAR, Some("15")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.token.expose_secret(), "tok");
                assert_eq!(config.base_url, "http://127.0.0.1:9000");
                assert_eq!(config.timeout, Some(Duration::from_secs(15)));
            },
        );
    }

    #[test]
    fn from_env_requires_token() {
        temp_env::with_vars_unset([TOKEN_VAR, BASE_URL_VAR, TIMEOUT_VAR], || {
            let err = ClientConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingVar(TOKEN_VAR)));
        });
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        temp_env::with_vars([(TOKEN_VAR, Some("tok")), (TIMEOUT_VAR, Some("0"))], || {
            let err = ClientConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout(ref raw) if raw == "0"));
        });
    }
}
