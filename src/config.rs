//! Client configuration.
//!
//! Configuration comes from environment variables. Parsing goes through a
//! lookup function so tests can supply a map instead of mutating the process
//! environment.
//!
//! | Variable                | Meaning                            | Default          |
//! |-------------------------|------------------------------------|------------------|
//! | `ENDORSE_API_URL`       | Admin API base URL                 | required         |
//! | `ENDORSE_ENDORSER_ID`   | ID of the logged-in endorser       | required         |
//! | `ENDORSE_API_TOKEN`     | Bearer token                       | none             |
//! | `ENDORSE_CONTACT_EMAIL` | Contact address shown in notices   | `help@arxiv.org` |
//! | `ENDORSE_TIMEOUT_SECS`  | Per-request timeout                | 30               |
//! | `ENDORSE_DEBOUNCE_MS`   | Delay before sending a preflight   | 300              |

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::api::RetryConfig;
use crate::session::SessionContext;
use crate::types::EndorserId;

pub const DEFAULT_CONTACT_EMAIL: &str = "help@arxiv.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    /// The API URL does not parse.
    #[error("invalid {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// A numeric variable does not parse.
    #[error("invalid {var}: {value:?} is not a non-negative integer")]
    InvalidNumber { var: &'static str, value: String },
}

/// Configuration for the HTTP client and workflow driver.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub endorser_id: EndorserId,
    pub access_token: Option<String>,
    pub contact_email: String,
    pub timeout: Duration,
    pub debounce: Duration,
    /// Retry behaviour for safely retriable calls (preflight, category lookup).
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(api_base_url: Url, endorser_id: impl Into<EndorserId>) -> Self {
        ClientConfig {
            api_base_url,
            endorser_id: endorser_id.into(),
            access_token: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            retry: RetryConfig::DEFAULT,
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get("ENDORSE_API_URL").ok_or(ConfigError::Missing("ENDORSE_API_URL"))?;
        let api_base_url = Url::parse(url.trim()).map_err(|source| ConfigError::InvalidUrl {
            var: "ENDORSE_API_URL",
            source,
        })?;
        let endorser_id =
            get("ENDORSE_ENDORSER_ID").ok_or(ConfigError::Missing("ENDORSE_ENDORSER_ID"))?;

        let mut config = ClientConfig::new(api_base_url, endorser_id.trim().to_string());
        config.access_token = get("ENDORSE_API_TOKEN");
        if let Some(email) = get("ENDORSE_CONTACT_EMAIL") {
            config.contact_email = email;
        }
        if let Some(value) = get("ENDORSE_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("ENDORSE_TIMEOUT_SECS", value)?);
        }
        if let Some(value) = get("ENDORSE_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(parse_number("ENDORSE_DEBOUNCE_MS", value)?);
        }
        Ok(config)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the session context this configuration describes.
    pub fn session(&self) -> SessionContext {
        let session = SessionContext::new(self.endorser_id.clone(), self.api_base_url.clone())
            .with_contact_email(self.contact_email.clone());
        match &self.access_token {
            Some(token) => session.with_access_token(token.clone()),
            None => session,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("endorser_id", &self.endorser_id)
            .field("has_token", &self.access_token.is_some())
            .field("timeout", &self.timeout)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

fn parse_number(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ENDORSE_API_URL", "https://example.org/admin-api"),
            ("ENDORSE_ENDORSER_ID", "1129053"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://example.org/admin-api");
        assert_eq!(config.endorser_id, EndorserId::new("1129053"));
        assert_eq!(config.access_token, None);
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ENDORSE_API_URL", "http://localhost:8080"),
            ("ENDORSE_ENDORSER_ID", "7"),
            ("ENDORSE_API_TOKEN", "tok"),
            ("ENDORSE_CONTACT_EMAIL", "mods@example.org"),
            ("ENDORSE_TIMEOUT_SECS", "5"),
            ("ENDORSE_DEBOUNCE_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.contact_email, "mods@example.org");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.debounce, Duration::ZERO);

        let session = config.session();
        assert_eq!(session.access_token.as_deref(), Some("tok"));
        assert_eq!(session.contact_email, "mods@example.org");
    }

    #[test]
    fn missing_url_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[("ENDORSE_ENDORSER_ID", "7")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENDORSE_API_URL")));
    }

    #[test]
    fn blank_endorser_is_missing() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("ENDORSE_API_URL", "http://localhost:8080"),
            ("ENDORSE_ENDORSER_ID", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENDORSE_ENDORSER_ID")));
    }

    #[test]
    fn bad_number_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("ENDORSE_API_URL", "http://localhost:8080"),
            ("ENDORSE_ENDORSER_ID", "7"),
            ("ENDORSE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: "ENDORSE_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn bad_url_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("ENDORSE_API_URL", "not a url"),
            ("ENDORSE_ENDORSER_ID", "7"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
