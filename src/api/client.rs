//! HTTP client for the admin API, bound to one session.
//!
//! `HttpClient` wraps a `reqwest::Client` together with the
//! [`SessionContext`] it acts for. Effects don't carry credentials or base
//! URLs; the client adds them.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use super::retry::RetryConfig;
use crate::config::ClientConfig;
use crate::session::SessionContext;

/// Errors constructing an [`HttpClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    #[error("API base URL cannot have paths appended: {0}")]
    InvalidBaseUrl(String),
}

/// An admin API client scoped to a session.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    session: SessionContext,
    retry: RetryConfig,
}

impl HttpClient {
    /// Creates a client for `session` with the given per-request timeout.
    pub fn new(
        session: SessionContext,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, ClientError> {
        if session.api_base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(session.api_base.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            session,
            retry,
        })
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.session(), config.timeout, config.retry)
    }

    /// A client for a renewed session, sharing the connection pool.
    pub fn with_session(&self, session: SessionContext) -> Self {
        Self {
            client: self.client.clone(),
            session,
            retry: self.retry,
        }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// Builds an endpoint URL by appending path segments to the API base.
    ///
    /// Segments are percent-encoded, so archive names and subject classes
    /// can't escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.session.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Attaches the session's credentials to a request.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
