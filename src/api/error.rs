//! Admin API error types.
//!
//! Every failure of a call to the endorsement authority is classified into one
//! of four kinds. The workflow controller only ever looks at the kind; raw
//! transport errors never reach presentation code.
//!
//! - **NotFound** (404): unknown or expired code. Recoverable.
//! - **Unauthenticated** (401): the session is no longer valid. Never retried
//!   with the same credentials.
//! - **RuleViolation** (405 and other 4xx): the authority refused on business
//!   grounds, including a duplicate decision. Final; shown verbatim.
//! - **Server** (5xx, 408, 429, transport failures, undecodable bodies):
//!   recoverable; the only kind that is ever retried.

use std::fmt;
use thiserror::Error;

/// The kind of API error, categorized for workflow decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The code is unknown or expired (HTTP 404).
    NotFound,

    /// The session is invalid (HTTP 401). Requires a fresh login.
    Unauthenticated,

    /// The authority rejected the call on business grounds.
    ///
    /// HTTP 405 carries a `reason`; other 4xx responses (409 on a duplicate
    /// decision, 422 on a malformed request) are treated the same way.
    RuleViolation,

    /// Server-side or transport failure, including request timeouts (408)
    /// and throttling (429). Safe to retry for reads.
    Server,
}

impl ApiErrorKind {
    /// Returns true if this error may be retried automatically.
    ///
    /// Even then, only non-mutating calls are retried; see
    /// [`crate::api::RetryPolicy`].
    pub fn is_retriable(&self) -> bool {
        matches!(self, ApiErrorKind::Server)
    }

    /// Classifies an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiErrorKind::Unauthenticated,
            404 => ApiErrorKind::NotFound,
            408 | 429 => ApiErrorKind::Server,
            400..=499 => ApiErrorKind::RuleViolation,
            _ => ApiErrorKind::Server,
        }
    }
}

/// An admin API error with its classification.
#[derive(Debug, Error)]
pub struct ApiError {
    pub kind: ApiErrorKind,

    /// The HTTP status code, if a response was received.
    pub status_code: Option<u16>,

    /// Human-readable description. For rule violations this is the
    /// authority's reason, verbatim.
    pub message: String,

    /// The underlying transport error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "admin API error (HTTP {}): {}", code, self.message),
            None => write!(f, "admin API error: {}", self.message),
        }
    }
}

impl ApiError {
    fn without_source(kind: ApiErrorKind, status_code: Option<u16>, message: String) -> Self {
        Self {
            kind,
            status_code,
            message,
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::without_source(ApiErrorKind::NotFound, Some(404), message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::without_source(ApiErrorKind::Unauthenticated, Some(401), message.into())
    }

    /// A business-rule rejection carrying the authority's reason.
    pub fn rule_violation(reason: impl Into<String>) -> Self {
        Self::without_source(ApiErrorKind::RuleViolation, Some(405), reason.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::without_source(ApiErrorKind::Server, None, message.into())
    }

    /// Classifies an error response from its status and body.
    ///
    /// The message is taken from `reason` (405 responses), then `detail`
    /// (FastAPI's error shape), then a stock message for the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let message = extract_message(status, body).unwrap_or_else(|| match kind {
            ApiErrorKind::NotFound => "Not Found".to_string(),
            ApiErrorKind::Unauthenticated => "Please login".to_string(),
            ApiErrorKind::RuleViolation if status == 405 => "Reason not given".to_string(),
            ApiErrorKind::RuleViolation => format!("Request rejected (HTTP {})", status),
            ApiErrorKind::Server => "Unknown error".to_string(),
        });
        Self::without_source(kind, Some(status), message)
    }

    /// Classifies a transport-level failure.
    ///
    /// Timeouts, connection failures and undecodable bodies are all server
    /// errors: the call may or may not have reached the authority.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let kind = status_code
            .map(ApiErrorKind::from_status)
            .unwrap_or(ApiErrorKind::Server);
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to the admin API".to_string()
        } else if err.is_decode() {
            "could not decode the admin API response".to_string()
        } else {
            err.to_string()
        };
        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }
}

/// Pulls a human-readable message out of an error body.
fn extract_message(status: u16, body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let pick = |key: &str| -> Option<String> {
        match value.get(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Null | serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        }
    };
    if status == 405 {
        pick("reason").or_else(|| pick("detail"))
    } else {
        pick("detail").or_else(|| pick("reason"))
    }
}
