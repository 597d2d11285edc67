//! Effect interpreter trait.
//!
//! The trait-based design keeps the workflow independent of the transport:
//! - [`crate::api::HttpClient`] runs effects against the admin REST API
//! - tests use scripted interpreters with controllable latency

use std::future::Future;

use super::api::{ApiEffect, ApiResponse};
use crate::api::ApiError;
use crate::session::SessionContext;

/// Interprets API effects against the endorsement authority.
///
/// Implementations are constructed with a session, so credentials are not
/// part of the effects. After a fresh login the driver swaps in an
/// interpreter from [`EndorsementInterpreter::with_session`].
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct FixedOutcome(Outcome);
///
/// impl EndorsementInterpreter for FixedOutcome {
///     async fn interpret(&self, effect: ApiEffect) -> Result<ApiResponse, ApiError> {
///         match effect {
///             ApiEffect::LookupCategory { .. } => Err(ApiError::not_found("no category")),
///             _ => Ok(ApiResponse::Outcome(self.0.clone())),
///         }
///     }
///
///     fn with_session(&self, _session: SessionContext) -> Self {
///         FixedOutcome(self.0.clone())
///     }
/// }
/// ```
pub trait EndorsementInterpreter {
    /// Execute an effect and return its response.
    fn interpret(
        &self,
        effect: ApiEffect,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    /// The same interpreter acting for `session`.
    fn with_session(&self, session: SessionContext) -> Self;
}
