//! Admin API client and effect interpreter.
//!
//! This module executes [`crate::effects::ApiEffect`]s over HTTP with
//! reqwest. It implements the `EndorsementInterpreter` trait defined in the
//! effects module.
//!
//! Key features:
//! - Classified errors: not found, unauthenticated, rule violation, server
//! - Exponential backoff retry for server errors on non-mutating calls only
//! - Bearer credentials from the session, never part of the effects

mod client;
mod error;
mod interpreter;
mod retry;

pub use client::{ClientError, HttpClient};
pub use error::{ApiError, ApiErrorKind};
pub use retry::{RetryConfig, RetryPolicy, RetryResult, retry_with_backoff};
