//! Newtype wrappers for domain identifiers.
//!
//! These keep endorser IDs, request IDs and codes from being mixed up at call
//! sites, and make the wire format explicit via `#[serde(transparent)]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated user's ID, as the admin API spells it (a string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndorserId(pub String);

impl EndorserId {
    pub fn new(s: impl Into<String>) -> Self {
        EndorserId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no user is attached (the original UI's "No current user").
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EndorserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EndorserId {
    fn from(s: &str) -> Self {
        EndorserId(s.to_string())
    }
}

impl From<String> for EndorserId {
    fn from(s: String) -> Self {
        EndorserId(s)
    }
}

/// Server-side identifier of an endorsement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        RequestId(n)
    }
}

/// A syntactically valid endorsement code.
///
/// The only way to obtain one outside this crate is through
/// [`crate::code::validate_code`], so holding an `EndorsementCode` means the
/// length check already passed. Codes are never edited in place: a new edit
/// produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EndorsementCode(String);

impl EndorsementCode {
    /// Wraps an already-validated string.
    pub(crate) fn new_unchecked(s: String) -> Self {
        EndorsementCode(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndorsementCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
