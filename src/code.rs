//! Endorsement code validation.
//!
//! Codes are checked locally on every edit, before any network call. A code
//! is valid iff it is exactly [`CODE_LENGTH`] characters long; anything else
//! is rejected here and never reaches the preflight.

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::types::EndorsementCode;

/// Required length of an endorsement code, in characters.
pub const CODE_LENGTH: usize = 6;

/// Why a code was rejected locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InvalidCode {
    /// No code entered.
    #[error("empty")]
    Empty,

    /// A code was entered but has the wrong number of characters.
    #[error("wrong-length")]
    WrongLength { len: usize },
}

impl InvalidCode {
    /// Helper text for the code input.
    pub fn hint(&self) -> &'static str {
        match self {
            InvalidCode::Empty => "Empty",
            InvalidCode::WrongLength { .. } => "Invalid",
        }
    }
}

/// Validates raw code text.
///
/// Length is counted in Unicode scalar values, so a six-character code typed
/// with non-ASCII characters is still six characters. Surrounding whitespace
/// is not trimmed: a pasted code with a trailing newline is a different code.
///
/// # Example
///
/// ```
/// use endorsement_flow::code::{InvalidCode, validate_code};
///
/// assert!(validate_code("AB12CD").is_ok());
/// assert_eq!(validate_code("XYZ"), Err(InvalidCode::WrongLength { len: 3 }));
/// assert_eq!(validate_code(""), Err(InvalidCode::Empty));
/// ```
pub fn validate_code(raw: &str) -> Result<EndorsementCode, InvalidCode> {
    let len = raw.chars().count();
    if len == 0 {
        Err(InvalidCode::Empty)
    } else if len != CODE_LENGTH {
        Err(InvalidCode::WrongLength { len })
    } else {
        Ok(EndorsementCode::new_unchecked(raw.to_string()))
    }
}

/// Extracts a prefilled code from a link such as
/// `https://arxiv.org/user/endorse?code=AB12CD`.
///
/// Returns the raw value even if it fails validation; the caller feeds it
/// through the normal edit path so the usual error hint is shown.
pub fn code_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
