//! Explicit session context.
//!
//! Everything the workflow needs to know about "who is logged in and where
//! the backend lives" travels in a [`SessionContext`] value handed to
//! constructors. Nothing is read from globals.

use url::Url;

use crate::types::EndorserId;

/// The authenticated endorser and the environment they act in.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// The endorser making decisions.
    pub endorser_id: EndorserId,

    /// Base URL of the admin API (e.g. `https://example.org/admin-api`).
    pub api_base: Url,

    /// Bearer token for the admin API.
    pub access_token: Option<String>,

    /// Address users are told to contact about endorsement problems.
    pub contact_email: String,
}

impl SessionContext {
    pub fn new(endorser_id: impl Into<EndorserId>, api_base: Url) -> Self {
        SessionContext {
            endorser_id: endorser_id.into(),
            api_base,
            access_token: None,
            contact_email: crate::config::DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = email.into();
        self
    }

    /// Returns true if there is a user to act as endorser.
    pub fn has_user(&self) -> bool {
        !self.endorser_id.is_empty()
    }

    /// True if this session came from a fresh login after `previous` was
    /// refused: it has a user, and its token or its user differs.
    pub fn is_renewal_of(&self, previous: &SessionContext) -> bool {
        self.has_user()
            && (self.access_token != previous.access_token
                || self.endorser_id != previous.endorser_id)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("endorser_id", &self.endorser_id)
            .field("api_base", &self.api_base.as_str())
            .field("has_token", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}
