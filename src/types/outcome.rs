//! Evaluation outcome types returned by the endorsement authority.
//!
//! An [`Outcome`] is produced by both the preflight and the commit call. It is
//! immutable once received: the workflow replaces it wholesale on every new
//! response and never patches individual fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RequestId;

/// Whether, and why not, the current user may endorse for a request.
///
/// Exactly one of four values. Unknown wire strings fail deserialization
/// instead of being mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndorserCapability {
    /// Qualified to endorse in this category.
    Credited,
    /// Not qualified for this category.
    Uncredited,
    /// Endorsing privileges suspended by administrative action.
    Prohibited,
    /// The request was made by the endorser themselves.
    Oneself,
}

impl EndorserCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndorserCapability::Credited => "credited",
            EndorserCapability::Uncredited => "uncredited",
            EndorserCapability::Prohibited => "prohibited",
            EndorserCapability::Oneself => "oneself",
        }
    }
}

impl fmt::Display for EndorserCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The endorsee's ask: permission to submit to `archive[.subject_class]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndorsementRequest {
    #[serde(default)]
    pub id: Option<RequestId>,
    pub archive: String,
    #[serde(default)]
    pub subject_class: Option<String>,
    #[serde(default)]
    pub endorsee_id: Option<String>,
}

impl EndorsementRequest {
    /// Returns the short category form, e.g. `math.AG` or `hep-th`.
    pub fn category(&self) -> String {
        match self.subject_class.as_deref().filter(|s| !s.is_empty()) {
            Some(subject) => format!("{}.{}", self.archive, subject),
            None => self.archive.clone(),
        }
    }

    /// Returns the category with its human-readable name, e.g.
    /// `math.AG - Algebraic Geometry`. Falls back to `all` when no name is known.
    pub fn category_full_name(&self, name: Option<&str>) -> String {
        format!("{} - {}", self.category(), name.unwrap_or("all"))
    }

    /// The subject class used for the category lookup. Archives without
    /// subject classes are looked up with `*`.
    pub fn lookup_subject_class(&self) -> &str {
        self.subject_class
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("*")
    }
}

/// Public profile of the endorsee.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
}

impl PublicUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Long form used on the review step: `First Last <email> - Affiliation`.
    pub fn display_long(&self) -> String {
        let email = self
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(|e| format!(" <{}>", e))
            .unwrap_or_default();
        let affiliation = self
            .affiliation
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or("No affiliation");
        format!("{}{} - {}", self.display_name(), email, affiliation)
    }
}

/// A recorded endorsement, present on committed or already-submitted outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Endorsement {
    #[serde(default)]
    pub point_value: i64,
}

/// Result of a preflight or commit evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub endorsement_request: Option<EndorsementRequest>,
    #[serde(default)]
    pub endorsee: Option<PublicUser>,
    /// True if this endorser already decided this request.
    #[serde(default)]
    pub submitted: bool,
    pub endorser_capability: EndorserCapability,
    /// Whether the underlying request is still valid.
    #[serde(default)]
    pub request_acceptable: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub endorsement: Option<Endorsement>,
}

impl Outcome {
    /// The server's reason, if it gave a non-blank one.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.trim().is_empty())
    }

    /// True when a recorded endorsement carries a positive point value.
    pub fn is_positive_endorsement(&self) -> bool {
        self.endorsement.is_some_and(|e| e.point_value > 0)
    }

    /// Display name of the endorsee, or an empty string if unknown.
    pub fn endorsee_name(&self) -> String {
        self.endorsee
            .as_ref()
            .map(PublicUser::display_name)
            .unwrap_or_default()
    }

    /// Short category form, or an empty string if no request is attached.
    pub fn category(&self) -> String {
        self.endorsement_request
            .as_ref()
            .map(EndorsementRequest::category)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_outcome() {
        let json = serde_json::json!({
            "endorsement_request": {
                "id": 7,
                "archive": "math",
                "subject_class": "AG",
                "endorsee_id": "1001"
            },
            "endorsee": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.org",
                "affiliation": "Analytical Engines"
            },
            "submitted": false,
            "endorser_capability": "credited",
            "request_acceptable": true,
            "reason": null,
            "endorsement": null
        });

        let outcome: Outcome = serde_json::from_value(json).unwrap();
        assert_eq!(outcome.endorser_capability, EndorserCapability::Credited);
        assert_eq!(outcome.category(), "math.AG");
        assert_eq!(outcome.endorsee_name(), "Ada Lovelace");
        assert_eq!(
            outcome.endorsement_request.as_ref().unwrap().id,
            Some(RequestId(7))
        );
        assert!(outcome.reason().is_none());
    }

    #[test]
    fn unknown_capability_is_rejected() {
        let json = serde_json::json!({
            "endorser_capability": "maybe",
            "submitted": false,
            "request_acceptable": true
        });
        assert!(serde_json::from_value::<Outcome>(json).is_err());
    }

    #[test]
    fn missing_capability_is_rejected() {
        let json = serde_json::json!({ "submitted": true });
        assert!(serde_json::from_value::<Outcome>(json).is_err());
    }

    #[test]
    fn blank_reason_counts_as_absent() {
        let json = serde_json::json!({
            "endorser_capability": "uncredited",
            "reason": "   "
        });
        let outcome: Outcome = serde_json::from_value(json).unwrap();
        assert!(outcome.reason().is_none());
    }

    #[test]
    fn category_without_subject_class() {
        let req = EndorsementRequest {
            archive: "hep-th".to_string(),
            ..Default::default()
        };
        assert_eq!(req.category(), "hep-th");
        assert_eq!(req.category_full_name(None), "hep-th - all");
        assert_eq!(req.lookup_subject_class(), "*");
    }

    #[test]
    fn category_full_name_uses_lookup_name() {
        let req = EndorsementRequest {
            archive: "math".to_string(),
            subject_class: Some("AG".to_string()),
            ..Default::default()
        };
        assert_eq!(
            req.category_full_name(Some("Algebraic Geometry")),
            "math.AG - Algebraic Geometry"
        );
    }

    #[test]
    fn zero_point_value_is_not_positive() {
        let json = serde_json::json!({
            "endorser_capability": "credited",
            "submitted": true,
            "endorsement": { "point_value": 0 }
        });
        let outcome: Outcome = serde_json::from_value(json).unwrap();
        assert!(!outcome.is_positive_endorsement());
    }

    #[test]
    fn negative_point_value_is_not_positive() {
        let json = serde_json::json!({
            "endorser_capability": "credited",
            "submitted": true,
            "endorsement": { "point_value": -10 }
        });
        let outcome: Outcome = serde_json::from_value(json).unwrap();
        assert!(!outcome.is_positive_endorsement());
    }

    #[test]
    fn long_display_defaults_affiliation() {
        let user = PublicUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_long(), "Ada Lovelace - No affiliation");
    }
}
