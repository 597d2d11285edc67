//! Admin API effect types.
//!
//! These describe the three boundary calls the workflow makes, as data. The
//! controller returns them; an [`super::EndorsementInterpreter`] executes them.

use serde::{Deserialize, Serialize};

use crate::decision::DecisionDraft;
use crate::types::{EndorsementCode, EndorserId, Outcome};

/// A call against the endorsement authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiEffect {
    /// Non-mutating evaluation of a code for the current endorser.
    Preflight {
        code: EndorsementCode,
        endorser_id: EndorserId,
    },

    /// Mutating decision. Sent at most once per workflow instance.
    Commit {
        code: EndorsementCode,
        endorser_id: EndorserId,
        decision: DecisionDraft,
    },

    /// Human-readable category name, for display only.
    LookupCategory {
        archive: String,
        subject_class: String,
    },
}

impl ApiEffect {
    /// True for calls that change server state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, ApiEffect::Commit { .. })
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ApiEffect::Preflight { .. } => "preflight",
            ApiEffect::Commit { .. } => "commit",
            ApiEffect::LookupCategory { .. } => "lookup_category",
        }
    }

    /// The JSON body of the evaluate call, if this is one.
    pub fn evaluate_body(&self) -> Option<EvaluateBody> {
        match self {
            ApiEffect::Preflight { code, endorser_id } => Some(EvaluateBody {
                preflight: true,
                endorser_id: endorser_id.clone(),
                endorsement_code: code.as_str().to_string(),
                positive: Some(true),
                comment: String::new(),
                knows_personally: false,
                seen_paper: false,
            }),
            ApiEffect::Commit {
                code,
                endorser_id,
                decision,
            } => Some(EvaluateBody {
                preflight: false,
                endorser_id: endorser_id.clone(),
                endorsement_code: code.as_str().to_string(),
                positive: decision.vote.and_then(|v| v.as_positive()),
                comment: decision.comment.clone(),
                knows_personally: decision.knows_personally,
                seen_paper: decision.seen_paper,
            }),
            ApiEffect::LookupCategory { .. } => None,
        }
    }
}

/// Request body of `POST /v1/endorsements/endorse`.
///
/// `positive` is always serialized; `null` carries the "don't know" vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateBody {
    pub preflight: bool,
    pub endorser_id: EndorserId,
    pub endorsement_code: String,
    pub positive: Option<bool>,
    pub comment: String,
    pub knows_personally: bool,
    pub seen_paper: bool,
}

/// Category lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Response from an API effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Response to `Preflight` and `Commit`.
    Outcome(Outcome),

    /// Response to `LookupCategory`.
    Category(CategoryInfo),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::validate_code;
    use crate::decision::Vote;

    fn code() -> EndorsementCode {
        validate_code("AB12CD").unwrap()
    }

    #[test]
    fn preflight_body_matches_wire_format() {
        let effect = ApiEffect::Preflight {
            code: code(),
            endorser_id: EndorserId::new("42"),
        };
        let body = serde_json::to_value(effect.evaluate_body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "preflight": true,
                "endorser_id": "42",
                "endorsement_code": "AB12CD",
                "positive": true,
                "comment": "",
                "knows_personally": false,
                "seen_paper": false
            })
        );
        assert!(!effect.is_mutating());
    }

    #[test]
    fn commit_body_carries_decision() {
        let mut decision = DecisionDraft::new();
        decision.set_vote(Vote::Deny);
        decision.set_comment("No relevant work");
        decision.set_seen_paper(true);

        let effect = ApiEffect::Commit {
            code: code(),
            endorser_id: EndorserId::new("42"),
            decision,
        };
        let body = effect.evaluate_body().unwrap();
        assert!(!body.preflight);
        assert_eq!(body.positive, Some(false));
        assert_eq!(body.comment, "No relevant work");
        assert!(body.seen_paper);
        assert!(!body.knows_personally);
        assert!(effect.is_mutating());
    }

    #[test]
    fn unknown_vote_serializes_positive_as_null() {
        let mut decision = DecisionDraft::new();
        decision.set_vote(Vote::Unknown);
        let effect = ApiEffect::Commit {
            code: code(),
            endorser_id: EndorserId::new("42"),
            decision,
        };
        let body = serde_json::to_value(effect.evaluate_body().unwrap()).unwrap();
        assert_eq!(body["positive"], serde_json::Value::Null);
    }

    #[test]
    fn lookup_has_no_evaluate_body() {
        let effect = ApiEffect::LookupCategory {
            archive: "math".to_string(),
            subject_class: "AG".to_string(),
        };
        assert!(effect.evaluate_body().is_none());
        assert_eq!(effect.name(), "lookup_category");
    }
}
