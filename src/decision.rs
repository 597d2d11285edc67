//! The endorser's in-progress decision.
//!
//! A [`DecisionDraft`] is filled in across the decide and attest steps. It is
//! plain state accumulation; nothing here talks to the network.

use serde::{Deserialize, Serialize};

/// The endorser's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    /// Allow the endorsee to submit to the category.
    Endorse,
    /// Vote of no confidence.
    Deny,
    /// "I don't know". Sent as `positive: null`.
    Unknown,
}

impl Vote {
    /// The wire value of the `positive` field.
    pub fn as_positive(&self) -> Option<bool> {
        match self {
            Vote::Endorse => Some(true),
            Vote::Deny => Some(false),
            Vote::Unknown => None,
        }
    }
}

/// Vote plus optional attestations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub vote: Option<Vote>,
    pub comment: String,
    pub knows_personally: bool,
    pub seen_paper: bool,
}

impl DecisionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vote(&mut self, vote: Vote) {
        self.vote = Some(vote);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn set_knows_personally(&mut self, knows: bool) {
        self.knows_personally = knows;
    }

    pub fn set_seen_paper(&mut self, seen: bool) {
        self.seen_paper = seen;
    }

    /// True once a vote is chosen. Attestations are optional.
    pub fn is_complete(&self) -> bool {
        self.vote.is_some()
    }
}
