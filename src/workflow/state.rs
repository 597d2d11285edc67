//! Workflow states.
//!
//! One instance of the workflow is always in exactly one [`WorkflowState`].
//! States after the preflight carry the [`Review`] (outcome plus derived
//! classification) and the decision draft, so going back never loses what
//! the endorser already entered.

use serde::Serialize;

use crate::capability::{BlockReason, Classification, classify};
use crate::code::InvalidCode;
use crate::decision::DecisionDraft;
use crate::notice::{Notice, NoticeContext};
use crate::types::{EndorsementCode, Outcome};

use super::commit::CommitResult;

/// A preflight outcome together with what it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub outcome: Outcome,
    pub classification: Classification,
    /// Human-readable category name, filled in by the category lookup.
    pub category_name: Option<String>,
}

impl Review {
    pub fn new(outcome: Outcome) -> Self {
        let classification = classify(&outcome);
        Review {
            outcome,
            classification,
            category_name: None,
        }
    }

    pub fn may_decide(&self) -> bool {
        self.classification.may_decide
    }

    /// `math.AG - Algebraic Geometry`, or `math.AG - all` before the lookup lands.
    pub fn category_full_name(&self) -> String {
        match &self.outcome.endorsement_request {
            Some(request) => request.category_full_name(self.category_name.as_deref()),
            None => String::new(),
        }
    }

    pub fn notice_context(&self, contact_email: &str) -> NoticeContext {
        NoticeContext::new(&self.outcome, self.category_name.as_deref(), contact_email)
    }
}

/// Why an instance ended without completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The outcome does not allow this endorser to proceed.
    Blocked { reason: BlockReason },
    /// The session is gone; a fresh login can resume with the same code.
    LoginRequired,
    /// The authority refused the call under its rules.
    Rejected,
    /// The commit failed for an unexpected reason.
    ServerError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub notice: Notice,
    /// The code this instance was working on, if it got that far.
    pub code: Option<EndorsementCode>,
    pub review: Option<Review>,
}

/// Where the endorser is in the flow, as a stepper would show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EnterCode,
    Review,
    Decide,
    Attest,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    /// Waiting for a well-formed code.
    AwaitingCode {
        /// The text as typed, kept so it can be shown and resubmitted.
        input: String,
        code_error: Option<InvalidCode>,
        /// Message from the last failed lookup of this code.
        error: Option<String>,
    },
    /// A preflight for `code` is outstanding.
    Validating { code: EndorsementCode },
    Reviewing {
        code: EndorsementCode,
        review: Review,
        draft: DecisionDraft,
    },
    Deciding {
        code: EndorsementCode,
        review: Review,
        draft: DecisionDraft,
    },
    Attesting {
        code: EndorsementCode,
        review: Review,
        draft: DecisionDraft,
    },
    /// The commit is outstanding.
    Committing {
        code: EndorsementCode,
        review: Review,
        draft: DecisionDraft,
    },
    Completed { review: Review, result: CommitResult },
    Failed { failure: Failure },
}

impl Default for WorkflowState {
    fn default() -> Self {
        WorkflowState::AwaitingCode {
            input: String::new(),
            code_error: None,
            error: None,
        }
    }
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::AwaitingCode { .. } => "awaiting_code",
            WorkflowState::Validating { .. } => "validating",
            WorkflowState::Reviewing { .. } => "reviewing",
            WorkflowState::Deciding { .. } => "deciding",
            WorkflowState::Attesting { .. } => "attesting",
            WorkflowState::Committing { .. } => "committing",
            WorkflowState::Completed { .. } => "completed",
            WorkflowState::Failed { .. } => "failed",
        }
    }

    pub fn step(&self) -> Step {
        match self {
            WorkflowState::AwaitingCode { .. } | WorkflowState::Validating { .. } => Step::EnterCode,
            WorkflowState::Reviewing { .. } => Step::Review,
            WorkflowState::Deciding { .. } => Step::Decide,
            WorkflowState::Attesting { .. } | WorkflowState::Committing { .. } => Step::Attest,
            WorkflowState::Completed { .. } | WorkflowState::Failed { .. } => Step::Done,
        }
    }

    /// True while a preflight or commit is outstanding.
    pub fn in_progress(&self) -> bool {
        matches!(
            self,
            WorkflowState::Validating { .. } | WorkflowState::Committing { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Completed { .. } | WorkflowState::Failed { .. }
        )
    }

    /// The code this state is working on, if it has a well-formed one.
    pub fn code(&self) -> Option<&EndorsementCode> {
        match self {
            WorkflowState::AwaitingCode { .. } | WorkflowState::Completed { .. } => None,
            WorkflowState::Validating { code }
            | WorkflowState::Reviewing { code, .. }
            | WorkflowState::Deciding { code, .. }
            | WorkflowState::Attesting { code, .. }
            | WorkflowState::Committing { code, .. } => Some(code),
            WorkflowState::Failed { failure } => failure.code.as_ref(),
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            WorkflowState::AwaitingCode { .. } | WorkflowState::Validating { .. } => None,
            WorkflowState::Reviewing { review, .. }
            | WorkflowState::Deciding { review, .. }
            | WorkflowState::Attesting { review, .. }
            | WorkflowState::Committing { review, .. }
            | WorkflowState::Completed { review, .. } => Some(review),
            WorkflowState::Failed { failure } => failure.review.as_ref(),
        }
    }

    pub(crate) fn review_mut(&mut self) -> Option<&mut Review> {
        match self {
            WorkflowState::Reviewing { review, .. }
            | WorkflowState::Deciding { review, .. }
            | WorkflowState::Attesting { review, .. }
            | WorkflowState::Committing { review, .. } => Some(review),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&DecisionDraft> {
        match self {
            WorkflowState::Reviewing { draft, .. }
            | WorkflowState::Deciding { draft, .. }
            | WorkflowState::Attesting { draft, .. }
            | WorkflowState::Committing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// The draft, when the current step lets the endorser edit it.
    pub(crate) fn editable_draft_mut(&mut self) -> Option<&mut DecisionDraft> {
        match self {
            WorkflowState::Deciding { draft, .. } | WorkflowState::Attesting { draft, .. } => {
                Some(draft)
            }
            _ => None,
        }
    }
}
