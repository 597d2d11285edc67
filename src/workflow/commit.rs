//! Commit submission.
//!
//! The commit is the only mutating call. [`CommitSubmitter`] lets each
//! workflow instance attempt it at most once: the attempt is recorded when
//! the effect is prepared, before anything goes over the wire, and a second
//! `prepare` is refused whatever happened to the first.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::api::ApiError;
use crate::decision::DecisionDraft;
use crate::effects::{ApiEffect, EndorsementInterpreter};
use crate::notice::{Notice, feedback_notice, granted_notice};
use crate::types::{EndorsementCode, EndorserId, Outcome};

use super::guard::Ticket;
use super::preflight::expect_outcome;
use super::state::Review;

/// Why a commit was refused locally, without contacting the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitRejected {
    #[error("a decision was already submitted in this workflow")]
    AlreadyAttempted,

    #[error("this endorser may not decide this request")]
    NotPermitted,

    #[error("no vote has been chosen")]
    Incomplete,
}

/// What the recorded decision amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum CommitVerdict {
    /// The endorsee may now submit to the category.
    Granted { point_value: i64 },
    /// A negative or "don't know" vote was recorded.
    FeedbackRecorded,
}

/// A successfully recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub verdict: CommitVerdict,
    pub outcome: Outcome,
    pub notice: Notice,
    pub decided_at: DateTime<Utc>,
}

impl CommitResult {
    /// Interprets the authority's answer to a commit.
    ///
    /// Names in the notice come from the reviewed outcome, which is what the
    /// endorser saw when deciding.
    pub fn from_outcome(
        outcome: Outcome,
        review: &Review,
        contact_email: &str,
        decided_at: DateTime<Utc>,
    ) -> Self {
        let ctx = review.notice_context(contact_email);
        let (verdict, notice) = match outcome.endorsement {
            Some(e) if e.point_value > 0 => (
                CommitVerdict::Granted {
                    point_value: e.point_value,
                },
                granted_notice(&ctx),
            ),
            _ => (CommitVerdict::FeedbackRecorded, feedback_notice(&ctx)),
        };
        CommitResult {
            verdict,
            outcome,
            notice,
            decided_at,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self.verdict, CommitVerdict::Granted { .. })
    }
}

/// Per-instance guard around the commit.
#[derive(Debug, Clone, Default)]
pub struct CommitSubmitter {
    attempted: Option<Ticket>,
}

impl CommitSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the commit effect and records the attempt under `ticket`.
    ///
    /// Refused if a commit was already prepared in this instance, if the
    /// review does not allow a decision, or if no vote is chosen. A refused
    /// call does not count as an attempt.
    pub fn prepare(
        &mut self,
        ticket: Ticket,
        endorser_id: &EndorserId,
        code: &EndorsementCode,
        review: &Review,
        draft: &DecisionDraft,
    ) -> Result<ApiEffect, CommitRejected> {
        if self.attempted.is_some() {
            return Err(CommitRejected::AlreadyAttempted);
        }
        if !review.may_decide() {
            return Err(CommitRejected::NotPermitted);
        }
        if !draft.is_complete() {
            return Err(CommitRejected::Incomplete);
        }

        self.attempted = Some(ticket);
        info!(%ticket, vote = ?draft.vote, "submitting endorsement decision");
        Ok(ApiEffect::Commit {
            code: code.clone(),
            endorser_id: endorser_id.clone(),
            decision: draft.clone(),
        })
    }

    pub fn attempted(&self) -> bool {
        self.attempted.is_some()
    }

    /// True if `ticket` belongs to this instance's commit.
    pub fn owns(&self, ticket: Ticket) -> bool {
        self.attempted == Some(ticket)
    }
}

/// Sends a prepared commit effect. Exactly one request is made.
pub async fn submit<I: EndorsementInterpreter>(
    interpreter: &I,
    effect: ApiEffect,
) -> Result<Outcome, ApiError> {
    let response = interpreter.interpret(effect).await?;
    expect_outcome(response)
}
