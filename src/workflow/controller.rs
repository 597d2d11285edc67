//! The workflow state machine.
//!
//! [`WorkflowController`] owns one workflow instance at a time: its state,
//! its [`RaceGuard`] and its [`CommitSubmitter`]. [`WorkflowController::handle`]
//! is synchronous and performs no I/O; calls come back out as
//! [`Command::Dispatch`] and their results go back in as completion inputs.
//!
//! ```text
//! AwaitingCode --valid code--> Validating --ok--> Reviewing --advance--> Deciding
//!      ^                           |                                     |
//!      +------not found / error----+                                  advance
//!                                                                        v
//!         Completed <--ok-- Committing <--submit-- Attesting <-----------+
//! ```
//!
//! Blocked outcomes, rule violations and lost sessions end in `Failed`.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ApiErrorKind};
use crate::code::validate_code;
use crate::decision::DecisionDraft;
use crate::notice::{blocking_notice, commit_error_notice, login_notice, rejected_notice};
use crate::session::SessionContext;
use crate::types::{EndorsementCode, Outcome};

use super::commit::{CommitResult, CommitSubmitter};
use super::guard::{RaceGuard, Ticket};
use super::message::{Command, Input, PresentationEvent};
use super::preflight::{category_lookup_effect, preflight_effect};
use super::state::{Failure, FailureKind, Review, WorkflowState};

/// Drives one endorsement decision at a time.
#[derive(Debug)]
pub struct WorkflowController {
    session: SessionContext,
    instance: u64,
    state: WorkflowState,
    guard: RaceGuard,
    submitter: CommitSubmitter,
}

impl WorkflowController {
    pub fn new(session: SessionContext) -> Self {
        WorkflowController {
            session,
            instance: 1,
            state: WorkflowState::default(),
            guard: RaceGuard::new(1),
            submitter: CommitSubmitter::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Identifies the current instance. Changes on every reset.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// True while a preflight or commit is outstanding.
    pub fn in_progress(&self) -> bool {
        self.state.in_progress()
    }

    /// True if a completion tagged with `ticket` would be applied to the
    /// code-related state right now.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.guard.is_current(ticket)
    }

    /// Applies one input and returns what should happen next.
    pub fn handle(&mut self, input: Input) -> Vec<Command> {
        let was_busy = self.in_progress();
        let from = self.state.name();
        let name = input.name();

        let mut commands = match input {
            Input::CodeEdited(raw) => self.code_edited(raw),
            Input::Advance => self.advance(),
            Input::Back => self.back(),
            Input::SetVote(vote) => self.edit_draft(|d| d.set_vote(vote)),
            Input::SetComment(comment) => self.edit_draft(|d| d.set_comment(comment)),
            Input::SetKnowsPersonally(knows) => self.edit_draft(|d| d.set_knows_personally(knows)),
            Input::SetSeenPaper(seen) => self.edit_draft(|d| d.set_seen_paper(seen)),
            Input::Submit => self.submit(),
            Input::Reset => {
                self.restart();
                Vec::new()
            }
            Input::Reauthenticated(session) => self.reauthenticated(session),
            Input::PreflightCompleted { ticket, result } => self.preflight_completed(ticket, result),
            Input::CategoryResolved {
                ticket,
                category_name,
            } => self.category_resolved(ticket, category_name),
            Input::CommitCompleted { ticket, result } => self.commit_completed(ticket, result),
        };

        let busy = self.in_progress();
        if busy != was_busy {
            commands.insert(0, Command::Present(PresentationEvent::Progress(busy)));
        }
        let to = self.state.name();
        if from != to {
            debug!(instance = self.instance, input = name, from, to, "workflow transition");
        }
        commands
    }

    fn code_edited(&mut self, raw: String) -> Vec<Command> {
        match &self.state {
            WorkflowState::Deciding { .. }
            | WorkflowState::Attesting { .. }
            | WorkflowState::Committing { .. } => {
                debug!(state = self.state.name(), "code is fixed once deciding, ignoring edit");
                return Vec::new();
            }
            WorkflowState::Completed { .. } | WorkflowState::Failed { .. } => self.restart(),
            WorkflowState::AwaitingCode { .. }
            | WorkflowState::Validating { .. }
            | WorkflowState::Reviewing { .. } => {}
        }

        self.guard.supersede();
        match validate_code(&raw) {
            Ok(code) => self.start_preflight(code),
            Err(invalid) => {
                self.state = WorkflowState::AwaitingCode {
                    input: raw,
                    code_error: Some(invalid),
                    error: None,
                };
                Vec::new()
            }
        }
    }

    fn start_preflight(&mut self, code: EndorsementCode) -> Vec<Command> {
        if !self.session.has_user() {
            return self.login_required(Some(code), None);
        }
        let ticket = self.guard.issue();
        let effect = preflight_effect(&self.session, &code);
        debug!(%ticket, %code, "starting preflight");
        self.state = WorkflowState::Validating { code };
        vec![Command::Dispatch { ticket, effect }]
    }

    fn preflight_completed(
        &mut self,
        ticket: Ticket,
        result: Result<Outcome, ApiError>,
    ) -> Vec<Command> {
        if !self.guard.is_current(ticket) {
            debug!(%ticket, "discarding stale preflight result");
            return Vec::new();
        }
        let WorkflowState::Validating { code } = &self.state else {
            debug!(%ticket, state = self.state.name(), "preflight result outside validation");
            return Vec::new();
        };
        let code = code.clone();

        match result {
            Ok(outcome) => self.review_outcome(ticket, code, outcome),
            Err(e) => self.preflight_failed(code, e),
        }
    }

    fn review_outcome(
        &mut self,
        ticket: Ticket,
        code: EndorsementCode,
        outcome: Outcome,
    ) -> Vec<Command> {
        let review = Review::new(outcome);
        let ctx = review.notice_context(&self.session.contact_email);

        match review.classification.blocking.clone() {
            Some(blocking) if !review.classification.may_review => {
                let notice = blocking_notice(&blocking, &ctx);
                let reason = blocking.reason;
                info!(?reason, "endorser may not proceed");
                self.guard.supersede();
                self.state = WorkflowState::Failed {
                    failure: Failure {
                        kind: FailureKind::Blocked { reason },
                        notice: notice.clone(),
                        code: Some(code),
                        review: Some(review),
                    },
                };
                vec![
                    Command::Present(PresentationEvent::TerminalNotice(notice)),
                    Command::Present(PresentationEvent::Restart),
                ]
            }
            blocking => {
                let mut commands = Vec::new();
                if let Some(blocking) = blocking {
                    info!(reason = ?blocking.reason, "request shown for review only");
                    commands.push(Command::Present(PresentationEvent::TerminalNotice(
                        blocking_notice(&blocking, &ctx),
                    )));
                }
                if let Some(effect) = category_lookup_effect(&review.outcome) {
                    commands.push(Command::Dispatch { ticket, effect });
                }
                self.state = WorkflowState::Reviewing {
                    code,
                    review,
                    draft: DecisionDraft::new(),
                };
                commands
            }
        }
    }

    fn preflight_failed(&mut self, code: EndorsementCode, e: ApiError) -> Vec<Command> {
        match e.kind {
            ApiErrorKind::NotFound | ApiErrorKind::Server => {
                debug!(kind = ?e.kind, error = %e, "preflight failed, code can be corrected");
                self.guard.supersede();
                self.state = WorkflowState::AwaitingCode {
                    input: code.as_str().to_string(),
                    code_error: None,
                    error: Some(e.message.clone()),
                };
                vec![Command::Present(PresentationEvent::Error(e.message))]
            }
            ApiErrorKind::Unauthenticated => self.login_required(Some(code), None),
            ApiErrorKind::RuleViolation => self.rejected(Some(code), None, &e.message),
        }
    }

    fn category_resolved(&mut self, ticket: Ticket, category_name: Option<String>) -> Vec<Command> {
        if !self.guard.is_current(ticket) {
            debug!(%ticket, "discarding stale category name");
            return Vec::new();
        }
        if let Some(review) = self.state.review_mut() {
            review.category_name = category_name;
        }
        Vec::new()
    }

    fn advance(&mut self) -> Vec<Command> {
        if let WorkflowState::AwaitingCode { input, .. } = &self.state {
            let input = input.clone();
            return self.code_edited(input);
        }

        self.state = match std::mem::take(&mut self.state) {
            WorkflowState::Reviewing {
                code,
                review,
                draft,
            } if review.may_decide() => WorkflowState::Deciding {
                code,
                review,
                draft,
            },
            WorkflowState::Deciding {
                code,
                review,
                draft,
            } if draft.is_complete() => WorkflowState::Attesting {
                code,
                review,
                draft,
            },
            other => {
                debug!(state = other.name(), "cannot advance");
                other
            }
        };
        Vec::new()
    }

    fn back(&mut self) -> Vec<Command> {
        self.state = match std::mem::take(&mut self.state) {
            WorkflowState::Deciding {
                code,
                review,
                draft,
            } => WorkflowState::Reviewing {
                code,
                review,
                draft,
            },
            WorkflowState::Attesting {
                code,
                review,
                draft,
            } => WorkflowState::Deciding {
                code,
                review,
                draft,
            },
            WorkflowState::Reviewing { code, .. } => {
                self.guard.supersede();
                WorkflowState::AwaitingCode {
                    input: code.as_str().to_string(),
                    code_error: None,
                    error: None,
                }
            }
            other => other,
        };
        Vec::new()
    }

    fn edit_draft(&mut self, edit: impl FnOnce(&mut DecisionDraft)) -> Vec<Command> {
        match self.state.editable_draft_mut() {
            Some(draft) => edit(draft),
            None => debug!(state = self.state.name(), "decision is not editable"),
        }
        Vec::new()
    }

    fn submit(&mut self) -> Vec<Command> {
        let WorkflowState::Attesting {
            code,
            review,
            draft,
        } = &self.state
        else {
            debug!(state = self.state.name(), "nothing to submit");
            return Vec::new();
        };

        let ticket = self.guard.mint();
        let prepared = self
            .submitter
            .prepare(ticket, &self.session.endorser_id, code, review, draft);
        match prepared {
            Ok(effect) => {
                self.state = match std::mem::take(&mut self.state) {
                    WorkflowState::Attesting {
                        code,
                        review,
                        draft,
                    } => WorkflowState::Committing {
                        code,
                        review,
                        draft,
                    },
                    other => other,
                };
                vec![Command::Dispatch { ticket, effect }]
            }
            Err(rejected) => {
                warn!(%rejected, "decision not submitted");
                Vec::new()
            }
        }
    }

    fn commit_completed(
        &mut self,
        ticket: Ticket,
        result: Result<Outcome, ApiError>,
    ) -> Vec<Command> {
        if !self.submitter.owns(ticket) {
            debug!(%ticket, "discarding commit result from another instance");
            return Vec::new();
        }
        let (code, review) = match std::mem::take(&mut self.state) {
            WorkflowState::Committing { code, review, .. } => (code, review),
            other => {
                debug!(%ticket, state = other.name(), "commit result outside committing");
                self.state = other;
                return Vec::new();
            }
        };

        match result {
            Ok(outcome) => {
                let result = CommitResult::from_outcome(
                    outcome,
                    &review,
                    &self.session.contact_email,
                    Utc::now(),
                );
                info!(verdict = ?result.verdict, "endorsement decision recorded");
                let notice = result.notice.clone();
                self.state = WorkflowState::Completed { review, result };
                vec![
                    Command::Present(PresentationEvent::TerminalNotice(notice)),
                    Command::Present(PresentationEvent::Restart),
                ]
            }
            Err(e) => match e.kind {
                ApiErrorKind::Unauthenticated => self.login_required(Some(code), Some(review)),
                ApiErrorKind::RuleViolation | ApiErrorKind::NotFound => {
                    self.rejected(Some(code), Some(review), &e.message)
                }
                ApiErrorKind::Server => {
                    warn!(error = %e, "commit failed");
                    let notice = commit_error_notice(&e.message);
                    self.state = WorkflowState::Failed {
                        failure: Failure {
                            kind: FailureKind::ServerError,
                            notice,
                            code: Some(code),
                            review: Some(review),
                        },
                    };
                    vec![
                        Command::Present(PresentationEvent::Error(e.message)),
                        Command::Present(PresentationEvent::Restart),
                    ]
                }
            },
        }
    }

    fn reauthenticated(&mut self, session: SessionContext) -> Vec<Command> {
        let code = match &self.state {
            WorkflowState::Failed {
                failure:
                    Failure {
                        kind: FailureKind::LoginRequired,
                        code,
                        ..
                    },
            } => code.clone(),
            _ => {
                debug!(state = self.state.name(), "no login failure to resume from");
                return Vec::new();
            }
        };
        if !session.is_renewal_of(&self.session) {
            warn!("login brought no new credentials, not resuming");
            return vec![Command::Present(PresentationEvent::LoginRequired(
                login_notice(),
            ))];
        }

        info!(endorser = %session.endorser_id, "session renewed");
        self.session = session.clone();
        self.restart();
        let mut commands = vec![Command::Rebind(session)];
        if let Some(code) = code {
            commands.extend(self.start_preflight(code));
        }
        commands
    }

    fn login_required(
        &mut self,
        code: Option<EndorsementCode>,
        review: Option<Review>,
    ) -> Vec<Command> {
        let notice = login_notice();
        self.guard.supersede();
        self.state = WorkflowState::Failed {
            failure: Failure {
                kind: FailureKind::LoginRequired,
                notice: notice.clone(),
                code,
                review,
            },
        };
        vec![Command::Present(PresentationEvent::LoginRequired(notice))]
    }

    fn rejected(
        &mut self,
        code: Option<EndorsementCode>,
        review: Option<Review>,
        reason: &str,
    ) -> Vec<Command> {
        info!(reason, "endorsement rejected");
        let notice = rejected_notice(reason);
        self.guard.supersede();
        self.state = WorkflowState::Failed {
            failure: Failure {
                kind: FailureKind::Rejected,
                notice: notice.clone(),
                code,
                review,
            },
        };
        vec![
            Command::Present(PresentationEvent::TerminalNotice(notice)),
            Command::Present(PresentationEvent::Restart),
        ]
    }

    /// Abandons the current instance. Outstanding calls become stale.
    fn restart(&mut self) {
        self.instance += 1;
        self.guard = RaceGuard::new(self.instance);
        self.submitter = CommitSubmitter::new();
        self.state = WorkflowState::default();
        info!(instance = self.instance, "new workflow instance");
    }
}
