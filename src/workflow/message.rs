//! Inputs to and commands from the workflow controller.
//!
//! User actions and call completions both arrive as [`Input`]s and are
//! handled one at a time. The controller answers with [`Command`]s: calls to
//! dispatch and events for the presentation layer.

use crate::api::ApiError;
use crate::decision::Vote;
use crate::effects::ApiEffect;
use crate::notice::Notice;
use crate::session::SessionContext;
use crate::types::Outcome;

use super::guard::Ticket;

/// Something that happened to the workflow.
#[derive(Debug)]
pub enum Input {
    /// The code field changed. Carries the full text, not a delta.
    CodeEdited(String),
    /// Continue to the next step.
    Advance,
    /// Return to the previous step.
    Back,
    SetVote(Vote),
    SetComment(String),
    SetKnowsPersonally(bool),
    SetSeenPaper(bool),
    /// Submit the decision.
    Submit,
    /// Abandon this instance and start over with an empty code.
    Reset,
    /// The user logged in again after a session failure and holds this
    /// new session.
    Reauthenticated(SessionContext),

    PreflightCompleted {
        ticket: Ticket,
        result: Result<Outcome, ApiError>,
    },
    /// Category lookups never fail; an unknown name is `None`.
    CategoryResolved {
        ticket: Ticket,
        category_name: Option<String>,
    },
    CommitCompleted {
        ticket: Ticket,
        result: Result<Outcome, ApiError>,
    },
}

impl Input {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Input::CodeEdited(_) => "code_edited",
            Input::Advance => "advance",
            Input::Back => "back",
            Input::SetVote(_) => "set_vote",
            Input::SetComment(_) => "set_comment",
            Input::SetKnowsPersonally(_) => "set_knows_personally",
            Input::SetSeenPaper(_) => "set_seen_paper",
            Input::Submit => "submit",
            Input::Reset => "reset",
            Input::Reauthenticated(_) => "reauthenticated",
            Input::PreflightCompleted { .. } => "preflight_completed",
            Input::CategoryResolved { .. } => "category_resolved",
            Input::CommitCompleted { .. } => "commit_completed",
        }
    }
}

/// Something the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// A dialog ending this instance.
    TerminalNotice(Notice),
    /// A call started or finished.
    Progress(bool),
    /// Offer to start again from an empty code.
    Restart,
    /// An inline error next to the code field.
    Error(String),
    /// The session is gone; ask for a fresh login.
    LoginRequired(Notice),
}

/// What the controller asks its driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run `effect` and feed its completion back tagged with `ticket`.
    Dispatch { ticket: Ticket, effect: ApiEffect },
    Present(PresentationEvent),
    /// Make every later call with this session's credentials.
    Rebind(SessionContext),
}

impl Command {
    pub fn effect(&self) -> Option<&ApiEffect> {
        match self {
            Command::Dispatch { effect, .. } => Some(effect),
            Command::Present(_) | Command::Rebind(_) => None,
        }
    }

    pub fn event(&self) -> Option<&PresentationEvent> {
        match self {
            Command::Present(event) => Some(event),
            Command::Dispatch { .. } | Command::Rebind(_) => None,
        }
    }
}
