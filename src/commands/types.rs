//! Command types for terminal input.

use serde::{Deserialize, Serialize};

use crate::decision::Vote;
use crate::session::SessionContext;
use crate::workflow::Input;

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalCommand {
    /// Enter or replace the code: `code AB12CD`
    Code(String),

    /// Continue to the next step: `next`
    Next,

    /// Return to the previous step: `back`
    Back,

    /// Choose a vote: `endorse`, `deny` or `unknown`
    Vote(Vote),

    /// Set the optional comment: `comment <text>`
    ///
    /// An empty text clears it.
    Comment(String),

    /// `knows yes|no`
    KnowsPersonally(bool),

    /// `seen yes|no`
    SeenPaper(bool),

    /// Submit the decision: `submit`
    Submit,

    /// Start over: `reset`
    Reset,

    /// Resume after logging in again: `login <TOKEN>`
    ///
    /// Carries the access token of the new session.
    Login(String),

    /// Show the current state: `status`
    Status,

    /// `help`
    Help,

    /// `quit`
    Quit,
}

impl TerminalCommand {
    /// The workflow input this command stands for, given the terminal's
    /// current `session`.
    ///
    /// Returns `None` for commands handled by the terminal itself.
    pub fn into_input(self, session: &SessionContext) -> Option<Input> {
        match self {
            TerminalCommand::Code(code) => Some(Input::CodeEdited(code)),
            TerminalCommand::Next => Some(Input::Advance),
            TerminalCommand::Back => Some(Input::Back),
            TerminalCommand::Vote(vote) => Some(Input::SetVote(vote)),
            TerminalCommand::Comment(text) => Some(Input::SetComment(text)),
            TerminalCommand::KnowsPersonally(knows) => Some(Input::SetKnowsPersonally(knows)),
            TerminalCommand::SeenPaper(seen) => Some(Input::SetSeenPaper(seen)),
            TerminalCommand::Submit => Some(Input::Submit),
            TerminalCommand::Reset => Some(Input::Reset),
            TerminalCommand::Login(token) => Some(Input::Reauthenticated(
                session.clone().with_access_token(token),
            )),
            TerminalCommand::Status | TerminalCommand::Help | TerminalCommand::Quit => None,
        }
    }
}
