//! Parser for terminal command lines.
//!
//! This module provides a pure parser from one line of user input to a
//! [`TerminalCommand`].

use thiserror::Error;

use crate::decision::Vote;

use super::types::TerminalCommand;

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{command}` expects yes or no, got `{value}`")]
    NotAFlag {
        command: &'static str,
        value: String,
    },
}

/// Parses one line of terminal input.
///
/// # Parsing Rules
///
/// - Command words are case-insensitive
/// - Whitespace between tokens is flexible (spaces, tabs)
/// - `code` and `comment` take the rest of the line verbatim, minus
///   surrounding whitespace
/// - Flags accept `yes`/`no`, `y`/`n`, `true`/`false` and `on`/`off`
///
/// # Examples
///
/// ```
/// use endorsement_flow::commands::{TerminalCommand, parse_command};
/// use endorsement_flow::decision::Vote;
///
/// assert_eq!(parse_command("code AB12CD"), Ok(TerminalCommand::Code("AB12CD".to_string())));
/// assert_eq!(parse_command("Endorse"), Ok(TerminalCommand::Vote(Vote::Endorse)));
/// assert_eq!(parse_command("seen yes"), Ok(TerminalCommand::SeenPaper(true)));
/// assert!(parse_command("frobnicate").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<TerminalCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (word, rest) = split_first_word(line);
    let rest = rest.trim();

    match word.to_ascii_lowercase().as_str() {
        "code" => {
            if rest.is_empty() {
                Err(ParseError::MissingArgument {
                    command: "code",
                    expected: "the endorsement code",
                })
            } else {
                Ok(TerminalCommand::Code(rest.to_string()))
            }
        }
        "next" | "continue" => Ok(TerminalCommand::Next),
        "back" => Ok(TerminalCommand::Back),
        "endorse" => Ok(TerminalCommand::Vote(Vote::Endorse)),
        "deny" => Ok(TerminalCommand::Vote(Vote::Deny)),
        "unknown" => Ok(TerminalCommand::Vote(Vote::Unknown)),
        "comment" => Ok(TerminalCommand::Comment(rest.to_string())),
        "knows" => parse_flag("knows", rest).map(TerminalCommand::KnowsPersonally),
        "seen" => parse_flag("seen", rest).map(TerminalCommand::SeenPaper),
        "submit" => Ok(TerminalCommand::Submit),
        "reset" => Ok(TerminalCommand::Reset),
        "login" => {
            let (token, _) = split_first_word(rest);
            if token.is_empty() {
                Err(ParseError::MissingArgument {
                    command: "login",
                    expected: "the access token of your new session",
                })
            } else {
                Ok(TerminalCommand::Login(token.to_string()))
            }
        }
        "status" => Ok(TerminalCommand::Status),
        "help" | "?" => Ok(TerminalCommand::Help),
        "quit" | "exit" => Ok(TerminalCommand::Quit),
        _ => Err(ParseError::Unknown(word.to_string())),
    }
}

fn parse_flag(command: &'static str, text: &str) -> Result<bool, ParseError> {
    let (value, _) = split_first_word(text);
    match value.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::MissingArgument {
            command,
            expected: "yes or no",
        }),
        "yes" | "y" | "true" | "on" => Ok(true),
        "no" | "n" | "false" | "off" => Ok(false),
        _ => Err(ParseError::NotAFlag {
            command,
            value: value.to_string(),
        }),
    }
}

/// Splits text at the first whitespace, returning (word, rest).
/// If no whitespace, returns (text, "").
fn split_first_word(text: &str) -> (&str, &str) {
    match text.find(|c: char| c.is_ascii_whitespace()) {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    }
}
