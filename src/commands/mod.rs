//! Command parsing for the terminal front end.
//!
//! Each line the user types is parsed into a [`TerminalCommand`]. Most map
//! directly to a workflow input; `status`, `help` and `quit` are handled by
//! the terminal itself.
//!
//! # Supported Commands
//!
//! - `code AB12CD` - Enters or replaces the endorsement code
//! - `next` / `back` - Moves between steps
//! - `endorse` / `deny` / `unknown` - Chooses a vote
//! - `comment <text>`, `knows yes|no`, `seen yes|no` - Optional attestations
//! - `submit` - Submits the decision
//! - `reset` - Starts over
//! - `login <TOKEN>` - Resumes with the token of a fresh login
//!
//! # Example
//!
//! ```
//! use endorsement_flow::commands::{TerminalCommand, parse_command};
//! use endorsement_flow::session::SessionContext;
//! use url::Url;
//!
//! let session = SessionContext::new("42", Url::parse("https://example.org/").unwrap());
//! assert_eq!(parse_command("next"), Ok(TerminalCommand::Next));
//! assert!(parse_command("CODE ab12cd").unwrap().into_input(&session).is_some());
//! ```

mod parser;
mod types;

pub use parser::{ParseError, parse_command};
pub use types::TerminalCommand;
