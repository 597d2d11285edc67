//! The endorsement decision workflow.
//!
//! - [`guard`]: tickets and last-request-wins bookkeeping
//! - [`preflight`]: evaluating a code without recording anything
//! - [`commit`]: submitting the decision, at most once per instance
//! - [`state`]: the states an instance moves through
//! - [`controller`]: the pure state machine tying them together
//! - [`driver`]: the tokio event loop that runs a controller

pub mod commit;
pub mod controller;
pub mod driver;
pub mod guard;
pub mod message;
pub mod preflight;
pub mod state;


pub use commit::{CommitRejected, CommitResult, CommitSubmitter, CommitVerdict};
pub use controller::WorkflowController;
pub use driver::{Presenter, WorkflowDriver};
pub use guard::{RaceGuard, Ticket};
pub use message::{Command, Input, PresentationEvent};
pub use state::{Failure, FailureKind, Review, Step, WorkflowState};
