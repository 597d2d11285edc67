//! Effects-as-data for calls to the endorsement authority.
//!
//! The workflow controller never performs I/O. It returns [`ApiEffect`]s
//! describing what should be called, and whoever drives it hands them to an
//! [`EndorsementInterpreter`]. This enables:
//! - a pure, synchronous state machine that is trivially testable
//! - scripted interpreters for race and failure scenarios
//! - logging of every intended call

pub mod api;
pub mod interpreter;

pub use api::{ApiEffect, ApiResponse, CategoryInfo, EvaluateBody};
pub use interpreter::EndorsementInterpreter;
