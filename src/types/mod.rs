//! Core domain types for the endorsement workflow.
//!
//! These types mirror the admin API's wire format and encode its invariants
//! (a capability is always one of four values, codes are pre-validated) in
//! the type system.

pub mod ids;
pub mod outcome;

pub use ids::{EndorsementCode, EndorserId, RequestId};
pub use outcome::{Endorsement, EndorsementRequest, EndorserCapability, Outcome, PublicUser};
