//! Endorsement Flow - the endorser side of the arXiv endorsement decision.
//!
//! This library provides the domain types, the workflow state machine and
//! the admin API client for evaluating an endorsement code, showing what the
//! endorser may do, and recording their decision at most once.

pub mod api;
pub mod capability;
pub mod code;
pub mod commands;
pub mod config;
pub mod decision;
pub mod effects;
pub mod notice;
pub mod session;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod test_utils;
