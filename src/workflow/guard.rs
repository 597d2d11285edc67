//! Last-request-wins bookkeeping.
//!
//! Every asynchronous call the workflow starts is tagged with a [`Ticket`].
//! A completion is applied only if its ticket is still the one the guard
//! considers current; anything else is stale and discarded. Tickets also
//! carry the workflow instance, so a reset strands every call issued
//! before it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one asynchronous call within one workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticket {
    pub instance: u64,
    pub sequence: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.instance, self.sequence)
    }
}

/// Issues tickets for one workflow instance and tracks which one is current.
#[derive(Debug, Clone)]
pub struct RaceGuard {
    instance: u64,
    next_sequence: u64,
    active: Option<Ticket>,
}

impl RaceGuard {
    pub fn new(instance: u64) -> Self {
        RaceGuard {
            instance,
            next_sequence: 0,
            active: None,
        }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Issues a ticket and makes it the current one.
    ///
    /// Any previously current ticket is superseded.
    pub fn issue(&mut self) -> Ticket {
        let ticket = self.mint();
        self.active = Some(ticket);
        ticket
    }

    /// Issues a ticket without changing which one is current.
    ///
    /// Used for calls tracked elsewhere, such as the commit.
    pub fn mint(&mut self) -> Ticket {
        let ticket = Ticket {
            instance: self.instance,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        ticket
    }

    /// Forgets the current ticket. Nothing outstanding will be accepted.
    pub fn supersede(&mut self) {
        self.active = None;
    }

    /// The ticket whose completion would currently be applied.
    pub fn active(&self) -> Option<Ticket> {
        self.active
    }

    /// Returns true if a completion carrying `ticket` should be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.active == Some(ticket)
    }
}
