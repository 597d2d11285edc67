//! Capability classification.
//!
//! Maps a preflight [`Outcome`] to what the endorser may do next. This is a
//! pure function of the outcome; turning a [`Blocking`] into user-facing text
//! is the job of [`crate::notice`], so classification can be tested without
//! any presentation.
//!
//! | submitted | capability  | acceptable | may_decide |
//! |-----------|-------------|------------|------------|
//! | true      | any         | any        | false      |
//! | false     | prohibited  | any        | false      |
//! | false     | uncredited  | any        | false      |
//! | false     | oneself     | any        | false      |
//! | false     | credited    | false      | false      |
//! | false     | credited    | true       | true       |

use serde::{Deserialize, Serialize};

use crate::types::{EndorserCapability, Outcome};

/// Why the endorser cannot decide this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    /// This endorser already voted on this request.
    AlreadyDecided {
        /// Whether the recorded vote was an endorsement.
        endorsed: bool,
    },
    /// Endorsing privileges suspended.
    Suspended,
    /// Not qualified for the request's category.
    NotQualified,
    /// The endorser made the request.
    SelfEndorsement,
    /// The request itself can no longer be endorsed.
    RequestInvalid,
}

impl BlockReason {
    /// The message used when the server did not supply a reason.
    pub fn stock_message(&self) -> &'static str {
        match self {
            BlockReason::AlreadyDecided { endorsed: true } => {
                "You have already decided to endorse this user."
            }
            BlockReason::AlreadyDecided { endorsed: false } => {
                "You have already decided not to endorse this user."
            }
            BlockReason::Suspended => "You may not endorse.",
            BlockReason::NotQualified => "You are not qualified to endorse.",
            BlockReason::SelfEndorsement => "You cannot endorse yourself.",
            BlockReason::RequestInvalid => "Endorsee cannot receive any endorsement.",
        }
    }

    /// True when the block stops the workflow before the review step.
    ///
    /// An invalid request is still shown for review so the endorser can read
    /// why it was rejected.
    pub fn is_terminal_before_review(&self) -> bool {
        !matches!(self, BlockReason::RequestInvalid)
    }
}

/// A block together with the message to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocking {
    pub reason: BlockReason,
    /// The server's reason verbatim, or the stock message.
    pub message: String,
}

/// Result of classifying an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The request details may be shown on the review step.
    pub may_review: bool,
    /// The endorser may advance past review and decide.
    pub may_decide: bool,
    /// Present whenever `may_decide` is false.
    pub blocking: Option<Blocking>,
}

impl Classification {
    fn blocked(outcome: &Outcome, reason: BlockReason) -> Self {
        let message = outcome
            .reason()
            .map(str::to_string)
            .unwrap_or_else(|| reason.stock_message().to_string());
        Classification {
            may_review: !reason.is_terminal_before_review(),
            may_decide: false,
            blocking: Some(Blocking { reason, message }),
        }
    }
}

/// Classifies a preflight outcome.
///
/// `submitted` dominates every other field; after that the capability decides,
/// and only a credited endorser looks at `request_acceptable`.
pub fn classify(outcome: &Outcome) -> Classification {
    if outcome.submitted {
        return Classification::blocked(
            outcome,
            BlockReason::AlreadyDecided {
                endorsed: outcome.is_positive_endorsement(),
            },
        );
    }

    match outcome.endorser_capability {
        EndorserCapability::Prohibited => Classification::blocked(outcome, BlockReason::Suspended),
        EndorserCapability::Uncredited => {
            Classification::blocked(outcome, BlockReason::NotQualified)
        }
        EndorserCapability::Oneself => {
            Classification::blocked(outcome, BlockReason::SelfEndorsement)
        }
        EndorserCapability::Credited if !outcome.request_acceptable => {
            Classification::blocked(outcome, BlockReason::RequestInvalid)
        }
        EndorserCapability::Credited => Classification {
            may_review: true,
            may_decide: true,
            blocking: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_outcome, outcome_with};
    use crate::types::Endorsement;
    use proptest::prelude::*;

    // ─── Decision table ───────────────────────────────────────────────────────

    #[test]
    fn credited_and_acceptable_may_decide() {
        let c = classify(&outcome_with(false, EndorserCapability::Credited, true));
        assert!(c.may_review);
        assert!(c.may_decide);
        assert!(c.blocking.is_none());
    }

    #[test]
    fn submitted_names_prior_vote() {
        let mut outcome = outcome_with(true, EndorserCapability::Credited, true);
        outcome.endorsement = Some(Endorsement { point_value: 10 });
        let c = classify(&outcome);
        assert!(!c.may_decide);
        assert!(!c.may_review);
        assert_eq!(
            c.blocking.unwrap().reason,
            BlockReason::AlreadyDecided { endorsed: true }
        );

        outcome.endorsement = Some(Endorsement { point_value: 0 });
        assert_eq!(
            classify(&outcome).blocking.unwrap().reason,
            BlockReason::AlreadyDecided { endorsed: false }
        );
    }

    #[test]
    fn prohibited_is_suspended() {
        let c = classify(&outcome_with(false, EndorserCapability::Prohibited, true));
        let blocking = c.blocking.unwrap();
        assert_eq!(blocking.reason, BlockReason::Suspended);
        assert_eq!(blocking.message, "You may not endorse.");
    }

    #[test]
    fn uncredited_is_not_qualified() {
        let c = classify(&outcome_with(false, EndorserCapability::Uncredited, true));
        assert_eq!(c.blocking.unwrap().reason, BlockReason::NotQualified);
    }

    #[test]
    fn oneself_is_self_endorsement() {
        let c = classify(&outcome_with(false, EndorserCapability::Oneself, true));
        assert!(!c.may_decide);
        assert_eq!(c.blocking.unwrap().reason, BlockReason::SelfEndorsement);
    }

    #[test]
    fn credited_but_unacceptable_may_only_review() {
        let c = classify(&outcome_with(false, EndorserCapability::Credited, false));
        assert!(c.may_review);
        assert!(!c.may_decide);
        assert_eq!(c.blocking.unwrap().reason, BlockReason::RequestInvalid);
    }

    #[test]
    fn server_reason_is_used_verbatim() {
        let mut outcome = outcome_with(false, EndorserCapability::Uncredited, true);
        outcome.reason = Some("You have not submitted 2 papers to math.AG".to_string());
        assert_eq!(
            classify(&outcome).blocking.unwrap().message,
            "You have not submitted 2 papers to math.AG"
        );
    }

    // ─── Properties ───────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn submitted_never_decides(mut outcome in arb_outcome()) {
            outcome.submitted = true;
            prop_assert!(!classify(&outcome).may_decide);
        }

        #[test]
        fn non_credited_never_decides(mut outcome in arb_outcome(), cap in prop_oneof![
            Just(EndorserCapability::Prohibited),
            Just(EndorserCapability::Uncredited),
            Just(EndorserCapability::Oneself),
        ]) {
            outcome.endorser_capability = cap;
            prop_assert!(!classify(&outcome).may_decide);
        }

        #[test]
        fn may_decide_iff_table_row(outcome in arb_outcome()) {
            let expected = !outcome.submitted
                && outcome.endorser_capability == EndorserCapability::Credited
                && outcome.request_acceptable;
            prop_assert_eq!(classify(&outcome).may_decide, expected);
        }

        #[test]
        fn blocked_outcomes_always_carry_a_message(outcome in arb_outcome()) {
            let c = classify(&outcome);
            prop_assert_eq!(c.blocking.is_none(), c.may_decide);
            if let Some(blocking) = c.blocking {
                prop_assert!(!blocking.message.trim().is_empty());
            }
        }
    }
}
