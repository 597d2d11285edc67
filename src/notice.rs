//! User-facing notices.
//!
//! Titles and messages for terminal and completion states. These are built
//! from a [`Blocking`] or a commit result plus a [`NoticeContext`]; the
//! classifier itself never produces prose beyond the one-line reason.

use serde::{Deserialize, Serialize};

use crate::capability::{BlockReason, Blocking};
use crate::types::Outcome;

/// A titled message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Names and addresses substituted into notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContext {
    pub endorsee: String,
    pub category: String,
    pub category_full: String,
    pub contact_email: String,
}

impl NoticeContext {
    pub fn new(outcome: &Outcome, category_name: Option<&str>, contact_email: &str) -> Self {
        let endorsee = match outcome.endorsee_name() {
            name if name.is_empty() => "this user".to_string(),
            name => name,
        };
        let (category, category_full) = match &outcome.endorsement_request {
            Some(request) => (request.category(), request.category_full_name(category_name)),
            None => ("this category".to_string(), "this category".to_string()),
        };
        NoticeContext {
            endorsee,
            category,
            category_full,
            contact_email: contact_email.to_string(),
        }
    }
}

fn paragraphs(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Notice for an outcome the endorser cannot act on.
///
/// The blocking message (the server's reason, or the stock text) always
/// appears verbatim as the first paragraph.
pub fn blocking_notice(blocking: &Blocking, ctx: &NoticeContext) -> Notice {
    let reason = blocking.message.as_str();
    match blocking.reason {
        BlockReason::AlreadyDecided { endorsed } => {
            let feedback = if endorsed { "endorse" } else { "not endorse" };
            Notice::new(
                format!("You've already decided to {} {}", feedback, ctx.endorsee),
                paragraphs(&[
                    reason,
                    &format!(
                        "You've already decided to {} {} for {}.",
                        feedback, ctx.endorsee, ctx.category_full
                    ),
                    "arXiv users are allowed to endorse (or not endorse) a user for a particular \
                     archive or subject class only once.",
                    &format!(
                        "Thank you for helping us maintain the quality of arXiv submissions. \
                         If you've made a terrible mistake or if you have any questions or \
                         comments, contact {}.",
                        ctx.contact_email
                    ),
                ]),
            )
        }
        BlockReason::Suspended => Notice::new(
            "You are not allowed to endorse",
            paragraphs(&[
                reason,
                &format!(
                    "Your ability to endorse other arXiv users has been suspended by \
                     administrative action. If you believe this is a mistake, please contact {}.",
                    ctx.contact_email
                ),
            ]),
        ),
        BlockReason::NotQualified => Notice::new(
            format!("You are not allowed to endorse for {}", ctx.category),
            paragraphs(&[
                reason,
                &format!(
                    "You are not allowed to endorse arXiv users for category {}.",
                    ctx.category_full
                ),
                &format!(
                    "Please advise {} to find another endorser. Please contact {} if you have \
                     any questions or comments.",
                    ctx.endorsee, ctx.contact_email
                ),
            ]),
        ),
        BlockReason::SelfEndorsement => Notice::new(
            "You cannot endorse yourself",
            paragraphs(&[
                reason,
                &format!(
                    "People cannot endorse themselves. You must find somebody else to give you \
                     an endorsement. If you think that you have received this message in error \
                     or need help, please contact {}.",
                    ctx.contact_email
                ),
            ]),
        ),
        BlockReason::RequestInvalid => Notice::new(
            "This endorsement request cannot be accepted",
            paragraphs(&[
                reason,
                &format!(
                    "The request from {} to submit to {} is no longer valid.",
                    ctx.endorsee, ctx.category_full
                ),
            ]),
        ),
    }
}

/// Notice after a positive endorsement was recorded.
pub fn granted_notice(ctx: &NoticeContext) -> Notice {
    Notice::new(
        format!("Thank you for endorsing {}", ctx.endorsee),
        paragraphs(&[
            "Your endorsement helps us maintain the quality of arXiv submissions.",
            &format!(
                "{e} is now authorized to upload articles to {c}; we've informed {e} of this by \
                 sending an e-mail. (We did not tell {e} that the endorsement came from you.)",
                e = ctx.endorsee,
                c = ctx.category_full
            ),
        ]),
    )
}

/// Notice after a negative or "don't know" vote was recorded.
pub fn feedback_notice(ctx: &NoticeContext) -> Notice {
    Notice::new(
        format!("Thank you for your feedback on {}", ctx.endorsee),
        paragraphs(&[
            "Your vigilance helps us maintain the quality of arXiv submissions.",
            &format!(
                "Your vote of no confidence will not result in any automatic action against \
                 {e}; {e} will still be able to submit to {c} if they can find another endorser. \
                 However, your feedback may help us detect massive abuse and will direct our \
                 attention to possible problem submissions.",
                e = ctx.endorsee,
                c = ctx.category
            ),
            &format!(
                "{e} will not be informed of your feedback. It is your responsibility to tell \
                 (or not tell) {e} of your decision.",
                e = ctx.endorsee
            ),
        ]),
    )
}

/// Notice when the authority rejected a call, showing its reason verbatim.
pub fn rejected_notice(reason: &str) -> Notice {
    Notice::new("Endorsement failed", reason)
}

/// Notice when the session is no longer valid.
pub fn login_notice() -> Notice {
    Notice::new("No User Information", "Please re-login first.")
}

/// Notice when a commit failed for a reason other than a rule.
pub fn commit_error_notice(message: &str) -> Notice {
    Notice::new(
        "Endorsement could not be completed",
        paragraphs(&[
            message,
            "Start again with the same code to check whether your decision was recorded.",
        ]),
    )
}
