//! Preflight resolution.
//!
//! A preflight asks the authority to evaluate a code for the current endorser
//! without recording anything. Its [`Outcome`] drives every later step. Once
//! an outcome names a request, the category's human-readable name is looked
//! up separately; that lookup only decorates the display and never fails the
//! workflow.

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::effects::{ApiEffect, ApiResponse, EndorsementInterpreter};
use crate::session::SessionContext;
use crate::types::{EndorsementCode, Outcome};

/// The preflight call for `code` on behalf of the session's endorser.
pub fn preflight_effect(session: &SessionContext, code: &EndorsementCode) -> ApiEffect {
    ApiEffect::Preflight {
        code: code.clone(),
        endorser_id: session.endorser_id.clone(),
    }
}

/// The category lookup for an outcome, if it names a request.
pub fn category_lookup_effect(outcome: &Outcome) -> Option<ApiEffect> {
    let request = outcome.endorsement_request.as_ref()?;
    if request.archive.is_empty() {
        return None;
    }
    Some(ApiEffect::LookupCategory {
        archive: request.archive.clone(),
        subject_class: request.lookup_subject_class().to_string(),
    })
}

/// Narrows an evaluate response to its outcome.
pub(crate) fn expect_outcome(response: ApiResponse) -> Result<Outcome, ApiError> {
    match response {
        ApiResponse::Outcome(outcome) => Ok(outcome),
        ApiResponse::Category(_) => Err(ApiError::server(
            "expected an evaluation outcome, got a category",
        )),
    }
}

/// Runs a preflight effect and returns the outcome.
pub async fn resolve<I: EndorsementInterpreter>(
    interpreter: &I,
    effect: ApiEffect,
) -> Result<Outcome, ApiError> {
    let response = interpreter.interpret(effect).await?;
    let outcome = expect_outcome(response)?;
    debug!(
        capability = %outcome.endorser_capability,
        submitted = outcome.submitted,
        acceptable = outcome.request_acceptable,
        "preflight resolved"
    );
    Ok(outcome)
}

/// Runs a category lookup. Any failure degrades to no name.
pub async fn resolve_category_name<I: EndorsementInterpreter>(
    interpreter: &I,
    effect: ApiEffect,
) -> Option<String> {
    match interpreter.interpret(effect).await {
        Ok(ApiResponse::Category(info)) => info.category_name.filter(|n| !n.is_empty()),
        Ok(ApiResponse::Outcome(_)) => {
            warn!("category lookup returned an evaluation outcome");
            None
        }
        Err(e) => {
            debug!(error = %e, "category lookup failed, showing category without a name");
            None
        }
    }
}
