//! Admin API effect interpreter using reqwest.
//!
//! - `POST /v1/endorsements/endorse` for both preflight and commit
//! - `GET /v1/categories/{archive}/subject-class/{subject_class}` for names
//!
//! Non-mutating calls go through [`retry_with_backoff`]; the commit gets
//! exactly one attempt.

use crate::effects::{ApiEffect, ApiResponse, CategoryInfo, EndorsementInterpreter};
use crate::session::SessionContext;
use crate::types::Outcome;

use super::client::HttpClient;
use super::error::ApiError;
use super::retry::{RetryPolicy, retry_with_backoff};

const ENDORSE_PATH: &[&str] = &["v1", "endorsements", "endorse"];

impl EndorsementInterpreter for HttpClient {
    async fn interpret(&self, effect: ApiEffect) -> Result<ApiResponse, ApiError> {
        let policy = if effect.is_mutating() {
            RetryPolicy::NoRetry
        } else {
            RetryPolicy::RetryTransient
        };

        let result = retry_with_backoff(self.retry_config(), policy, || {
            execute_effect(self, effect.clone())
        })
        .await
        .into_result();

        if let Err(e) = &result {
            tracing::debug!(
                effect = effect.name(),
                kind = ?e.kind,
                status = ?e.status_code,
                "admin API call failed"
            );
        }
        result
    }

    fn with_session(&self, session: SessionContext) -> Self {
        HttpClient::with_session(self, session)
    }
}

/// Executes a single effect without retry.
async fn execute_effect(client: &HttpClient, effect: ApiEffect) -> Result<ApiResponse, ApiError> {
    match effect {
        ApiEffect::Preflight { .. } | ApiEffect::Commit { .. } => evaluate(client, &effect).await,
        ApiEffect::LookupCategory {
            archive,
            subject_class,
        } => lookup_category(client, &archive, &subject_class).await,
    }
}

async fn evaluate(client: &HttpClient, effect: &ApiEffect) -> Result<ApiResponse, ApiError> {
    let Some(body) = effect.evaluate_body() else {
        return Err(ApiError::server(format!(
            "{} is not an evaluate call",
            effect.name()
        )));
    };

    let request = client
        .inner()
        .post(client.endpoint(ENDORSE_PATH))
        .json(&body);
    let response = client
        .authorize(request)
        .send()
        .await
        .map_err(ApiError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status.as_u16(), &text));
    }

    let outcome: Outcome = response.json().await.map_err(ApiError::from_reqwest)?;
    Ok(ApiResponse::Outcome(outcome))
}

async fn lookup_category(
    client: &HttpClient,
    archive: &str,
    subject_class: &str,
) -> Result<ApiResponse, ApiError> {
    let url = client.endpoint(&["v1", "categories", archive, "subject-class", subject_class]);
    let response = client
        .authorize(client.inner().get(url))
        .send()
        .await
        .map_err(ApiError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status.as_u16(), &text));
    }

    let info: CategoryInfo = response.json().await.map_err(ApiError::from_reqwest)?;
    Ok(ApiResponse::Category(info))
}
