//! Shared test utilities: sample data, arbitrary generators for
//! property-based testing, and scripted stand-ins for the API and the UI.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;
use url::Url;

use crate::api::{ApiError, ApiErrorKind};
use crate::decision::Vote;
use crate::effects::{ApiEffect, ApiResponse, CategoryInfo, EndorsementInterpreter};
use crate::session::SessionContext;
use crate::types::{
    Endorsement, EndorsementRequest, EndorserCapability, Outcome, PublicUser, RequestId,
};
use crate::workflow::{PresentationEvent, Presenter};

// ─── Sample data ──────────────────────────────────────────────────────────────

pub fn test_session() -> SessionContext {
    SessionContext::new("42", Url::parse("http://localhost:8000/").unwrap())
        .with_access_token("first-token")
}

pub fn sample_request() -> EndorsementRequest {
    EndorsementRequest {
        id: Some(RequestId(7)),
        archive: "math".to_string(),
        subject_class: Some("AG".to_string()),
        endorsee_id: Some("1001".to_string()),
    }
}

pub fn sample_endorsee() -> PublicUser {
    PublicUser {
        id: Some("1001".to_string()),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: Some("ada@example.org".to_string()),
        affiliation: Some("Analytical Engines".to_string()),
    }
}

/// A fresh, acceptable request evaluated for an endorser with `capability`.
pub fn sample_outcome(capability: EndorserCapability) -> Outcome {
    Outcome {
        endorsement_request: Some(sample_request()),
        endorsee: Some(sample_endorsee()),
        submitted: false,
        endorser_capability: capability,
        request_acceptable: true,
        reason: None,
        endorsement: None,
    }
}

pub fn outcome_with(submitted: bool, capability: EndorserCapability, acceptable: bool) -> Outcome {
    Outcome {
        submitted,
        request_acceptable: acceptable,
        ..sample_outcome(capability)
    }
}

// ─── Generators ───────────────────────────────────────────────────────────────

pub fn arb_capability() -> impl Strategy<Value = EndorserCapability> {
    prop_oneof![
        Just(EndorserCapability::Credited),
        Just(EndorserCapability::Uncredited),
        Just(EndorserCapability::Prohibited),
        Just(EndorserCapability::Oneself),
    ]
}

pub fn arb_outcome() -> impl Strategy<Value = Outcome> {
    (
        any::<bool>(),
        arb_capability(),
        any::<bool>(),
        prop::option::of("[a-zA-Z0-9 .]{0,40}"),
        prop::option::of(-5i64..20),
    )
        .prop_map(|(submitted, capability, acceptable, reason, points)| Outcome {
            endorsement_request: Some(sample_request()),
            endorsee: Some(sample_endorsee()),
            submitted,
            endorser_capability: capability,
            request_acceptable: acceptable,
            reason,
            endorsement: points.map(|point_value| Endorsement { point_value }),
        })
}

// ─── Scripted interpreter ─────────────────────────────────────────────────────

/// A canned reply.
#[derive(Debug, Clone)]
pub enum Scripted {
    Outcome(Outcome),
    Error(ApiErrorKind, String),
}

impl Scripted {
    fn into_result(self) -> Result<Outcome, ApiError> {
        match self {
            Scripted::Outcome(outcome) => Ok(outcome),
            Scripted::Error(kind, message) => Err(match kind {
                ApiErrorKind::NotFound => ApiError::not_found(message),
                ApiErrorKind::Unauthenticated => ApiError::unauthenticated(message),
                ApiErrorKind::RuleViolation => ApiError::rule_violation(message),
                ApiErrorKind::Server => ApiError::server(message),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    preflights: HashMap<String, Scripted>,
    delays: HashMap<String, Duration>,
    commit: Option<Scripted>,
    commit_delay: Duration,
    categories: HashMap<(String, String), String>,
    refused_tokens: HashSet<String>,
    calls: Vec<ApiEffect>,
    tokens: Vec<Option<String>>,
}

/// Interpreter answering from a script, with per-code latency.
///
/// Unknown codes and categories answer not found. Unless scripted, a commit
/// answers with the code's preflight outcome marked submitted, carrying a
/// positive point value only for an endorse vote. Calls made with a refused
/// token answer unauthenticated.
///
/// Copies made by `with_session` share the script and act with the new
/// session's token.
#[derive(Debug, Clone)]
pub struct ScriptedInterpreter {
    script: Arc<Mutex<Script>>,
    token: Option<String>,
}

impl Default for ScriptedInterpreter {
    fn default() -> Self {
        ScriptedInterpreter {
            script: Arc::default(),
            token: test_session().access_token,
        }
    }
}

impl ScriptedInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, code: &str, outcome: Outcome) -> Self {
        self.with_preflight(code, Scripted::Outcome(outcome))
    }

    pub fn with_error(self, code: &str, kind: ApiErrorKind, message: &str) -> Self {
        self.with_preflight(code, Scripted::Error(kind, message.to_string()))
    }

    pub fn with_preflight(self, code: &str, reply: Scripted) -> Self {
        self.script
            .lock()
            .unwrap()
            .preflights
            .insert(code.to_string(), reply);
        self
    }

    pub fn with_delay(self, code: &str, delay: Duration) -> Self {
        self.script
            .lock()
            .unwrap()
            .delays
            .insert(code.to_string(), delay);
        self
    }

    pub fn with_commit(self, reply: Scripted) -> Self {
        self.script.lock().unwrap().commit = Some(reply);
        self
    }

    pub fn with_commit_delay(self, delay: Duration) -> Self {
        self.script.lock().unwrap().commit_delay = delay;
        self
    }

    pub fn with_category(self, archive: &str, subject_class: &str, name: &str) -> Self {
        self.script.lock().unwrap().categories.insert(
            (archive.to_string(), subject_class.to_string()),
            name.to_string(),
        );
        self
    }

    pub fn refusing_token(self, token: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .refused_tokens
            .insert(token.to_string());
        self
    }

    /// The token each call was made with, in order.
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.script.lock().unwrap().tokens.clone()
    }

    /// Every effect received so far, in order.
    pub fn calls(&self) -> Vec<ApiEffect> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Codes of the preflights received so far, in order.
    pub fn preflight_codes(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|effect| match effect {
                ApiEffect::Preflight { code, .. } => Some(code.as_str().to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn commit_count(&self) -> usize {
        self.calls().iter().filter(|e| e.is_mutating()).count()
    }

    fn reply(&self, effect: &ApiEffect) -> (Duration, Result<ApiResponse, ApiError>) {
        let mut script = self.script.lock().unwrap();
        script.calls.push(effect.clone());
        script.tokens.push(self.token.clone());

        if let Some(token) = &self.token {
            if script.refused_tokens.contains(token) {
                return (Duration::ZERO, Err(ApiError::unauthenticated("Please login")));
            }
        }

        match effect {
            ApiEffect::Preflight { code, .. } => {
                let delay = script
                    .delays
                    .get(code.as_str())
                    .copied()
                    .unwrap_or_default();
                let reply = script
                    .preflights
                    .get(code.as_str())
                    .cloned()
                    .unwrap_or_else(|| {
                        Scripted::Error(ApiErrorKind::NotFound, "Not Found".to_string())
                    });
                (delay, reply.into_result().map(ApiResponse::Outcome))
            }
            ApiEffect::Commit { code, decision, .. } => {
                let reply = script.commit.clone().unwrap_or_else(|| {
                    match script.preflights.get(code.as_str()) {
                        Some(Scripted::Outcome(outcome)) => {
                            let point_value = match decision.vote {
                                Some(Vote::Endorse) => 10,
                                _ => 0,
                            };
                            Scripted::Outcome(Outcome {
                                submitted: true,
                                endorsement: Some(Endorsement { point_value }),
                                ..outcome.clone()
                            })
                        }
                        _ => Scripted::Error(ApiErrorKind::NotFound, "Not Found".to_string()),
                    }
                });
                (
                    script.commit_delay,
                    reply.into_result().map(ApiResponse::Outcome),
                )
            }
            ApiEffect::LookupCategory {
                archive,
                subject_class,
            } => {
                let reply = match script
                    .categories
                    .get(&(archive.clone(), subject_class.clone()))
                {
                    Some(name) => Ok(ApiResponse::Category(CategoryInfo {
                        category_name: Some(name.clone()),
                    })),
                    None => Err(ApiError::not_found("Not Found")),
                };
                (Duration::ZERO, reply)
            }
        }
    }
}

impl EndorsementInterpreter for ScriptedInterpreter {
    fn interpret(
        &self,
        effect: ApiEffect,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        let (delay, reply) = self.reply(&effect);
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            reply
        }
    }

    fn with_session(&self, session: SessionContext) -> Self {
        ScriptedInterpreter {
            script: Arc::clone(&self.script),
            token: session.access_token,
        }
    }
}

// ─── Presenter ────────────────────────────────────────────────────────────────

/// Presenter that records every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresentationEvent>>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<PresentationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, event: PresentationEvent) {
        self.events.lock().unwrap().push(event);
    }
}
