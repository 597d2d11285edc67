//! Async event loop around the controller.
//!
//! The driver owns a [`WorkflowController`] and feeds it inputs one at a
//! time from a single task, so state transitions are serialized even though
//! API calls run concurrently on spawned tasks. It handles:
//! - user inputs via an mpsc channel
//! - completions from spawned API calls
//! - debouncing of preflights while the code is being typed
//! - graceful shutdown via cancellation token
//!
//! The latest state is published on a watch channel after every input.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::effects::{ApiEffect, EndorsementInterpreter};
use crate::session::SessionContext;

use super::commit;
use super::controller::WorkflowController;
use super::guard::Ticket;
use super::message::{Command, Input, PresentationEvent};
use super::preflight;
use super::state::WorkflowState;

/// Receives presentation events, in order.
pub trait Presenter: Send {
    fn present(&mut self, event: PresentationEvent);
}

/// A preflight waiting out the debounce window.
#[derive(Debug)]
struct PendingPreflight {
    ticket: Ticket,
    effect: ApiEffect,
    deadline: Instant,
}

pub struct WorkflowDriver<I> {
    controller: WorkflowController,
    interpreter: Arc<I>,
    debounce: Duration,
    state_tx: watch::Sender<WorkflowState>,
    completions_tx: mpsc::UnboundedSender<Input>,
    completions_rx: mpsc::UnboundedReceiver<Input>,
    pending: Option<PendingPreflight>,
}

impl<I> WorkflowDriver<I>
where
    I: EndorsementInterpreter + Send + Sync + 'static,
{
    /// Creates a driver and a receiver for its published state.
    pub fn new(
        controller: WorkflowController,
        interpreter: I,
        debounce: Duration,
    ) -> (Self, watch::Receiver<WorkflowState>) {
        let (state_tx, state_rx) = watch::channel(controller.state().clone());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let driver = WorkflowDriver {
            controller,
            interpreter: Arc::new(interpreter),
            debounce,
            state_tx,
            completions_tx,
            completions_rx,
            pending: None,
        };
        (driver, state_rx)
    }

    /// Runs until the input channel closes or `shutdown` is cancelled.
    ///
    /// Returns the final state. Calls still in flight are abandoned; their
    /// results are never applied.
    pub async fn run<P: Presenter>(
        mut self,
        mut inputs: mpsc::Receiver<Input>,
        mut presenter: P,
        shutdown: CancellationToken,
    ) -> WorkflowState {
        info!(
            endorser = %self.controller.session().endorser_id,
            "endorsement workflow started"
        );

        loop {
            let deadline = self.pending.as_ref().map(|p| p.deadline);

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, stopping workflow");
                    break;
                }

                input = inputs.recv() => {
                    match input {
                        Some(input) => self.apply(input, &mut presenter),
                        None => {
                            debug!("input channel closed");
                            break;
                        }
                    }
                }

                Some(completion) = self.completions_rx.recv() => {
                    self.apply(completion, &mut presenter);
                }

                _ = async {
                    match deadline {
                        Some(deadline) => tokio::time::sleep_until(deadline).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.fire_pending();
                }
            }
        }

        self.controller.state().clone()
    }

    fn apply<P: Presenter>(&mut self, input: Input, presenter: &mut P) {
        trace!(input = input.name(), "applying input");
        let commands = self.controller.handle(input);
        self.state_tx.send_replace(self.controller.state().clone());

        for command in commands {
            match command {
                Command::Present(event) => presenter.present(event),
                Command::Dispatch { ticket, effect } => self.dispatch(ticket, effect),
                Command::Rebind(session) => self.rebind(session),
            }
        }
    }

    /// Later calls use `session`. Calls already in flight keep the old one.
    fn rebind(&mut self, session: SessionContext) {
        info!(endorser = %session.endorser_id, "using renewed session");
        self.interpreter = Arc::new(self.interpreter.with_session(session));
    }

    fn dispatch(&mut self, ticket: Ticket, effect: ApiEffect) {
        if matches!(effect, ApiEffect::Preflight { .. }) && !self.debounce.is_zero() {
            if let Some(replaced) = self.pending.take() {
                trace!(ticket = %replaced.ticket, "debounced preflight replaced");
            }
            self.pending = Some(PendingPreflight {
                ticket,
                effect,
                deadline: Instant::now() + self.debounce,
            });
            return;
        }
        self.spawn(ticket, effect);
    }

    fn fire_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if self.controller.is_current(pending.ticket) {
            self.spawn(pending.ticket, pending.effect);
        } else {
            debug!(ticket = %pending.ticket, "debounced preflight superseded, not sending");
        }
    }

    fn spawn(&self, ticket: Ticket, effect: ApiEffect) {
        debug!(%ticket, effect = effect.name(), "dispatching");
        let interpreter = Arc::clone(&self.interpreter);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let completion = execute(interpreter.as_ref(), ticket, effect).await;
            // The driver may already have stopped; the result is then moot.
            let _ = completions.send(completion);
        });
    }
}

/// Runs one effect and wraps its result as the matching completion input.
async fn execute<I: EndorsementInterpreter>(
    interpreter: &I,
    ticket: Ticket,
    effect: ApiEffect,
) -> Input {
    match effect {
        effect @ ApiEffect::Preflight { .. } => Input::PreflightCompleted {
            ticket,
            result: preflight::resolve(interpreter, effect).await,
        },
        effect @ ApiEffect::Commit { .. } => Input::CommitCompleted {
            ticket,
            result: commit::submit(interpreter, effect).await,
        },
        effect @ ApiEffect::LookupCategory { .. } => Input::CategoryResolved {
            ticket,
            category_name: preflight::resolve_category_name(interpreter, effect).await,
        },
    }
}
