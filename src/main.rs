use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use endorsement_flow::api::HttpClient;
use endorsement_flow::code::code_from_url;
use endorsement_flow::commands::{ParseError, TerminalCommand, parse_command};
use endorsement_flow::config::ClientConfig;
use endorsement_flow::workflow::{
    Input, PresentationEvent, Presenter, WorkflowController, WorkflowDriver, WorkflowState,
};

const HELP: &str = "\
Commands:
  code <CODE>        enter the six-character endorsement code
  next | back        move between steps
  endorse | deny | unknown
                     choose your vote
  comment <text>     optional comment
  knows yes|no       you know the author personally
  seen yes|no        you have seen the paper
  submit             record your decision
  reset              start over
  login <TOKEN>      continue with the token of a fresh login
  status | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "endorsement_flow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().context("loading configuration")?;
    let client = HttpClient::from_config(&config).context("building admin API client")?;
    let session = config.session();
    let controller = WorkflowController::new(session.clone());
    let (driver, state_rx) = WorkflowDriver::new(controller, client, config.debounce);

    let (inputs, inputs_rx) = mpsc::channel(32);
    let shutdown = CancellationToken::new();
    let workflow = tokio::spawn(driver.run(inputs_rx, TerminalPresenter, shutdown.clone()));
    let renderer = tokio::spawn(render_states(state_rx.clone()));

    if let Some(arg) = std::env::args().nth(1) {
        let code = match Url::parse(&arg) {
            Ok(url) => code_from_url(&url).unwrap_or_default(),
            Err(_) => arg,
        };
        inputs.send(Input::CodeEdited(code)).await?;
    } else {
        println!("{}", describe(&state_rx.borrow()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(TerminalCommand::Quit) => break,
            Ok(TerminalCommand::Help) => println!("{}", HELP),
            Ok(TerminalCommand::Status) => println!("{}", describe(&state_rx.borrow())),
            Ok(command) => {
                if let Some(input) = command.into_input(&session) {
                    inputs.send(input).await?;
                }
            }
            Err(ParseError::Empty) => {}
            Err(e) => println!("{}. Type `help` for commands.", e),
        }
    }

    shutdown.cancel();
    let last = workflow.await?;
    renderer.abort();
    tracing::info!(state = last.name(), "exiting");
    Ok(())
}

struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn present(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::TerminalNotice(notice) => {
                println!("\n== {} ==\n{}\n", notice.title, notice.message)
            }
            PresentationEvent::Progress(true) => println!("..."),
            PresentationEvent::Progress(false) => {}
            PresentationEvent::Restart => {
                println!("Enter a new code or type `reset` to start again.")
            }
            PresentationEvent::Error(message) => println!("Error: {}", message),
            PresentationEvent::LoginRequired(notice) => println!(
                "{}: {} Log in again, then type `login <TOKEN>` with the new token.",
                notice.title, notice.message
            ),
        }
    }
}

/// Prints a summary whenever the step or its content changes.
async fn render_states(mut state_rx: watch::Receiver<WorkflowState>) {
    let mut last = String::new();
    while state_rx.changed().await.is_ok() {
        let summary = describe(&state_rx.borrow_and_update());
        if summary != last {
            println!("{}", summary);
            last = summary;
        }
    }
}

fn describe(state: &WorkflowState) -> String {
    match state {
        WorkflowState::AwaitingCode {
            input,
            code_error,
            error,
        } => match (code_error, error) {
            (Some(invalid), _) if !input.is_empty() => {
                format!("Code `{}`: {}. Codes have six characters.", input, invalid.hint())
            }
            (_, Some(error)) => format!("Code `{}`: {}", input, error),
            _ => "Enter your endorsement code: code <CODE>".to_string(),
        },
        WorkflowState::Validating { code } => format!("Checking code {}...", code),
        WorkflowState::Reviewing { review, .. } => {
            let endorsee = review
                .outcome
                .endorsee
                .as_ref()
                .map(|e| e.display_long())
                .unwrap_or_default();
            let next = if review.may_decide() {
                "Type `next` to decide."
            } else {
                "You cannot continue with this request."
            };
            format!(
                "Endorsee: {}\nCategory: {}\n{}",
                endorsee,
                review.category_full_name(),
                next
            )
        }
        WorkflowState::Deciding { draft, .. } => match draft.vote {
            Some(vote) => format!("Vote: {:?}. Type `next` to continue.", vote),
            None => "Choose: endorse | deny | unknown".to_string(),
        },
        WorkflowState::Attesting { draft, .. } => format!(
            "Vote: {:?}, knows personally: {}, seen paper: {}.\n\
             Optional: comment <text>, knows yes|no, seen yes|no. Then `submit`.",
            draft.vote, draft.knows_personally, draft.seen_paper
        ),
        WorkflowState::Committing { .. } => "Submitting your decision...".to_string(),
        WorkflowState::Completed { result, .. } => format!(
            "Decision recorded at {}.",
            result.decided_at.format("%Y-%m-%d %H:%M UTC")
        ),
        WorkflowState::Failed { failure } => format!("{}.", failure.notice.title),
    }
}
