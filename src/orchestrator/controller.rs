//! Action lifecycle controller.
//!
//! Receives commands from the UI, drives the API client, and emits events
//! back. Exactly one execute request can be in flight; its completion is the
//! single place that re-arms the run action, on every exit path.

use crate::api::ApiClient;
use crate::model::{ActionError, Language, RunConfig, RunOutcome, SessionEvent};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers. Run and share carry the language the
/// selector held at activation time; the wire always reflects the UI.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Run { code: String, language: Language },
    Share { code: String, language: Language },
    Fetch { id: String },
    Quit,
}

/// Run the controller loop until `Quit` or channel close.
///
/// `initial_snippet` is the one-shot hydration id requested at startup, fed
/// through the same path as an interactive fetch.
pub(crate) async fn run_controller(
    cfg: &RunConfig,
    initial_snippet: Option<String>,
    event_tx: UnboundedSender<SessionEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let client = ApiClient::new(cfg)?;

    let monitor = tokio::spawn(crate::monitor::run_status_monitor(
        client.clone(),
        cfg.status_interval,
        event_tx.clone(),
    ));

    if let Some(id) = initial_snippet {
        spawn_fetch(&client, &event_tx, id);
    }

    let mut run_task: Option<tokio::task::JoinHandle<Result<RunOutcome, ActionError>>> = None;

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Run { code, language }) => {
                        if run_task.is_some() {
                            // The UI disables run while in flight; a second
                            // command here is a race, not a queue entry.
                            log::debug!("run ignored: one already in flight");
                        } else if code.trim().is_empty() {
                            // Local validation: no request leaves the client.
                            let _ = event_tx.send(SessionEvent::RunFinished(
                                Err(ActionError::EmptyCode),
                            ));
                        } else {
                            let _ = event_tx.send(SessionEvent::RunStarted);
                            let client = client.clone();
                            run_task = Some(tokio::spawn(async move {
                                client.execute(&code, language).await
                            }));
                        }
                    }
                    Some(UiCommand::Share { code, language }) => {
                        if code.trim().is_empty() {
                            let _ = event_tx.send(SessionEvent::ShareFinished(
                                Err(ActionError::EmptyCode),
                            ));
                        } else {
                            let client = client.clone();
                            let tx = event_tx.clone();
                            tokio::spawn(async move {
                                let res = client.share(&code, language).await;
                                let _ = tx.send(SessionEvent::ShareFinished(res));
                            });
                        }
                    }
                    Some(UiCommand::Fetch { id }) => {
                        spawn_fetch(&client, &event_tx, id);
                    }
                    Some(UiCommand::Quit) | None => break Ok(()),
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it
            // can be dropped when another branch is chosen and completion is
            // never observed.
            maybe_done = async {
                match run_task.as_mut() {
                    Some(h) => Some(h.await),
                    None => futures::future::pending().await,
                }
            } => {
                if let Some(join_res) = maybe_done {
                    run_task = None;
                    let res = match join_res {
                        Ok(r) => r,
                        Err(e) => Err(ActionError::Transport(format!("execute task failed: {e}"))),
                    };
                    // Terminal event on every path: success, server error,
                    // transport error, timeout, or a panicked task.
                    let _ = event_tx.send(SessionEvent::RunFinished(res));
                }
            }
        }
    };

    // Aborting is required: dropping the JoinHandle would leave the monitor
    // polling forever.
    monitor.abort();
    res
}

fn spawn_fetch(client: &ApiClient, event_tx: &UnboundedSender<SessionEvent>, id: String) {
    let client = client.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let res = client.fetch_snippet(&id).await;
        let _ = tx.send(SessionEvent::SnippetLoaded(res));
    });
}
