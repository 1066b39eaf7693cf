use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Settings shared by every mode (TUI and one-shot).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub language: Language,
    pub status_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

/// Languages advertised by the service. Only Python is executable today;
/// the rest exist so the selector guard has something to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
}

impl Language {
    pub const ADVERTISED: [Language; 3] = [Language::Python, Language::Javascript, Language::Java];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self, Language::Python)
    }

    /// Lenient tag parse for hydrated snippets; unknown tags fall back to Python
    /// rather than failing the whole hydration.
    pub fn from_tag(tag: &str) -> Language {
        match tag {
            "javascript" => Language::Javascript,
            "java" => Language::Java,
            _ => Language::Python,
        }
    }

    pub fn next(self) -> Language {
        let i = Self::ADVERTISED.iter().position(|l| *l == self).unwrap_or(0);
        Self::ADVERTISED[(i + 1) % Self::ADVERTISED.len()]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Body of `POST /api/execute` and `POST /api/share`.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetPayload {
    pub code: String,
    pub language: Language,
}

/// Response of `GET /api/code/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Snippet {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Health derived from one status probe. Re-derived on every tick; there is
/// deliberately no failure counter and no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerHealth {
    Reachable,
    Unreachable,
}

/// What a successful execution produced. A response carrying an `error` field
/// never becomes an outcome; it is surfaced as `ActionError::Server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Output(String),
    NoOutput,
}

impl RunOutcome {
    pub fn render(&self) -> String {
        match self {
            RunOutcome::Output(s) => s.clone(),
            RunOutcome::NoOutput => "Code executed, but no output was returned.".to_string(),
        }
    }
}

/// The disjoint failure classes of a user action. Each class has a fixed
/// presentation; transport problems must never read like execution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Code field is empty!")]
    EmptyCode,
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
}

impl ActionError {
    /// One-line rendering for the output pane / stderr. Local validation and
    /// server-reported errors share the `Error:` prefix; infrastructure
    /// failures are prefixed `Request error:` so they cannot be mistaken for
    /// program output gone wrong.
    pub fn render(&self) -> String {
        match self {
            ActionError::EmptyCode | ActionError::Server(_) => format!("Error: {self}"),
            ActionError::Transport(_) | ActionError::TimedOut(_) => {
                format!("Request error: {self}")
            }
        }
    }
}

/// Events emitted by the controller and the status monitor, consumed by
/// presentation layers. Every started action is matched by exactly one
/// terminal event regardless of how it ended.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Health(ServerHealth),
    RunStarted,
    RunFinished(Result<RunOutcome, ActionError>),
    ShareFinished(Result<String, ActionError>),
    SnippetLoaded(Result<Snippet, ActionError>),
}
