use crate::complete;
use crate::editor::EditorBuffer;
use crate::model::{Language, RunOutcome, ServerHealth, SessionEvent};

pub const OUTPUT_PLACEHOLDER: &str = "Result will appear here...";
pub const RUNNING_PLACEHOLDER: &str = "Code is running...";

/// All UI-visible state. Owned by the UI thread only; mutated exclusively by
/// key handling and `apply_event`.
pub struct UiState {
    pub editor: EditorBuffer,
    pub language: Language,
    pub health: ServerHealth,
    pub running: bool,
    pub output: String,
    pub share_url: Option<String>,
    pub info: String,
    pub autocomplete: bool,
    pub suggestions: Vec<&'static str>,
    pub suggestion_selected: usize,
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            editor: EditorBuffer::default(),
            language: Language::Python,
            // Gated until the first probe reports back.
            health: ServerHealth::Unreachable,
            running: false,
            output: OUTPUT_PLACEHOLDER.to_string(),
            share_url: None,
            info: String::new(),
            autocomplete: true,
            suggestions: Vec::new(),
            suggestion_selected: 0,
            show_help: false,
        }
    }
}

impl UiState {
    /// The run action is armed only when the server is reachable and no run
    /// is in flight. The in-flight half is the sole concurrency guard.
    pub fn run_allowed(&self) -> bool {
        self.health == ServerHealth::Reachable && !self.running
    }

    pub fn apply_event(&mut self, ev: SessionEvent) {
        match ev {
            SessionEvent::Health(h) => self.health = h,
            SessionEvent::RunStarted => {
                self.running = true;
                self.output = RUNNING_PLACEHOLDER.to_string();
            }
            SessionEvent::RunFinished(res) => {
                // Terminal step for every run, whatever the outcome.
                self.running = false;
                self.output = match res {
                    Ok(outcome) => outcome.render(),
                    Err(e) => e.render(),
                };
            }
            SessionEvent::ShareFinished(Ok(url)) => {
                self.info = format!("Share URL ready (Ctrl-Y copies it): {url}");
                self.share_url = Some(url);
            }
            SessionEvent::ShareFinished(Err(e)) => {
                self.info = e.render();
            }
            SessionEvent::SnippetLoaded(Ok(snippet)) => {
                self.editor.set_text(&snippet.code);
                self.info = "Loaded shared snippet".to_string();
                // Hydrated tags pass through the same selector guard as a
                // manual pick: unsupported ones revert with one notice.
                if let Some(tag) = snippet.language.as_deref() {
                    let lang = Language::from_tag(tag);
                    if lang.is_supported() {
                        self.language = lang;
                    } else {
                        self.language = Language::Python;
                        self.info = format!("Sorry, {lang} is not supported yet.");
                    }
                }
            }
            SessionEvent::SnippetLoaded(Err(e)) => {
                // Editor keeps its default contents.
                self.info = e.render();
            }
        }
    }

    /// Advance the language selector. Unsupported picks surface one notice
    /// and the selector snaps back to Python.
    pub fn cycle_language(&mut self) {
        let attempted = self.language.next();
        if attempted.is_supported() {
            self.language = attempted;
            self.info = format!("Language: {attempted}");
        } else {
            self.language = Language::Python;
            self.info = format!("Sorry, {attempted} is not supported yet.");
        }
    }

    pub fn toggle_autocomplete(&mut self) {
        self.autocomplete = !self.autocomplete;
        if !self.autocomplete {
            self.suggestions.clear();
        }
        self.info = if self.autocomplete {
            "Autocomplete enabled".to_string()
        } else {
            "Autocomplete disabled".to_string()
        };
    }

    /// Recompute the suggestion list. The automatic path (after ordinary
    /// typing) requires the toggle on and a word/dot char just before the
    /// cursor; the manual trigger ignores both. Suggestions are only ever
    /// offered, never auto-inserted.
    pub fn refresh_suggestions(&mut self, manual: bool) {
        if !manual {
            if !self.autocomplete {
                self.suggestions.clear();
                return;
            }
            match self.editor.char_before_cursor() {
                Some(c) if complete::is_word_char(c) => {}
                _ => {
                    self.suggestions.clear();
                    return;
                }
            }
        }
        let word = self.editor.word_before_cursor();
        self.suggestions = complete::completions(&word);
        self.suggestion_selected = 0;
    }

    pub fn dismiss_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_selected = 0;
    }

    pub fn select_next_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.suggestion_selected = (self.suggestion_selected + 1) % self.suggestions.len();
        }
    }

    pub fn select_prev_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.suggestion_selected =
                (self.suggestion_selected + self.suggestions.len() - 1) % self.suggestions.len();
        }
    }

    pub fn accept_suggestion(&mut self) {
        if let Some(s) = self.suggestions.get(self.suggestion_selected).copied() {
            self.editor.accept_completion(s);
            self.dismiss_suggestions();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionError;
    use std::time::Duration;

    fn reachable(state: &mut UiState) {
        state.apply_event(SessionEvent::Health(ServerHealth::Reachable));
    }

    #[test]
    fn run_gated_until_first_successful_probe() {
        let mut state = UiState::default();
        assert!(!state.run_allowed());
        reachable(&mut state);
        assert!(state.run_allowed());
    }

    #[test]
    fn health_is_level_triggered() {
        let mut state = UiState::default();
        reachable(&mut state);
        state.apply_event(SessionEvent::Health(ServerHealth::Unreachable));
        assert!(!state.run_allowed());
        // Next good poll re-arms regardless of history.
        reachable(&mut state);
        assert!(state.run_allowed());
    }

    #[test]
    fn run_disabled_in_flight_and_rearmed_on_success() {
        let mut state = UiState::default();
        reachable(&mut state);
        state.apply_event(SessionEvent::RunStarted);
        assert!(!state.run_allowed());
        assert_eq!(state.output, RUNNING_PLACEHOLDER);
        state.apply_event(SessionEvent::RunFinished(Ok(RunOutcome::Output(
            "hello".into(),
        ))));
        assert!(state.run_allowed());
        assert_eq!(state.output, "hello");
    }

    #[test]
    fn run_rearmed_on_every_failure_class() {
        for err in [
            ActionError::Server("bad syntax".into()),
            ActionError::Transport("connection refused".into()),
            ActionError::TimedOut(Duration::from_secs(30)),
        ] {
            let mut state = UiState::default();
            reachable(&mut state);
            state.apply_event(SessionEvent::RunStarted);
            state.apply_event(SessionEvent::RunFinished(Err(err.clone())));
            assert!(state.run_allowed(), "not re-armed after {err:?}");
            assert_eq!(state.output, err.render());
        }
    }

    #[test]
    fn server_error_is_prefixed_never_raw() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::RunFinished(Err(ActionError::Server(
            "bad syntax".into(),
        ))));
        assert_eq!(state.output, "Error: bad syntax");
    }

    #[test]
    fn no_output_run_shows_fixed_message() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::RunFinished(Ok(RunOutcome::NoOutput)));
        assert_eq!(state.output, "Code executed, but no output was returned.");
    }

    #[test]
    fn empty_code_validation_renders_inline() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::RunFinished(Err(ActionError::EmptyCode)));
        assert_eq!(state.output, "Error: Code field is empty!");
        assert!(!state.running);
    }

    #[test]
    fn language_guard_reverts_with_one_notice() {
        let mut state = UiState::default();
        state.cycle_language();
        assert_eq!(state.language, Language::Python);
        assert_eq!(state.info, "Sorry, javascript is not supported yet.");
    }

    #[test]
    fn hydration_populates_editor_and_selector() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::SnippetLoaded(Ok(crate::model::Snippet {
            code: "print(1)".into(),
            language: Some("python".into()),
        })));
        assert_eq!(state.editor.text(), "print(1)");
        assert_eq!(state.language, Language::Python);
    }

    #[test]
    fn hydrated_unsupported_language_reverts_with_notice() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::SnippetLoaded(Ok(crate::model::Snippet {
            code: "console.log(1)".into(),
            language: Some("javascript".into()),
        })));
        // The snippet still loads; the selector never leaves supported ground.
        assert_eq!(state.editor.text(), "console.log(1)");
        assert!(state.language.is_supported());
        assert_eq!(state.language, Language::Python);
        assert_eq!(state.info, "Sorry, javascript is not supported yet.");
    }

    #[test]
    fn failed_hydration_keeps_default_editor() {
        let mut state = UiState::default();
        let seed = state.editor.text();
        state.apply_event(SessionEvent::SnippetLoaded(Err(ActionError::Server(
            "shared code 'abc' not found".into(),
        ))));
        assert_eq!(state.editor.text(), seed);
        assert!(state.info.starts_with("Error:"));
    }

    #[test]
    fn share_success_sets_copy_target() {
        let mut state = UiState::default();
        state.apply_event(SessionEvent::ShareFinished(Ok(
            "http://localhost:5000/share/ab12".into(),
        )));
        assert_eq!(
            state.share_url.as_deref(),
            Some("http://localhost:5000/share/ab12")
        );
    }

    #[test]
    fn auto_suggestions_require_toggle_and_word_char() {
        let mut state = UiState::default();
        state.editor.clear();
        for c in "pr".chars() {
            state.editor.insert_char(c);
        }
        state.refresh_suggestions(false);
        assert_eq!(state.suggestions, vec!["print", "property"]);

        state.editor.insert_char(' ');
        state.refresh_suggestions(false);
        assert!(state.suggestions.is_empty());

        state.editor.backspace();
        state.autocomplete = false;
        state.refresh_suggestions(false);
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn manual_trigger_ignores_toggle() {
        let mut state = UiState::default();
        state.editor.clear();
        state.editor.insert_char('w');
        state.autocomplete = false;
        state.refresh_suggestions(true);
        assert_eq!(state.suggestions, vec!["while", "with"]);
    }

    #[test]
    fn accepting_a_suggestion_rewrites_the_word() {
        let mut state = UiState::default();
        state.editor.clear();
        for c in "pro".chars() {
            state.editor.insert_char(c);
        }
        state.refresh_suggestions(false);
        assert_eq!(state.suggestions, vec!["property"]);
        state.accept_suggestion();
        assert_eq!(state.editor.text(), "property");
        assert!(state.suggestions.is_empty());
    }
}
