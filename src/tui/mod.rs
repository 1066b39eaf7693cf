mod help;
mod state;

use crate::api::parse_share_id;
use crate::cli::{build_config, Cli};
use crate::model::{ServerHealth, SessionEvent};
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use state::{UiState, OUTPUT_PLACEHOLDER};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels: command and event volumes are keystroke-scale.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let cfg = build_config(&args);
    let initial_snippet = match args.open.as_deref() {
        Some(input) => Some(
            parse_share_id(input)
                .with_context(|| format!("'{input}' is not a share id or share URL"))?,
        ),
        None => None,
    };

    // TUI runs in a dedicated thread to keep blocking terminal I/O out of the
    // Tokio runtime.
    let ui_args = args.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_args, event_rx, cmd_tx));

    let res = orchestrator::run_controller(&cfg, initial_snippet, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    args: Cli,
    mut event_rx: UnboundedReceiver<SessionEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState {
        autocomplete: !args.no_autocomplete,
        ..Default::default()
    };
    // The selector guard applies to the flag too.
    if args.language.is_supported() {
        state.language = args.language;
    } else {
        state.info = format!("Sorry, {} is not supported yet.", args.language);
    }

    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep typing responsive.
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if state.show_help {
                    state.show_help = false;
                    continue;
                }
                if k.modifiers.contains(KeyModifiers::CONTROL) {
                    match k.code {
                        KeyCode::Char('q') | KeyCode::Char('c') => {
                            let _ = cmd_tx.send(UiCommand::Quit);
                            break Ok(());
                        }
                        KeyCode::Char('r') => {
                            if state.running {
                                state.info = "A run is already in flight…".into();
                            } else if state.health != ServerHealth::Reachable {
                                state.info = "Cannot connect to server".into();
                            } else {
                                // Empty-code validation happens before any
                                // request is issued; the result comes back as
                                // a terminal event either way.
                                let _ = cmd_tx.send(UiCommand::Run {
                                    code: state.editor.text(),
                                    language: state.language,
                                });
                            }
                        }
                        KeyCode::Char('s') => {
                            let _ = cmd_tx.send(UiCommand::Share {
                                code: state.editor.text(),
                                language: state.language,
                            });
                        }
                        KeyCode::Char('y') => match state.share_url.as_deref() {
                            Some(url) => match copy_to_clipboard(url) {
                                Ok(()) => state.info = "URL copied!".into(),
                                Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
                            },
                            None => {
                                state.info = "No share URL yet. Share first (Ctrl-S)".into();
                            }
                        },
                        KeyCode::Char('l') => {
                            state.editor.clear();
                            state.output = OUTPUT_PLACEHOLDER.to_string();
                            state.dismiss_suggestions();
                        }
                        KeyCode::Char('g') => state.cycle_language(),
                        KeyCode::Char('t') => state.toggle_autocomplete(),
                        KeyCode::Char(' ') => state.refresh_suggestions(true),
                        _ => {}
                    }
                    continue;
                }
                match k.code {
                    KeyCode::F(1) => state.show_help = true,
                    KeyCode::Esc => state.dismiss_suggestions(),
                    KeyCode::Enter => {
                        // Control key: edits, never triggers suggestions.
                        state.editor.insert_newline();
                        state.dismiss_suggestions();
                    }
                    KeyCode::Tab => {
                        if state.suggestions.is_empty() {
                            state.editor.insert_indent();
                        } else {
                            state.accept_suggestion();
                        }
                    }
                    KeyCode::Backspace => {
                        state.editor.backspace();
                        state.refresh_suggestions(false);
                    }
                    KeyCode::Up => {
                        if state.suggestions.is_empty() {
                            state.editor.move_up();
                        } else {
                            state.select_prev_suggestion();
                        }
                    }
                    KeyCode::Down => {
                        if state.suggestions.is_empty() {
                            state.editor.move_down();
                        } else {
                            state.select_next_suggestion();
                        }
                    }
                    KeyCode::Left => {
                        state.editor.move_left();
                        state.dismiss_suggestions();
                    }
                    KeyCode::Right => {
                        state.editor.move_right();
                        state.dismiss_suggestions();
                    }
                    KeyCode::Home => state.editor.move_line_start(),
                    KeyCode::End => state.editor.move_line_end(),
                    KeyCode::Char(c) => {
                        state.editor.insert_char(c);
                        state.refresh_suggestions(false);
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("write clipboard")?;
    Ok(())
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(2),
        ])
        .split(area);

    draw_status_bar(chunks[0], f, state);

    if state.show_help {
        help::draw_help(chunks[1], f);
    } else {
        let editor_area = if state.suggestions.is_empty() {
            chunks[1]
        } else {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(20), Constraint::Length(26)])
                .split(chunks[1]);
            draw_suggestions(split[1], f, state);
            split[0]
        };
        draw_editor(editor_area, f, state);
    }

    let output = Paragraph::new(state.output.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Output"));
    f.render_widget(output, chunks[2]);

    draw_footer(chunks[3], f, state);
}

fn draw_status_bar(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let (dot, text, color) = match state.health {
        ServerHealth::Reachable => ("●", "Online", Color::Green),
        ServerHealth::Unreachable => ("●", "Cannot connect to server", Color::Red),
    };
    let mut spans = vec![
        Span::styled(format!(" {dot} "), Style::default().fg(color)),
        Span::styled(text, Style::default().fg(color)),
        Span::raw("  │  lang: "),
        Span::raw(state.language.tag()),
        Span::raw("  │  autocomplete: "),
        Span::raw(if state.autocomplete { "on" } else { "off" }),
    ];
    if state.running {
        spans.push(Span::styled(
            "  │  Running…",
            Style::default().fg(Color::Yellow),
        ));
    } else if state.run_allowed() {
        spans.push(Span::styled(
            "  │  Ctrl-R runs, F1 for help",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            "  │  run disabled",
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_editor(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    // Nothing fits inside the borders on a degenerate terminal.
    if area.height < 2 || area.width < 2 {
        return;
    }
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = state
        .editor
        .row
        .saturating_sub(inner_height.saturating_sub(1).max(1)) as u16;

    let lines: Vec<Line> = state
        .editor
        .lines()
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();
    let p = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Editor ({})", state.language.tag())),
    );
    f.render_widget(p, area);

    let cursor_y = area.y + 1 + (state.editor.row as u16).saturating_sub(scroll);
    let cursor_x = area.x + 1 + state.editor.col as u16;
    if cursor_y < area.y + area.height - 1 && cursor_x < area.x + area.width - 1 {
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

fn draw_suggestions(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let visible = area.height.saturating_sub(2) as usize;
    let top = state
        .suggestion_selected
        .saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = state
        .suggestions
        .iter()
        .enumerate()
        .skip(top)
        .take(visible.max(1))
        .map(|(i, s)| {
            if i == state.suggestion_selected {
                Line::from(Span::styled(
                    format!("▸ {s}"),
                    Style::default().fg(Color::Cyan),
                ))
            } else {
                Line::from(format!("  {s}"))
            }
        })
        .collect();
    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Suggestions (Tab)"),
    );
    f.render_widget(p, area);
}

fn draw_footer(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let share = match state.share_url.as_deref() {
        Some(url) => Line::from(vec![
            Span::styled("Share URL: ", Style::default().fg(Color::Gray)),
            Span::raw(url),
            Span::styled("  (Ctrl-Y copies)", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            "Share URL: —",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let info = Line::from(Span::styled(
        state.info.as_str(),
        Style::default().fg(Color::Gray),
    ));
    f.render_widget(Paragraph::new(vec![share, info]), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn draw_survives_tiny_terminals() {
        for (w, h) in [(1, 1), (2, 2), (5, 3), (12, 6), (80, 24)] {
            let backend = TestBackend::new(w, h);
            let mut terminal = Terminal::new(backend).unwrap();
            let mut state = UiState::default();
            terminal.draw(|f| draw(f.area(), f, &state)).unwrap();

            // With the suggestions pane open as well.
            state.refresh_suggestions(true);
            assert!(!state.suggestions.is_empty());
            terminal.draw(|f| draw(f.area(), f, &state)).unwrap();

            state.show_help = true;
            terminal.draw(|f| draw(f.area(), f, &state)).unwrap();
        }
    }
}
