use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &str, pad: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw(pad.to_string()),
        Span::raw(desc.to_string()),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Actions:"),
        key_line("Ctrl-R", "      ", "Run the editor contents"),
        key_line("Ctrl-S", "      ", "Share and get a URL"),
        key_line("Ctrl-Y", "      ", "Copy the share URL to the clipboard"),
        key_line("Ctrl-L", "      ", "Clear editor and output"),
        key_line("Ctrl-G", "      ", "Cycle language selector"),
        Line::from(""),
        Line::from("Autocomplete:"),
        key_line("Ctrl-Space", "  ", "Suggest completions at the cursor"),
        key_line("Ctrl-T", "      ", "Toggle automatic suggestions"),
        key_line("Tab", "         ", "Accept the selected suggestion"),
        key_line("Up/Down", "     ", "Pick a suggestion (while the list is open)"),
        key_line("Esc", "         ", "Dismiss suggestions"),
        Line::from(""),
        Line::from("Other:"),
        key_line("F1", "          ", "Show/hide this help"),
        key_line("Ctrl-Q", "      ", "Quit"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
