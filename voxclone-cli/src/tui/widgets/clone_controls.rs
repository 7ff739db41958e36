use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::state::TuiState;

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let label = Style::default().fg(Color::DarkGray);
    let hint = Style::default().fg(Color::DarkGray);

    let sample = match state.form().voice_sample() {
        Some(file) => Span::styled(
            format!(
                "{} ({}, {})",
                file.file_name(),
                file.media_type(),
                format_size(file.len())
            ),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("none selected".to_string(), Style::default().fg(Color::Yellow)),
    };

    let language = state.form().language();
    let lines = vec![
        Line::from(vec![
            Span::styled(" Voice sample: ", label),
            sample,
            Span::styled("  Ctrl+O pick", hint),
        ]),
        Line::from(vec![
            Span::styled(" Language:     ", label),
            Span::styled(
                format!("{} ({})", language.display_name(), language.as_code()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("  F3 next / Shift+F3 previous", hint),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

pub fn format_size(bytes: usize) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} B")
    }
}
