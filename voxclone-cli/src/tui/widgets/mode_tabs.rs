use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use voxclone_core::types::Mode;

use crate::tui::state::TuiState;

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let mut spans: Vec<Span<'static>> = vec![Span::raw(" ")];

    for mode in [Mode::Basic, Mode::Clone] {
        let style = if mode == state.mode() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.title()), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        "F2 switch",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
