use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::state::TuiState;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let form = state.form();
    let status = if form.is_loading() {
        let spinner = SPINNER_CHARS[state.spinner_frame % SPINNER_CHARS.len()];
        let text = match state.mode() {
            voxclone_core::types::Mode::Basic => "Generating speech...",
            voxclone_core::types::Mode::Clone => "Cloning voice...",
        };
        format!("{spinner} {text}")
    } else if form.any_loading() {
        "Working in the other mode...".to_string()
    } else {
        "Ready".to_string()
    };

    let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));
    let model = state
        .model_summary
        .clone()
        .unwrap_or_else(|| "checking service...".to_string());

    let parts: Vec<Span<'static>> = vec![
        Span::styled(" ", Style::default()),
        Span::styled(state.service_name.clone(), Style::default().fg(Color::Yellow)),
        sep.clone(),
        Span::styled(model, Style::default().fg(Color::Cyan)),
        sep,
        Span::styled(status, Style::default().fg(Color::Green)),
    ];

    let bar = Paragraph::new(Line::from(parts))
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    frame.render_widget(bar, area);
}
