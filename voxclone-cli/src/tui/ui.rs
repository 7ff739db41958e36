use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tui_textarea::TextArea;
use voxclone_core::types::Mode;

use super::state::{Focus, TuiState};
use super::widgets::{activity_panel, clone_controls, input_area, mode_tabs, notice, status_bar};

pub fn draw_ui(
    frame: &mut Frame,
    state: &TuiState,
    textarea: &TextArea,
    path_input: &TextArea,
) {
    // Input height: textarea lines + 2 for top/bottom borders, min 3, max 12
    let textarea_lines = textarea.lines().len().clamp(1, 10) as u16;
    let input_height = textarea_lines + 2;

    let controls_height = if state.mode() == Mode::Clone { 2 } else { 0 };
    let prompt_height = if state.focus == Focus::VoiceFilePath { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Mode tabs
            Constraint::Length(input_height),    // Text input (dynamic, with borders)
            Constraint::Length(controls_height), // Voice sample + language (clone only)
            Constraint::Length(prompt_height),   // File path prompt
            Constraint::Min(3),                  // Results and activity
            Constraint::Length(1),               // Status bar
        ])
        .split(frame.area());

    mode_tabs::render(frame, chunks[0], state);
    input_area::render(frame, chunks[1], textarea, " Text ");
    if controls_height > 0 {
        clone_controls::render(frame, chunks[2], state);
    }
    if prompt_height > 0 {
        input_area::render(frame, chunks[3], path_input, " Voice sample path ");
    }
    activity_panel::render(frame, chunks[4], state);
    status_bar::render(frame, chunks[5], state);

    if let Some(message) = &state.notice {
        notice::render(frame, message);
    }
}
