use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;
use voxclone_core::form::FormAction;
use voxclone_core::types::Mode;

use super::state::{Focus, TuiState};

#[derive(Debug, PartialEq, Eq)]
pub enum TuiAction {
    /// Submit the active mode.
    Submit,
    /// Load the voice sample at the given path.
    PickVoiceFile(String),
    /// Play the active mode's result.
    Play,
    /// Save the active mode's result to the download directory.
    Save,
    /// Quit the application.
    Quit,
    /// No action needed.
    None,
}

pub fn handle_key_event(
    key: KeyEvent,
    textarea: &mut TextArea<'static>,
    path_input: &mut TextArea<'static>,
    state: &mut TuiState,
) -> TuiAction {
    if state.notice.take().is_some() {
        return TuiAction::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) | (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => {
            TuiAction::Quit
        }
        _ => match state.focus {
            Focus::Text => handle_form_key(key, textarea, path_input, state),
            Focus::VoiceFilePath => handle_path_key(key, path_input, state),
        },
    }
}

fn handle_form_key(
    key: KeyEvent,
    textarea: &mut TextArea<'static>,
    path_input: &mut TextArea<'static>,
    state: &mut TuiState,
) -> TuiAction {
    let loading = state.form().is_loading();

    match (key.code, key.modifiers) {
        // Enter without modifier: submit, unless the active mode is busy
        (KeyCode::Enter, KeyModifiers::NONE) => {
            if loading {
                TuiAction::None
            } else {
                TuiAction::Submit
            }
        }

        // Shift+Enter or Alt+Enter: insert newline
        (KeyCode::Enter, m)
            if m.contains(KeyModifiers::SHIFT) || m.contains(KeyModifiers::ALT) =>
        {
            if !loading {
                textarea.insert_newline();
                sync_text(textarea, state);
            }
            TuiAction::None
        }

        (KeyCode::F(2), _) => {
            toggle_mode(state);
            TuiAction::None
        }
        (KeyCode::Char('t'), m) if m.contains(KeyModifiers::CONTROL) => {
            toggle_mode(state);
            TuiAction::None
        }

        (KeyCode::F(3), m) if m.contains(KeyModifiers::SHIFT) => {
            cycle_language(state, false);
            TuiAction::None
        }
        (KeyCode::F(3), _) => {
            cycle_language(state, true);
            TuiAction::None
        }
        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
            cycle_language(state, true);
            TuiAction::None
        }

        (KeyCode::Char('o'), m) if m.contains(KeyModifiers::CONTROL) => {
            if state.mode() == Mode::Clone && !loading {
                *path_input = TextArea::default();
                configure_path_input(path_input);
                state.focus = Focus::VoiceFilePath;
            }
            TuiAction::None
        }

        (KeyCode::Char('p'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Play,
        (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Save,

        // All other keys: forward to textarea, which is read-only while loading
        _ => {
            if !loading && textarea.input(key) {
                sync_text(textarea, state);
            }
            TuiAction::None
        }
    }
}

fn handle_path_key(
    key: KeyEvent,
    path_input: &mut TextArea<'static>,
    state: &mut TuiState,
) -> TuiAction {
    match key.code {
        KeyCode::Enter => {
            state.focus = Focus::Text;
            let path = path_input.lines().join("");
            *path_input = TextArea::default();
            configure_path_input(path_input);
            if path.trim().is_empty() {
                TuiAction::None
            } else {
                TuiAction::PickVoiceFile(path.trim().to_string())
            }
        }
        KeyCode::Esc => {
            state.focus = Focus::Text;
            *path_input = TextArea::default();
            configure_path_input(path_input);
            TuiAction::None
        }
        _ => {
            path_input.input(key);
            TuiAction::None
        }
    }
}

fn sync_text(textarea: &TextArea, state: &mut TuiState) {
    state.dispatch(FormAction::EditText(textarea.lines().join("\n")));
}

fn toggle_mode(state: &mut TuiState) {
    let next = state.mode().toggle();
    state.dispatch(FormAction::SwitchMode(next));
}

fn cycle_language(state: &mut TuiState, forward: bool) {
    if state.mode() != Mode::Clone || state.form().is_loading() {
        return;
    }
    let current = state.form().language();
    let next = if forward { current.next() } else { current.prev() };
    state.dispatch(FormAction::SelectLanguage(next));
}

pub fn configure_textarea(textarea: &mut TextArea) {
    textarea.set_placeholder_text("Type the text to speak... (Enter to generate, Shift+Enter for new line)");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_style(ratatui::style::Style::default().fg(ratatui::style::Color::White));
}

pub fn configure_path_input(textarea: &mut TextArea) {
    textarea.set_placeholder_text("Path to an audio file (Enter to load, Esc to cancel)");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
}
