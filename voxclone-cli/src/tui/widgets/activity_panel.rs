use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use voxclone_core::types::Mode;

use super::clone_controls::format_size;
use crate::tui::state::{ActivityEntry, TuiState};

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", state.mode().title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line<'static>> = Vec::new();
    render_result(&mut lines, state);
    lines.push(Line::from(""));

    for entry in &state.activity {
        render_entry(&mut lines, entry);
    }

    // Pin the newest entries to the bottom of the panel
    let total_wrapped = compute_wrapped_line_count(&lines, inner.width);
    let scroll_from_top = total_wrapped.saturating_sub(inner.height);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll_from_top, 0));

    frame.render_widget(paragraph, inner);
}

fn render_result(lines: &mut Vec<Line<'static>>, state: &TuiState) {
    let slot = state.form().active_slot();
    let label = Style::default().fg(Color::DarkGray);

    if slot.loading {
        let text = match state.mode() {
            Mode::Basic => "Generating speech...",
            Mode::Clone => "Cloning voice...",
        };
        lines.push(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &slot.error {
        lines.push(Line::from(vec![
            Span::styled(
                "Error: ".to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ]));
    } else if let Some(handle) = &slot.result {
        lines.push(Line::from(vec![
            Span::styled("Result: ".to_string(), label),
            Span::styled(
                handle.suggested_name(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", format_size(handle.len())), label),
        ]));
        lines.push(Line::from(vec![
            Span::styled("File:   ".to_string(), label),
            Span::raw(handle.path().display().to_string()),
        ]));
        lines.push(Line::from(Span::styled(
            "Ctrl+P play  Ctrl+W save".to_string(),
            label,
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No audio yet. Type some text and press Enter.".to_string(),
            label,
        )));
    }
}

fn render_entry(lines: &mut Vec<Line<'static>>, entry: &ActivityEntry) {
    let (marker, color, content) = match entry {
        ActivityEntry::Info { content } => ("·", Color::DarkGray, content),
        ActivityEntry::Success { content } => ("✓", Color::Green, content),
        ActivityEntry::Error { content } => ("✗", Color::Red, content),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{marker} "), Style::default().fg(color)),
        Span::raw(content.clone()),
    ]));
}

/// Compute the number of visual lines after word wrapping.
fn compute_wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let w = width as usize;
    lines.iter().fold(0u16, |count, line| {
        let wrapped = line.width().div_ceil(w).max(1) as u16;
        count.saturating_add(wrapped)
    })
}
