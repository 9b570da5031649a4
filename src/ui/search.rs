//! Search card
//!
//! Renders the city search input and its suggestions.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::colors;
use crate::app::{App, Focus};

/// Renders the search card
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Search;
    let border = if focused { colors::SELECTED } else { colors::HEADER };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Search ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input box
            Constraint::Min(0),    // Suggestions
        ])
        .split(inner);

    let input_text = if app.search_query.is_empty() && !focused {
        Span::styled("Search-city", Style::default().fg(colors::SECONDARY))
    } else if focused {
        Span::raw(format!("{}_", app.search_query))
    } else {
        Span::raw(app.search_query.clone())
    };
    let input = Paragraph::new(Line::from(vec![Span::raw("⌕ "), input_text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, chunks[0]);

    let suggestions = app.search_suggestions();
    let lines: Vec<Line> = if suggestions.is_empty() {
        vec![Line::from(Span::styled(
            "No matching places",
            Style::default().fg(colors::SECONDARY),
        ))]
    } else {
        suggestions
            .iter()
            .enumerate()
            .map(|(i, location)| {
                let style = if focused && i == 0 {
                    Style::default().fg(colors::SELECTED).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors::PRIMARY)
                };
                Line::from(Span::styled(format!(" {}", location.label), style))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), chunks[1]);
}
