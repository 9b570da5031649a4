//! UI rendering module for WSA Weather
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod current_conditions;
pub mod daily_outlook;
pub mod help_overlay;
pub mod search;
pub mod widgets;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ForecastViewState};

/// Palette shared by every panel
pub mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Cyan;
    pub const PRIMARY: Color = Color::White;
    pub const SECONDARY: Color = Color::Gray;
    pub const SELECTED: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Height of the row holding the current conditions and search cards
const TOP_ROW_HEIGHT: u16 = 14;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Body
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0]);

    match &app.view {
        ForecastViewState::Idle | ForecastViewState::Loading { .. } => {
            render_loading(frame, chunks[1]);
        }
        ForecastViewState::Ready(forecast) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(TOP_ROW_HEIGHT), Constraint::Min(3)])
                .split(chunks[1]);
            let top = split_top_row(rows[0]);

            current_conditions::render(frame, top[0], forecast, &app.location);
            search::render(frame, top[1], app);
            daily_outlook::render(frame, rows[1], forecast);
        }
        ForecastViewState::Failed(reason) => {
            let top = split_top_row(chunks[1]);
            render_error(frame, top[0], reason);
            search::render(frame, top[1], app);
        }
    }

    render_footer(frame, chunks[2], app);

    if app.show_help {
        help_overlay::render(frame);
    }
}

fn split_top_row(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area)
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "WSA · WEATHER",
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

/// Renders a loading message while the forecast is being fetched
fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading forecast...")
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_error(frame: &mut Frame, area: Rect, reason: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ERROR))
        .title(" Now ");

    let lines = vec![
        Line::from(Span::styled(
            "Unable to load forecast",
            Style::default()
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(reason.to_string())),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", Style::default().fg(colors::SELECTED)),
            Span::raw(" to retry"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut help_spans = vec![
        Span::styled("r", Style::default().fg(colors::SELECTED)),
        Span::raw(" Refresh  "),
        Span::styled("/", Style::default().fg(colors::SELECTED)),
        Span::raw(" Search  "),
        Span::styled("?", Style::default().fg(colors::SELECTED)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(colors::SELECTED)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            " │ Updated: just now".to_string()
        } else if mins_ago < 60 {
            format!(" │ Updated: {}m ago", mins_ago)
        } else {
            format!(" │ Updated: {}h ago", elapsed.num_hours())
        };
        help_spans.push(Span::raw(freshness_text));
    }

    let lines = vec![
        Line::from(help_spans),
        Line::from("© 2025 WSA. All Rights reserved"),
    ];
    let paragraph = Paragraph::new(lines).style(Style::default().fg(colors::SECONDARY));

    frame.render_widget(paragraph, area);
}
