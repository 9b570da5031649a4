//! Daily outlook panel
//!
//! One row per forecast day: weekday, condition, temperature range,
//! precipitation, UV index and sunrise/sunset times.

use chrono::NaiveDateTime;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::colors;
use super::current_conditions::format_rounded;
use crate::data::{local_timestamp, Forecast, Variable, WeatherRecord};

/// Renders the daily outlook for a loaded forecast
pub fn render(frame: &mut Frame, area: Rect, forecast: &Forecast) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(" Daily Outlook ");

    let lines: Vec<Line> = if forecast.daily.is_empty() {
        vec![Line::from(Span::styled(
            "No daily forecast available",
            Style::default().fg(colors::SECONDARY),
        ))]
    } else {
        forecast
            .daily
            .values()
            .map(|day| day_line(day, forecast.utc_offset_seconds))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn day_line(day: &WeatherRecord, utc_offset_seconds: i32) -> Line<'static> {
    let icon = day.weather_code_entry().map(|e| e.icon).unwrap_or("?");
    let condition = day.weather_condition.unwrap_or("N/A");

    Line::from(vec![
        Span::styled(
            day.timestamp.format("%a %d/%m").to_string(),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::raw(format!("  {} {:<24}", icon, condition)),
        Span::styled(
            format!(
                "{}°/{}°",
                format_rounded(day.value(Variable::Temperature2mMax)),
                format_rounded(day.value(Variable::Temperature2mMin))
            ),
            Style::default().fg(colors::SELECTED),
        ),
        Span::raw(format!(
            "  {} mm  UV {}",
            day.value(Variable::PrecipitationSum)
                .map(|p| format!("{:.1}", p))
                .unwrap_or_else(|| "N/A".to_string()),
            format_rounded(day.value(Variable::UvIndexMax)),
        )),
        Span::styled(
            format!(
                "  ↑ {}  ↓ {}",
                clock_time(day.value(Variable::Sunrise), utc_offset_seconds),
                clock_time(day.value(Variable::Sunset), utc_offset_seconds)
            ),
            Style::default().fg(colors::SECONDARY),
        ),
    ])
}

/// Formats an epoch-seconds value as `HH:MM` local time at the location
pub fn clock_time(epoch_seconds: Option<f64>, utc_offset_seconds: i32) -> String {
    epoch_seconds
        .filter(|s| s.is_finite())
        .and_then(|s| local_timestamp(s as i64, utc_offset_seconds))
        .map(|t: NaiveDateTime| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
