//! Current conditions card
//!
//! Renders the hourly record flagged as closest to now: icon, location,
//! date, temperature, condition, visibility, feels-like, humidity and wind,
//! followed by a sparkline of today's hourly temperatures.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::colors;
use super::widgets::TemperatureSparkline;
use crate::data::{Forecast, ForecastLocation, HourlyRecord, Variable};

/// Placeholder for values the forecast did not include
const NOT_AVAILABLE: &str = "N/A";

/// Renders the current conditions card for a loaded forecast
pub fn render(frame: &mut Frame, area: Rect, forecast: &Forecast, location: &ForecastLocation) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(" Now ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(current) = forecast.current_conditions() else {
        let message = Paragraph::new(vec![
            Line::from(Span::styled(
                location.label.clone(),
                Style::default().fg(colors::PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "No hourly data for today",
                Style::default().fg(colors::SECONDARY),
            )),
        ]);
        frame.render_widget(message, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Conditions
            Constraint::Length(2), // Hourly sparkline
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(condition_lines(current, location)), chunks[0]);
    render_hourly_trend(frame, chunks[1], &forecast.hourly);
}

fn condition_lines(current: &HourlyRecord, location: &ForecastLocation) -> Vec<Line<'static>> {
    let record = &current.record;
    let icon = record.weather_code_entry().map(|e| e.icon).unwrap_or("?");

    vec![
        Line::from(vec![
            Span::raw(format!("{}  ", icon)),
            Span::styled(
                location.label.clone(),
                Style::default().fg(colors::PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                record.timestamp.format("%a %d/%m/%Y").to_string(),
                Style::default().fg(colors::SECONDARY),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}°C", format_rounded(record.value(Variable::Temperature2m))),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(record.weather_condition.unwrap_or(NOT_AVAILABLE).to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Visibility"),
            Span::raw(format!("{} km", format_visibility_km(record.value(Variable::Visibility)))),
            Span::styled("  |  ", Style::default().fg(colors::SECONDARY)),
            label("Feels Like"),
            Span::raw(format!("{} °C", format_floor(record.value(Variable::ApparentTemperature)))),
        ]),
        Line::from(vec![
            label("Humidity"),
            Span::raw(format!("{}%", format_rounded(record.value(Variable::RelativeHumidity2m)))),
            Span::styled("  |  ", Style::default().fg(colors::SECONDARY)),
            label("Wind"),
            Span::raw(format!("{} km/h", format_rounded(record.value(Variable::WindSpeed10m)))),
        ]),
    ]
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{}: ", text), Style::default().fg(colors::HEADER))
}

fn render_hourly_trend(frame: &mut Frame, area: Rect, hourly: &[HourlyRecord]) {
    // Hours without a temperature are skipped, so the marker follows the
    // flagged hour's position among the plotted ones.
    let mut temperatures = Vec::with_capacity(hourly.len());
    let mut marker = None;
    for hour in hourly {
        if let Some(t) = hour.record.value(Variable::Temperature2m) {
            if hour.is_closest_time {
                marker = Some(temperatures.len());
            }
            temperatures.push(t);
        }
    }
    if temperatures.is_empty() || area.height == 0 {
        return;
    }

    let caption = Rect { height: 1, ..area };
    frame.render_widget(
        Paragraph::new(Span::styled("Today", Style::default().fg(colors::SECONDARY))),
        caption,
    );

    if area.height < 2 {
        return;
    }
    let line = Rect {
        y: area.y + 1,
        height: 1,
        ..area
    };
    let mut sparkline = TemperatureSparkline::new(&temperatures).style(Style::default().fg(colors::HEADER));
    if let Some(pos) = marker {
        sparkline = sparkline.current_position(pos);
    }
    frame.render_widget(sparkline, line);
}

/// Value rounded to a whole number, or "N/A"
pub fn format_rounded(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Value rounded down to a whole number, or "N/A"
pub fn format_floor(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}", v.floor()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Visibility in metres as whole kilometres, or "N/A"
pub fn format_visibility_km(metres: Option<f64>) -> String {
    format_floor(metres.map(|m| m / 1000.0))
}
