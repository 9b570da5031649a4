//! WSA Weather - current conditions and daily outlook in the terminal
//!
//! A terminal UI application that fetches the Open-Meteo forecast for a
//! location and shows the current conditions and the coming days.

use std::io::{self, Write};
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use wsaweather::app::{App, ForecastViewState};
use wsaweather::cli::{Cli, OutputMode, StartupConfig};
use wsaweather::data::{Forecast, ForecastLocation, Variable};
use wsaweather::logging;
use wsaweather::ui;
use wsaweather::ui::current_conditions::{format_floor, format_rounded, format_visibility_km};
use wsaweather::ui::daily_outlook::clock_time;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;

    if let Err(e) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match config.output {
        OutputMode::Interactive => run_interactive(&config).await,
        OutputMode::Text | OutputMode::Json => run_once(&config).await,
    }
}

/// Fetches the forecast once and prints it to stdout
async fn run_once(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;
    app.request_forecast();
    app.wait_for_forecast().await;

    let forecast = match &app.view {
        ForecastViewState::Ready(forecast) => forecast,
        ForecastViewState::Failed(reason) => {
            return Err(format!("Unable to load forecast: {}", reason).into())
        }
        _ => return Err("Forecast fetch ended without a result".into()),
    };

    let mut stdout = io::stdout().lock();
    if config.output == OutputMode::Json {
        serde_json::to_writer_pretty(&mut stdout, forecast)?;
        writeln!(stdout)?;
    } else {
        write_summary(&mut stdout, forecast, &app.location)?;
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    forecast: &Forecast,
    location: &ForecastLocation,
) -> io::Result<()> {
    match forecast.current_conditions() {
        Some(current) => {
            let record = &current.record;
            writeln!(
                out,
                "{}  {}",
                location.label,
                record.timestamp.format("%a %d/%m/%Y %H:%M")
            )?;
            writeln!(
                out,
                "{}°C  {}",
                format_rounded(record.value(Variable::Temperature2m)),
                record.weather_condition.unwrap_or("N/A")
            )?;
            writeln!(
                out,
                "Feels like {} °C | Humidity {}% | Wind {} km/h | Visibility {} km",
                format_floor(record.value(Variable::ApparentTemperature)),
                format_rounded(record.value(Variable::RelativeHumidity2m)),
                format_rounded(record.value(Variable::WindSpeed10m)),
                format_visibility_km(record.value(Variable::Visibility))
            )?;
        }
        None => writeln!(out, "{}  No hourly data for today", location.label)?,
    }

    writeln!(out)?;
    for day in forecast.daily.values() {
        writeln!(
            out,
            "{}  {:<24} {}°/{}°  sunrise {}  sunset {}",
            day.timestamp.format("%a %d/%m"),
            day.weather_condition.unwrap_or("N/A"),
            format_rounded(day.value(Variable::Temperature2mMax)),
            format_rounded(day.value(Variable::Temperature2mMin)),
            clock_time(day.value(Variable::Sunrise), forecast.utc_offset_seconds),
            clock_time(day.value(Variable::Sunset), forecast.utc_offset_seconds)
        )?;
    }
    Ok(())
}

async fn run_interactive(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.request_forecast();

    // Main event loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| ui::render(f, &app)) {
            break Err(e);
        }

        // Poll for keyboard events with 100ms timeout
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.poll_fetcher();

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    tracing::info!("Exiting");
    result.map_err(Into::into)
}
