//! Application state management for WSA Weather
//!
//! This module contains the main application state, handling keyboard input,
//! forecast loading, and the transitions of the forecast view.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::StartupConfig;
use crate::data::{Forecast, ForecastLocation, HourlyRecord, WeatherClient, WeatherError};
use crate::fetcher::{FetchMessage, ForecastFetcher};

/// State of the forecast view, replaced wholesale on every transition
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ForecastViewState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the fetch with this request id
    Loading { request_id: u64 },
    /// Forecast reshaped and ready to display
    Ready(Forecast),
    /// The last fetch failed; holds a user-facing reason
    Failed(String),
}

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Forecast,
    Search,
}

/// Main application struct managing state and data
pub struct App {
    /// Current forecast view state
    pub view: ForecastViewState,
    /// Location the forecast is shown for
    pub location: ForecastLocation,
    /// Text typed into the search box
    pub search_query: String,
    /// Current keyboard focus
    pub focus: Focus,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Timestamp of the last successful load
    pub last_refresh: Option<DateTime<Local>>,
    fetcher: ForecastFetcher,
}

impl App {
    /// Creates a new App using the settings from the startup configuration
    pub fn new(config: &StartupConfig) -> Result<Self, WeatherError> {
        Ok(Self::with_client(WeatherClient::new(config.timeout)?))
    }

    /// Creates a new App around an existing weather client
    pub fn with_client(client: WeatherClient) -> Self {
        Self {
            view: ForecastViewState::Idle,
            location: ForecastLocation::default(),
            search_query: String::new(),
            focus: Focus::Forecast,
            show_help: false,
            should_quit: false,
            last_refresh: None,
            fetcher: ForecastFetcher::new(client),
        }
    }

    /// Whether the forecast is being fetched
    pub fn is_loading(&self) -> bool {
        matches!(self.view, ForecastViewState::Loading { .. })
    }

    /// The forecast, once loaded
    pub fn forecast(&self) -> Option<&Forecast> {
        match &self.view {
            ForecastViewState::Ready(forecast) => Some(forecast),
            _ => None,
        }
    }

    /// The hourly record flagged as closest to now
    pub fn current_conditions(&self) -> Option<&HourlyRecord> {
        self.forecast().and_then(Forecast::current_conditions)
    }

    /// Starts fetching the forecast for the current location
    ///
    /// Any fetch still in flight is abandoned.
    pub fn request_forecast(&mut self) {
        let request_id = self.fetcher.start(self.location.clone());
        tracing::info!(request_id, location = %self.location.label, "Forecast requested");
        self.view = ForecastViewState::Loading { request_id };
    }

    /// Switches to `location` and fetches its forecast
    pub fn select_location(&mut self, location: ForecastLocation) {
        self.location = location;
        self.request_forecast();
    }

    /// Applies any finished fetches without blocking
    pub fn poll_fetcher(&mut self) {
        while let Some(message) = self.fetcher.try_recv() {
            self.apply(message);
        }
    }

    /// Waits until the current fetch has finished and been applied
    pub async fn wait_for_forecast(&mut self) {
        while self.is_loading() {
            match self.fetcher.recv().await {
                Some(message) => self.apply(message),
                None => break,
            }
        }
    }

    fn apply(&mut self, message: FetchMessage) {
        let FetchMessage::Completed {
            request_id,
            location,
            result,
        } = message;

        let current = match self.view {
            ForecastViewState::Loading { request_id: pending } => Some(pending),
            _ => None,
        };
        if current != Some(request_id) {
            tracing::debug!(request_id, ?current, "Discarding stale forecast");
            return;
        }

        self.view = match result {
            Ok(forecast) => {
                tracing::info!(
                    request_id,
                    location = %location.label,
                    hourly = forecast.hourly.len(),
                    daily = forecast.daily.len(),
                    "Forecast ready"
                );
                self.last_refresh = Some(Local::now());
                ForecastViewState::Ready(forecast)
            }
            Err(e) => ForecastViewState::Failed(e.to_string()),
        };
    }

    /// Locations matching the search query
    ///
    /// Only the default location is searchable.
    pub fn search_suggestions(&self) -> Vec<ForecastLocation> {
        let query = self.search_query.trim().to_lowercase();
        let default = ForecastLocation::default();
        if query.is_empty() || default.label.to_lowercase().contains(&query) {
            vec![default]
        } else {
            Vec::new()
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `r`: Refetch the forecast
    /// - `/`: Focus the search box
    /// - `?`: Toggle the help overlay
    ///
    /// While the search box has focus, characters edit the query, `Enter`
    /// selects the first suggestion and `Esc` returns focus to the forecast.
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.focus == Focus::Search {
            self.handle_search_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') if !self.is_loading() => {
                self.request_forecast();
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.focus = Focus::Forecast;
            }
            KeyCode::Enter => {
                if let Some(location) = self.search_suggestions().into_iter().next() {
                    self.search_query.clear();
                    self.focus = Focus::Forecast;
                    self.select_location(location);
                }
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
            }
            _ => {}
        }
    }
}
