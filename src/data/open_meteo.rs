//! Open-Meteo forecast API client
//!
//! This module fetches the hourly and daily forecast series from the Open-Meteo
//! API and decodes them into [`ColumnarSeries`] values. Decoding is tolerant:
//! null or non-numeric cells become absent values and a missing block becomes
//! an empty series.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{ColumnarSeries, ForecastLocation, Variable, DAILY_VARIABLES, HOURLY_VARIABLES};

/// Base URL for the Open-Meteo API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request did not complete within the configured timeout
    #[error("Forecast request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Forecast API returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Decoded forecast response, still in columnar form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    pub hourly: ColumnarSeries,
    pub daily: ColumnarSeries,
    /// Offset of the location's time zone from UTC
    pub utc_offset_seconds: i32,
}

/// Client for fetching forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl WeatherClient {
    /// Create a new WeatherClient whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: OPEN_METEO_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Point the client at a different forecast endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the hourly and daily forecast series for a location
    ///
    /// # Returns
    /// * `Ok(ForecastSeries)` - Columnar hourly and daily data
    /// * `Err(WeatherError)` - If the request fails, times out, returns a
    ///   non-success status, or the body is not valid JSON
    pub async fn fetch_forecast(
        &self,
        location: &ForecastLocation,
    ) -> Result<ForecastSeries, WeatherError> {
        tracing::info!(
            location = %location.label,
            lat = location.lat,
            lon = location.lon,
            "Fetching forecast"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&forecast_query(location))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Forecast request rejected");
            return Err(WeatherError::Status(status));
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        let series = parse_response(&text)?;

        tracing::debug!(
            hourly = series.hourly.timestamps.len(),
            daily = series.daily.timestamps.len(),
            utc_offset_seconds = series.utc_offset_seconds,
            "Forecast decoded"
        );
        Ok(series)
    }

    fn classify(&self, error: reqwest::Error) -> WeatherError {
        if error.is_timeout() {
            WeatherError::Timeout(self.timeout)
        } else {
            WeatherError::RequestFailed(error)
        }
    }
}

/// Query parameters for a forecast request
fn forecast_query(location: &ForecastLocation) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.lat.to_string()),
        ("longitude", location.lon.to_string()),
        ("hourly", join_api_names(&HOURLY_VARIABLES)),
        ("daily", join_api_names(&DAILY_VARIABLES)),
        ("timezone", "auto".to_string()),
        ("timeformat", "unixtime".to_string()),
    ]
}

fn join_api_names(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(|v| v.api_name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse an Open-Meteo JSON body into hourly and daily series
fn parse_response(body: &str) -> Result<ForecastSeries, WeatherError> {
    let response: OpenMeteoResponse = serde_json::from_str(body)?;
    let offset = response.utc_offset_seconds;

    Ok(ForecastSeries {
        hourly: response
            .hourly
            .map(|block| block.into_series(&HOURLY_VARIABLES, offset))
            .unwrap_or_default(),
        daily: response
            .daily
            .map(|block| block.into_series(&DAILY_VARIABLES, offset))
            .unwrap_or_default(),
        utc_offset_seconds: offset,
    })
}

/// Convert an epoch timestamp to wall-clock time at the given UTC offset
pub fn local_timestamp(epoch_seconds: i64, utc_offset_seconds: i32) -> Option<NaiveDateTime> {
    let shifted = epoch_seconds.checked_add(i64::from(utc_offset_seconds))?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    hourly: Option<SeriesBlock>,
    daily: Option<SeriesBlock>,
}

/// One `hourly` or `daily` block: a time column plus one column per variable
#[derive(Debug, Deserialize)]
struct SeriesBlock {
    #[serde(default)]
    time: Vec<Option<i64>>,
    #[serde(flatten)]
    columns: HashMap<String, Value>,
}

impl SeriesBlock {
    fn into_series(mut self, variables: &[Variable], utc_offset_seconds: i32) -> ColumnarSeries {
        let timestamps = self
            .time
            .iter()
            .map(|t| t.and_then(|t| local_timestamp(t, utc_offset_seconds)))
            .collect();

        let mut series = ColumnarSeries::new(timestamps);
        for variable in variables {
            match self.columns.remove(variable.api_name()) {
                Some(Value::Array(cells)) => {
                    let column = cells.iter().map(Value::as_f64).collect();
                    series = series.with_variable(*variable, column);
                }
                Some(other) => {
                    tracing::debug!(variable = variable.api_name(), value = %other, "Ignoring non-array column");
                }
                None => {
                    tracing::debug!(variable = variable.api_name(), "Variable missing from response");
                }
            }
        }
        series
    }
}
