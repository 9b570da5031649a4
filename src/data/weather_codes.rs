//! Static WMO weather code table
//!
//! Maps the integer `weather_code` reported by Open-Meteo to a display label
//! and a terminal icon. The table is read-only; codes missing from it have no
//! label.

use serde::Serialize;

/// A single entry of the weather code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeEntry {
    /// WMO weather interpretation code
    pub code: u8,
    /// Human-readable condition label
    pub label: &'static str,
    /// Icon shown next to the condition
    pub icon: &'static str,
}

const fn entry(code: u8, label: &'static str, icon: &'static str) -> WeatherCodeEntry {
    WeatherCodeEntry { code, label, icon }
}

/// WMO codes as documented at https://open-meteo.com/en/docs#weathervariables
static WEATHER_CODES: [WeatherCodeEntry; 28] = [
    entry(0, "Clear sky", "☀"),
    entry(1, "Mainly clear", "🌤"),
    entry(2, "Partly cloudy", "⛅"),
    entry(3, "Overcast", "☁"),
    entry(45, "Fog", "🌫"),
    entry(48, "Depositing rime fog", "🌫"),
    entry(51, "Light drizzle", "🌦"),
    entry(53, "Moderate drizzle", "🌦"),
    entry(55, "Dense drizzle", "🌦"),
    entry(56, "Light freezing drizzle", "🌧"),
    entry(57, "Dense freezing drizzle", "🌧"),
    entry(61, "Slight rain", "🌧"),
    entry(63, "Moderate rain", "🌧"),
    entry(65, "Heavy rain", "🌧"),
    entry(66, "Light freezing rain", "🌧"),
    entry(67, "Heavy freezing rain", "🌧"),
    entry(71, "Slight snow fall", "🌨"),
    entry(73, "Moderate snow fall", "🌨"),
    entry(75, "Heavy snow fall", "❄"),
    entry(77, "Snow grains", "🌨"),
    entry(80, "Slight rain showers", "🌦"),
    entry(81, "Moderate rain showers", "🌧"),
    entry(82, "Violent rain showers", "⛈"),
    entry(85, "Slight snow showers", "🌨"),
    entry(86, "Heavy snow showers", "❄"),
    entry(95, "Thunderstorm", "⛈"),
    entry(96, "Thunderstorm with slight hail", "⛈"),
    entry(99, "Thunderstorm with heavy hail", "⛈"),
];

/// Looks up a weather code in the table
pub fn lookup_weather_code(code: i64) -> Option<&'static WeatherCodeEntry> {
    WEATHER_CODES.iter().find(|e| i64::from(e.code) == code)
}

/// Looks up a weather code carried as a numeric series value
///
/// Open-Meteo transmits codes as plain numbers; anything that is not a finite
/// whole number has no entry.
pub fn condition_for_value(value: f64) -> Option<&'static WeatherCodeEntry> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    lookup_weather_code(value as i64)
}
