//! Core data models for the WSA weather widget
//!
//! This module contains the forecast location, the columnar series decoded
//! from Open-Meteo and the per-timestamp records produced by reshaping.

pub mod open_meteo;
pub mod weather_codes;

pub use open_meteo::{local_timestamp, ForecastSeries, WeatherClient, WeatherError};
pub use weather_codes::{condition_for_value, lookup_weather_code, WeatherCodeEntry};

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// The location a forecast is fetched for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastLocation {
    /// Display name
    pub label: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
}

impl Default for ForecastLocation {
    fn default() -> Self {
        Self {
            label: "Mau Aima".to_string(),
            lat: 25.6952,
            lon: 81.9234,
        }
    }
}

/// Forecast variables requested from Open-Meteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Variable {
    WeatherCode,
    Temperature2m,
    Visibility,
    WindDirection10m,
    ApparentTemperature,
    PrecipitationProbability,
    RelativeHumidity2m,
    WindSpeed10m,
    Temperature2mMax,
    Temperature2mMin,
    ApparentTemperatureMax,
    ApparentTemperatureMin,
    Sunset,
    Sunrise,
    UvIndexMax,
    PrecipitationSum,
    WindSpeed10mMax,
    WindDirection10mDominant,
}

impl Variable {
    /// Identifier used by the Open-Meteo API for this variable
    pub fn api_name(self) -> &'static str {
        match self {
            Self::WeatherCode => "weather_code",
            Self::Temperature2m => "temperature_2m",
            Self::Visibility => "visibility",
            Self::WindDirection10m => "wind_direction_10m",
            Self::ApparentTemperature => "apparent_temperature",
            Self::PrecipitationProbability => "precipitation_probability",
            Self::RelativeHumidity2m => "relative_humidity_2m",
            Self::WindSpeed10m => "wind_speed_10m",
            Self::Temperature2mMax => "temperature_2m_max",
            Self::Temperature2mMin => "temperature_2m_min",
            Self::ApparentTemperatureMax => "apparent_temperature_max",
            Self::ApparentTemperatureMin => "apparent_temperature_min",
            Self::Sunset => "sunset",
            Self::Sunrise => "sunrise",
            Self::UvIndexMax => "uv_index_max",
            Self::PrecipitationSum => "precipitation_sum",
            Self::WindSpeed10mMax => "wind_speed_10m_max",
            Self::WindDirection10mDominant => "wind_direction_10m_dominant",
        }
    }
}

/// Hourly variables, in request order
pub const HOURLY_VARIABLES: [Variable; 8] = [
    Variable::Temperature2m,
    Variable::WeatherCode,
    Variable::Visibility,
    Variable::WindDirection10m,
    Variable::ApparentTemperature,
    Variable::PrecipitationProbability,
    Variable::RelativeHumidity2m,
    Variable::WindSpeed10m,
];

/// Daily variables, in request order
pub const DAILY_VARIABLES: [Variable; 11] = [
    Variable::WeatherCode,
    Variable::Temperature2mMax,
    Variable::Temperature2mMin,
    Variable::ApparentTemperatureMax,
    Variable::ApparentTemperatureMin,
    Variable::Sunset,
    Variable::UvIndexMax,
    Variable::PrecipitationSum,
    Variable::WindSpeed10mMax,
    Variable::WindDirection10mDominant,
    Variable::Sunrise,
];

/// Parallel arrays aligned by index to a shared time axis
///
/// `values[v][i]` belongs to `timestamps[i]`. A variable that was not
/// requested or not returned is simply not a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnarSeries {
    pub timestamps: Vec<Option<NaiveDateTime>>,
    pub values: BTreeMap<Variable, Vec<Option<f64>>>,
}

impl ColumnarSeries {
    pub fn new(timestamps: Vec<Option<NaiveDateTime>>) -> Self {
        Self {
            timestamps,
            values: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the column for a variable
    pub fn with_variable(mut self, variable: Variable, column: Vec<Option<f64>>) -> Self {
        self.values.insert(variable, column);
        self
    }

    /// Value of `variable` at `index`, if the column exists and holds one
    pub fn value_at(&self, variable: Variable, index: usize) -> Option<f64> {
        self.values
            .get(&variable)
            .and_then(|column| column.get(index))
            .copied()
            .flatten()
    }

    /// Returns the sub-series restricted to the given variables
    pub fn select(&self, variables: &[Variable]) -> Self {
        let values = variables
            .iter()
            .filter_map(|v| self.values.get(v).map(|column| (*v, column.clone())))
            .collect();
        Self {
            timestamps: self.timestamps.clone(),
            values,
        }
    }
}

/// Forecast values for a single timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    /// Wall-clock time at the forecast location
    pub timestamp: NaiveDateTime,
    /// Variables that had a value at this timestamp
    pub values: BTreeMap<Variable, f64>,
    /// Label derived from the weather code, if the code is known
    pub weather_condition: Option<&'static str>,
}

impl WeatherRecord {
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values.get(&variable).copied()
    }

    /// Weather code table entry for this record
    pub fn weather_code_entry(&self) -> Option<&'static WeatherCodeEntry> {
        self.value(Variable::WeatherCode).and_then(condition_for_value)
    }
}

/// An hourly record for today, flagged when it is the one closest to now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRecord {
    #[serde(flatten)]
    pub record: WeatherRecord,
    pub is_closest_time: bool,
}

/// Reshaped forecast handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Daily records keyed by the start of each day
    pub daily: BTreeMap<NaiveDateTime, WeatherRecord>,
    /// Today's hourly records in chronological order
    pub hourly: Vec<HourlyRecord>,
    /// Offset of the location's time zone from UTC
    pub utc_offset_seconds: i32,
}

impl Forecast {
    /// The hourly record that represents current conditions
    pub fn current_conditions(&self) -> Option<&HourlyRecord> {
        self.hourly.iter().find(|h| h.is_closest_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_default_location_is_mau_aima() {
        let location = ForecastLocation::default();
        assert_eq!(location.label, "Mau Aima");
        assert!((location.lat - 25.6952).abs() < 0.0001);
        assert!((location.lon - 81.9234).abs() < 0.0001);
    }

    #[test]
    fn test_variable_sets_have_no_duplicates() {
        for set in [&HOURLY_VARIABLES[..], &DAILY_VARIABLES[..]] {
            for (i, a) in set.iter().enumerate() {
                assert!(!set[i + 1..].contains(a), "{:?} listed twice", a);
            }
        }
        assert!(HOURLY_VARIABLES.contains(&Variable::WeatherCode));
        assert!(DAILY_VARIABLES.contains(&Variable::WeatherCode));
    }

    #[test]
    fn test_value_at_handles_missing_and_short_columns() {
        let series = ColumnarSeries::new(vec![Some(at(0)), Some(at(1)), Some(at(2))])
            .with_variable(Variable::Temperature2m, vec![Some(20.0), None]);

        assert_eq!(series.value_at(Variable::Temperature2m, 0), Some(20.0));
        assert_eq!(series.value_at(Variable::Temperature2m, 1), None);
        assert_eq!(series.value_at(Variable::Temperature2m, 2), None);
        assert_eq!(series.value_at(Variable::Visibility, 0), None);
    }

    #[test]
    fn test_select_keeps_only_requested_variables() {
        let series = ColumnarSeries::new(vec![Some(at(0))])
            .with_variable(Variable::Temperature2m, vec![Some(20.0)])
            .with_variable(Variable::Sunrise, vec![Some(1.0)]);

        let hourly = series.select(&HOURLY_VARIABLES);
        assert!(hourly.values.contains_key(&Variable::Temperature2m));
        assert!(!hourly.values.contains_key(&Variable::Sunrise));
        assert_eq!(hourly.timestamps, series.timestamps);
    }

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let mut values = BTreeMap::new();
        values.insert(Variable::WeatherCode, 2.0);
        values.insert(Variable::Temperature2m, 21.5);
        let record = HourlyRecord {
            record: WeatherRecord {
                timestamp: at(9),
                values,
                weather_condition: Some("Partly cloudy"),
            },
            is_closest_time: true,
        };

        let json = serde_json::to_value(&record).expect("Failed to serialize HourlyRecord");
        assert_eq!(json["values"]["weatherCode"], 2.0);
        assert_eq!(json["values"]["temperature2m"], 21.5);
        assert_eq!(json["weather_condition"], "Partly cloudy");
        assert_eq!(json["is_closest_time"], true);
    }

    #[test]
    fn test_current_conditions_returns_flagged_hour() {
        let record = |hour| WeatherRecord {
            timestamp: at(hour),
            values: BTreeMap::new(),
            weather_condition: None,
        };
        let forecast = Forecast {
            daily: BTreeMap::new(),
            hourly: vec![
                HourlyRecord { record: record(8), is_closest_time: false },
                HourlyRecord { record: record(9), is_closest_time: true },
            ],
            utc_offset_seconds: 0,
        };

        let current = forecast.current_conditions().expect("one hour is flagged");
        assert_eq!(current.record.timestamp, at(9));
    }
}
