//! Forecast reshaping
//!
//! Turns the columnar series returned by Open-Meteo into per-timestamp
//! [`WeatherRecord`]s, narrows the hourly records down to today and flags the
//! hour closest to the evaluation instant.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Utc};

use crate::data::{
    condition_for_value, ColumnarSeries, Forecast, ForecastSeries, HourlyRecord, Variable,
    WeatherRecord, DAILY_VARIABLES, HOURLY_VARIABLES,
};

/// Converts a columnar series into records keyed by timestamp
///
/// Returns an empty map when the series has no timestamps or no weather code
/// column. Indices without a timestamp are skipped; variables without a value
/// at an index are left out of that record. If two indices share a timestamp
/// the later one wins.
pub fn records_from_columns(series: &ColumnarSeries) -> BTreeMap<NaiveDateTime, WeatherRecord> {
    let mut records = BTreeMap::new();
    if series.timestamps.is_empty() || !series.values.contains_key(&Variable::WeatherCode) {
        return records;
    }

    for (index, timestamp) in series.timestamps.iter().enumerate() {
        let Some(timestamp) = *timestamp else {
            continue;
        };

        let values: BTreeMap<Variable, f64> = series
            .values
            .keys()
            .filter_map(|variable| {
                series
                    .value_at(*variable, index)
                    .map(|value| (*variable, value))
            })
            .collect();

        let weather_condition = values
            .get(&Variable::WeatherCode)
            .and_then(|code| condition_for_value(*code))
            .map(|entry| entry.label);

        records.insert(
            timestamp,
            WeatherRecord {
                timestamp,
                values,
                weather_condition,
            },
        );
    }

    records
}

/// Keeps the records falling on `now`'s calendar day and flags the closest one
///
/// Output is in chronological order. Exactly one record is flagged when the
/// output is non-empty; on a tie the earlier record wins. No records for today
/// yields an empty vector.
pub fn flag_closest_today(
    records: &BTreeMap<NaiveDateTime, WeatherRecord>,
    now: NaiveDateTime,
) -> Vec<HourlyRecord> {
    let today = now.date();
    let todays: Vec<&WeatherRecord> = records
        .values()
        .filter(|record| record.timestamp.date() == today)
        .collect();

    let mut closest: Option<(usize, i64)> = None;
    for (index, record) in todays.iter().enumerate() {
        let distance = (now - record.timestamp).num_milliseconds().abs();
        match closest {
            Some((_, best)) if best <= distance => {}
            _ => closest = Some((index, distance)),
        }
    }

    todays
        .into_iter()
        .enumerate()
        .map(|(index, record)| HourlyRecord {
            record: record.clone(),
            is_closest_time: closest.map(|(i, _)| i) == Some(index),
        })
        .collect()
}

/// Reshapes one decoded response into the daily and hourly views
pub fn reshape_forecast(series: &ForecastSeries, now: NaiveDateTime) -> Forecast {
    let daily = records_from_columns(&series.daily.select(&DAILY_VARIABLES));
    let hourly_records = records_from_columns(&series.hourly.select(&HOURLY_VARIABLES));
    let hourly = flag_closest_today(&hourly_records, now);

    if hourly.is_empty() {
        tracing::warn!(
            hourly_records = hourly_records.len(),
            %now,
            "No hourly records for today"
        );
    }
    tracing::debug!(daily = daily.len(), hourly = hourly.len(), "Forecast reshaped");

    Forecast {
        daily,
        hourly,
        utc_offset_seconds: series.utc_offset_seconds,
    }
}

/// Current wall-clock time at a location with the given UTC offset
pub fn location_now(utc_offset_seconds: i32) -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::seconds(i64::from(utc_offset_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn hourly_series(hours: &[(u32, u32)]) -> ColumnarSeries {
        let timestamps = hours.iter().map(|(d, h)| Some(at(*d, *h, 0))).collect();
        let codes = hours.iter().map(|_| Some(0.0)).collect();
        ColumnarSeries::new(timestamps).with_variable(Variable::WeatherCode, codes)
    }

    fn flagged(records: &[HourlyRecord]) -> Vec<NaiveDateTime> {
        records
            .iter()
            .filter(|r| r.is_closest_time)
            .map(|r| r.record.timestamp)
            .collect()
    }

    #[test]
    fn test_known_code_gets_label_and_missing_value_is_omitted() {
        let (t0, t1) = (at(14, 0, 0), at(14, 1, 0));
        let series = ColumnarSeries::new(vec![Some(t0), Some(t1)])
            .with_variable(Variable::WeatherCode, vec![Some(2.0), None]);

        let records = records_from_columns(&series);

        assert_eq!(records.len(), 2);
        assert_eq!(records[&t0].weather_condition, Some("Partly cloudy"));
        assert_eq!(records[&t0].value(Variable::WeatherCode), Some(2.0));
        assert!(records[&t1].value(Variable::WeatherCode).is_none());
        assert!(records[&t1].weather_condition.is_none());
    }

    #[test]
    fn test_unknown_code_has_no_condition() {
        let t0 = at(14, 0, 0);
        let series = ColumnarSeries::new(vec![Some(t0)])
            .with_variable(Variable::WeatherCode, vec![Some(42.0)]);

        let records = records_from_columns(&series);

        assert_eq!(records[&t0].value(Variable::WeatherCode), Some(42.0));
        assert!(records[&t0].weather_condition.is_none());
    }

    #[test]
    fn test_record_count_matches_defined_timestamps() {
        let series = ColumnarSeries::new(vec![Some(at(14, 0, 0)), None, Some(at(14, 2, 0))])
            .with_variable(Variable::WeatherCode, vec![Some(0.0), Some(1.0), Some(3.0)]);

        let records = records_from_columns(&series);

        assert_eq!(records.len(), 2);
        for timestamp in records.keys() {
            assert!(series.timestamps.contains(&Some(*timestamp)));
        }
        // Index alignment survives the skipped timestamp
        assert_eq!(records[&at(14, 2, 0)].value(Variable::WeatherCode), Some(3.0));
    }

    #[test]
    fn test_fully_present_variable_round_trips() {
        let temperatures = [Some(18.5), Some(19.25), Some(-3.0)];
        let series = ColumnarSeries::new(vec![Some(at(14, 0, 0)), Some(at(14, 1, 0)), Some(at(14, 2, 0))])
            .with_variable(Variable::WeatherCode, vec![Some(0.0); 3])
            .with_variable(Variable::Temperature2m, temperatures.to_vec());

        let records = records_from_columns(&series);

        for (index, timestamp) in series.timestamps.iter().enumerate() {
            let record = &records[&timestamp.unwrap()];
            assert_eq!(record.value(Variable::Temperature2m), temperatures[index]);
        }
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let series = hourly_series(&[(14, 0), (14, 1), (15, 0)])
            .with_variable(Variable::Visibility, vec![Some(1000.0), None, Some(500.0)]);

        assert_eq!(records_from_columns(&series), records_from_columns(&series));
    }

    #[test]
    fn test_missing_weather_code_column_yields_empty_map() {
        let series = ColumnarSeries::new(vec![Some(at(14, 0, 0))])
            .with_variable(Variable::Temperature2m, vec![Some(20.0)]);

        assert!(records_from_columns(&series).is_empty());
    }

    #[test]
    fn test_empty_inputs_yield_empty_map() {
        assert!(records_from_columns(&ColumnarSeries::default()).is_empty());
        assert!(records_from_columns(&ColumnarSeries::new(vec![Some(at(14, 0, 0))])).is_empty());
    }

    #[test]
    fn test_misaligned_column_only_omits_affected_indices() {
        let series = hourly_series(&[(14, 0), (14, 1), (14, 2)])
            .with_variable(Variable::Temperature2m, vec![Some(20.0)]);

        let records = records_from_columns(&series);

        assert_eq!(records.len(), 3);
        assert_eq!(records[&at(14, 0, 0)].value(Variable::Temperature2m), Some(20.0));
        assert!(records[&at(14, 2, 0)].value(Variable::Temperature2m).is_none());
    }

    #[test]
    fn test_duplicate_timestamp_last_write_wins() {
        let t0 = at(14, 0, 0);
        let series = ColumnarSeries::new(vec![Some(t0), Some(t0)])
            .with_variable(Variable::WeatherCode, vec![Some(0.0), Some(3.0)]);

        let records = records_from_columns(&series);

        assert_eq!(records.len(), 1);
        assert_eq!(records[&t0].value(Variable::WeatherCode), Some(3.0));
    }

    #[test]
    fn test_closest_hour_is_flagged() {
        let records = records_from_columns(&hourly_series(&[(14, 9), (14, 11)]));

        let hourly = flag_closest_today(&records, at(14, 10, 20));

        // 80 minutes from 09:00 vs 40 minutes from 11:00
        assert_eq!(flagged(&hourly), vec![at(14, 11, 0)]);
    }

    #[test]
    fn test_closest_hour_prefers_smaller_distance_before_later_entry() {
        let records = records_from_columns(&hourly_series(&[(14, 9), (14, 12)]));

        let hourly = flag_closest_today(&records, at(14, 10, 20));

        // 80 minutes from 09:00 vs 100 minutes from 12:00
        assert_eq!(flagged(&hourly), vec![at(14, 9, 0)]);
    }

    #[test]
    fn test_equidistant_hours_flag_the_earlier_one() {
        let records = records_from_columns(&hourly_series(&[(14, 9), (14, 11)]));

        let hourly = flag_closest_today(&records, at(14, 10, 0));

        assert_eq!(flagged(&hourly), vec![at(14, 9, 0)]);
    }

    #[test]
    fn test_exactly_one_flag_for_a_full_day() {
        let hours: Vec<(u32, u32)> = (0..24).map(|h| (14, h)).collect();
        let records = records_from_columns(&hourly_series(&hours));

        for minute_of_day in (0..24 * 60).step_by(37) {
            let now = at(14, minute_of_day / 60, minute_of_day % 60);
            let hourly = flag_closest_today(&records, now);
            assert_eq!(hourly.len(), 24);
            assert_eq!(flagged(&hourly).len(), 1, "now = {}", now);
        }
    }

    #[test]
    fn test_only_todays_hours_are_kept_in_order() {
        let records = records_from_columns(&hourly_series(&[(13, 23), (14, 0), (14, 1), (15, 0)]));

        let hourly = flag_closest_today(&records, at(14, 0, 10));

        let times: Vec<NaiveDateTime> = hourly.iter().map(|h| h.record.timestamp).collect();
        assert_eq!(times, vec![at(14, 0, 0), at(14, 1, 0)]);
        assert_eq!(flagged(&hourly), vec![at(14, 0, 0)]);
    }

    #[test]
    fn test_no_hours_today_yields_empty_sequence() {
        let records = records_from_columns(&hourly_series(&[(15, 0), (15, 1)]));

        let hourly = flag_closest_today(&records, at(14, 23, 30));

        assert!(hourly.is_empty());
    }

    #[test]
    fn test_reshape_forecast_builds_both_views() {
        let daily = ColumnarSeries::new(vec![Some(at(14, 0, 0)), Some(at(15, 0, 0))])
            .with_variable(Variable::WeatherCode, vec![Some(61.0), Some(0.0)])
            .with_variable(Variable::Temperature2mMax, vec![Some(30.0), Some(28.0)]);
        let hourly = hourly_series(&[(14, 8), (14, 9), (15, 8)])
            .with_variable(Variable::Temperature2m, vec![Some(20.0), Some(22.0), Some(19.0)]);
        let series = ForecastSeries {
            hourly,
            daily,
            utc_offset_seconds: 19800,
        };

        let forecast = reshape_forecast(&series, at(14, 8, 50));

        assert_eq!(forecast.daily.len(), 2);
        assert_eq!(forecast.daily[&at(14, 0, 0)].weather_condition, Some("Slight rain"));
        assert_eq!(forecast.hourly.len(), 2);
        let current = forecast.current_conditions().expect("an hour is flagged");
        assert_eq!(current.record.timestamp, at(14, 9, 0));
        assert_eq!(current.record.value(Variable::Temperature2m), Some(22.0));
        assert_eq!(forecast.utc_offset_seconds, 19800);
    }

    #[test]
    fn test_reshape_forecast_drops_variables_from_the_other_set() {
        let hourly = hourly_series(&[(14, 8)])
            .with_variable(Variable::Sunrise, vec![Some(1.0)]);
        let series = ForecastSeries {
            hourly,
            ..Default::default()
        };

        let forecast = reshape_forecast(&series, at(14, 8, 0));

        assert!(forecast.daily.is_empty());
        assert!(forecast.hourly[0].record.value(Variable::Sunrise).is_none());
    }

    #[test]
    fn test_location_now_applies_offset() {
        let utc = Utc::now().naive_utc();
        let shifted = location_now(3600);
        let delta = (shifted - utc).num_seconds();
        assert!((3599..=3601).contains(&delta), "delta was {}", delta);
    }
}
