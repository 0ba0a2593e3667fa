//! Mapping of provider payloads onto the canonical records in [`crate::model`].
//!
//! Every normalizer treats a JSON `null` as "nothing to show" rather than a
//! fault. Payloads that are present but lack expected fields fail with
//! [`ParseError`].

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    config::ApiConfig,
    error::ParseError,
    model::{Coordinates, CurrentWeather, ForecastDay, HistoricalDay, HistoricalSeries},
};

/// Spacing of the provider's forecast entries.
pub const FORECAST_STEP_HOURS: usize = 3;

/// Every `FORECAST_STRIDE`-th forecast entry is kept, one per day.
///
/// Assumes the series is gapless and strictly 3-hourly. Samples land on the
/// time of day of the first entry, which is only midnight when the request
/// happens to be made then.
pub const FORECAST_STRIDE: usize = 24 / FORECAST_STEP_HOURS;

/// Turns Unix timestamps into calendar dates and display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStyle {
    format: String,
    offset: Option<FixedOffset>,
}

impl DateStyle {
    /// `offset == None` uses the process's local zone.
    pub fn new(format: impl Into<String>, offset: Option<FixedOffset>) -> Self {
        Self { format: format.into(), offset }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.date_format.clone(), config.utc_offset)
    }

    // Keeps the offset so zone specifiers (`%z`, `%:z`, `%Z`) can be rendered.
    fn local(&self, ts: i64) -> Result<DateTime<FixedOffset>, ParseError> {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0).ok_or(ParseError::Timestamp(ts))?;
        Ok(match self.offset {
            Some(offset) => utc.with_timezone(&offset),
            None => utc.with_timezone(&Local).fixed_offset(),
        })
    }

    pub fn date_and_label(&self, ts: i64) -> Result<(NaiveDate, String), ParseError> {
        let local = self.local(ts)?;
        let mut label = String::new();
        write!(label, "{}", local.format(&self.format))
            .map_err(|_| ParseError::DateFormat(self.format.clone()))?;
        Ok((local.date_naive(), label))
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCoordResponse {
    coord: Coordinates,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    // Entries are decoded after sampling; unsampled ones are never inspected.
    list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    daily: Vec<OwDailyEntry>,
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, raw: &Value) -> Result<T, ParseError> {
    T::deserialize(raw).map_err(|source| ParseError::Shape { endpoint, source })
}

// An empty list fails closed; there is no sensible default condition.
fn first_condition(
    conditions: Vec<OwCondition>,
    endpoint: &'static str,
) -> Result<OwCondition, ParseError> {
    conditions.into_iter().next().ok_or(ParseError::NoConditions(endpoint))
}

pub fn normalize_current(raw: &Value) -> Result<Option<CurrentWeather>, ParseError> {
    if raw.is_null() {
        return Ok(None);
    }

    let parsed: OwCurrentResponse = decode("weather", raw)?;
    let condition = first_condition(parsed.weather, "weather")?;

    Ok(Some(CurrentWeather {
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        condition: condition.description,
        icon: condition.icon,
    }))
}

pub fn normalize_forecast(raw: &Value, style: &DateStyle) -> Result<Vec<ForecastDay>, ParseError> {
    if raw.is_null() {
        return Ok(Vec::new());
    }

    let parsed: OwForecastResponse = decode("forecast", raw)?;

    parsed
        .list
        .iter()
        .step_by(FORECAST_STRIDE)
        .map(|item| {
            let entry: OwForecastEntry = decode("forecast", item)?;
            let condition = first_condition(entry.weather, "forecast")?;
            let (date, label) = style.date_and_label(entry.dt)?;

            Ok(ForecastDay {
                date,
                label,
                temperature_c: entry.main.temp,
                temp_min_c: entry.main.temp_min,
                temp_max_c: entry.main.temp_max,
                condition: condition.description,
                icon: condition.icon,
            })
        })
        .collect()
}

pub fn normalize_historical(
    raw: &Value,
    style: &DateStyle,
) -> Result<Option<HistoricalSeries>, ParseError> {
    if raw.is_null() {
        return Ok(None);
    }

    let parsed: OwOneCallResponse = decode("onecall", raw)?;

    let mut series = HistoricalSeries {
        labels: Vec::with_capacity(parsed.daily.len()),
        daily: Vec::with_capacity(parsed.daily.len()),
    };

    for entry in parsed.daily {
        let (date, label) = style.date_and_label(entry.dt)?;
        series.labels.push(label.clone());
        series.daily.push(HistoricalDay {
            date,
            label,
            temperature_c: entry.temp.day,
            humidity_pct: entry.humidity,
        });
    }

    Ok(Some(series))
}

/// Location of the city a current-weather payload describes.
pub fn extract_coordinates(raw: &Value) -> Result<Coordinates, ParseError> {
    let parsed: OwCoordResponse = decode("weather", raw)?;
    Ok(parsed.coord)
}
