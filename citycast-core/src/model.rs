use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conditions right now, as reported by the `weather` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    pub icon: String,
}

/// One sampled entry of the 3-hourly forecast, standing for a whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub label: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: NaiveDate,
    pub label: String,
    /// Daytime mean temperature.
    pub temperature_c: f64,
    pub humidity_pct: u8,
}

/// Daily series plus its chart labels; `labels[i]` belongs to `daily[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub labels: Vec<String>,
    pub daily: Vec<HistoricalDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}
