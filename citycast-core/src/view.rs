//! Display-ready views of a [`SearchOutcome`] and the presenter seam that
//! consumes them.

use serde::Serialize;

use crate::{
    error::SearchError,
    model::{CurrentWeather, ForecastDay, HistoricalSeries},
    search::SearchOutcome,
};

pub const TEMPERATURE_SERIES_LABEL: &str = "Daily Temperature (°C)";
pub const HUMIDITY_SERIES_LABEL: &str = "Humidity (%)";

/// Messages shown to the user instead of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyInput,
    FetchFailed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::EmptyInput => SearchError::EmptyInput.to_string(),
            Notice::FetchFailed => SearchError::AllPipelinesFailed.to_string(),
        }
    }
}

/// Receives rendered sections. Sections arrive independently and in no
/// particular order; a missing section is simply never shown.
pub trait Presenter: Send + Sync {
    fn show_current(&self, view: &CurrentView);

    fn show_forecast(&self, cards: &[ForecastCard]);

    fn show_historical(&self, chart: &HistoricalChart);

    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentView {
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed_kmh: String,
}

impl CurrentView {
    pub fn new(record: &CurrentWeather) -> Self {
        Self {
            temperature: format!("{:.1}", record.temperature_c),
            condition: record.condition.clone(),
            humidity: record.humidity_pct.to_string(),
            wind_speed_kmh: wind_speed_kmh(record.wind_speed_mps),
        }
    }
}

/// m/s to km/h, one decimal.
pub fn wind_speed_kmh(mps: f64) -> String {
    format!("{:.1}", mps * 3.6)
}

pub fn icon_url(icon_base_url: &str, icon: &str) -> String {
    format!("{}/{icon}@2x.png", icon_base_url.trim_end_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub date: String,
    pub icon_url: String,
    pub alt: String,
    pub high: String,
    pub low: String,
}

impl ForecastCard {
    pub fn new(day: &ForecastDay, icon_base_url: &str) -> Self {
        Self {
            date: day.label.clone(),
            icon_url: icon_url(icon_base_url, &day.icon),
            alt: day.condition.clone(),
            high: format!("{}°C", day.temp_max_c),
            low: format!("{}°C", day.temp_min_c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Two line series keyed by the same date labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl HistoricalChart {
    pub fn new(series: &HistoricalSeries) -> Self {
        Self {
            labels: series.labels.clone(),
            datasets: vec![
                ChartDataset {
                    label: TEMPERATURE_SERIES_LABEL.to_string(),
                    color: "#3b82f6".to_string(),
                    values: series.daily.iter().map(|d| d.temperature_c).collect(),
                },
                ChartDataset {
                    label: HUMIDITY_SERIES_LABEL.to_string(),
                    color: "#10b981".to_string(),
                    values: series.daily.iter().map(|d| f64::from(d.humidity_pct)).collect(),
                },
            ],
        }
    }
}

/// Every renderable section of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastCard>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical: Option<HistoricalChart>,
}

impl SearchView {
    pub fn new(outcome: &SearchOutcome, icon_base_url: &str) -> Self {
        Self {
            city: outcome.city.clone(),
            current: outcome.current.as_ref().map(CurrentView::new),
            forecast: outcome.forecast.as_ref().map(|days| {
                days.iter().map(|day| ForecastCard::new(day, icon_base_url)).collect()
            }),
            historical: outcome.historical.as_ref().map(HistoricalChart::new),
        }
    }

    /// Hands each available section to `presenter`; returns how many were shown.
    pub fn present<P: Presenter + ?Sized>(&self, presenter: &P) -> usize {
        let mut shown = 0;
        if let Some(current) = &self.current {
            presenter.show_current(current);
            shown += 1;
        }
        if let Some(cards) = &self.forecast {
            presenter.show_forecast(cards);
            shown += 1;
        }
        if let Some(chart) = &self.historical {
            presenter.show_historical(chart);
            shown += 1;
        }
        shown
    }
}
