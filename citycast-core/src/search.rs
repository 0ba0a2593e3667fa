//! One search run: three independent fetch-and-normalize pipelines whose
//! failures are collected rather than propagated.

use std::{fmt, sync::Arc};

use tracing::{debug, info, instrument, warn};

use crate::{
    client::{HttpWeatherClient, WeatherClient},
    config::ApiConfig,
    error::{FetchError, PipelineError, SearchError},
    model::{CurrentWeather, ForecastDay, HistoricalSeries},
    normalize::{
        DateStyle, extract_coordinates, normalize_current, normalize_forecast,
        normalize_historical,
    },
    request::RequestBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    Current,
    Forecast,
    /// Coordinate lookup followed by the daily series.
    Historical,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Current => "current",
            Pipeline::Forecast => "forecast",
            Pipeline::Historical => "historical",
        }
    }

    pub const fn all() -> &'static [Pipeline] {
        &[Pipeline::Current, Pipeline::Forecast, Pipeline::Historical]
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whatever a run managed to collect. At least one pipeline succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub city: String,
    pub current: Option<CurrentWeather>,
    pub forecast: Option<Vec<ForecastDay>>,
    pub historical: Option<HistoricalSeries>,
    pub failed: Vec<Pipeline>,
}

impl SearchOutcome {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SearchFlow {
    builder: RequestBuilder,
    client: Arc<dyn WeatherClient>,
    style: DateStyle,
}

impl SearchFlow {
    pub fn new(config: Arc<ApiConfig>, client: Arc<dyn WeatherClient>) -> Self {
        let style = DateStyle::from_config(&config);
        Self { builder: RequestBuilder::new(config), client, style }
    }

    /// Flow backed by the HTTP client.
    pub fn from_config(config: ApiConfig) -> Result<Self, FetchError> {
        let client = HttpWeatherClient::new(&config)?;
        Ok(Self::new(Arc::new(config), Arc::new(client)))
    }

    pub fn config(&self) -> &ApiConfig {
        self.builder.config()
    }

    /// Runs all three pipelines concurrently for `input`.
    ///
    /// Blank input is rejected before any request is made. The run only
    /// fails as a whole when every pipeline failed.
    #[instrument(skip(self))]
    pub async fn run(&self, input: &str) -> Result<SearchOutcome, SearchError> {
        let city = input.trim();
        if city.is_empty() {
            return Err(SearchError::EmptyInput);
        }

        info!(city, "Starting search");

        let (current, forecast, historical) =
            tokio::join!(self.current(city), self.forecast(city), self.historical(city));

        let mut failed = Vec::new();
        let current = settle(Pipeline::Current, current, &mut failed).flatten();
        let forecast = settle(Pipeline::Forecast, forecast, &mut failed);
        let historical = settle(Pipeline::Historical, historical, &mut failed).flatten();

        if failed.len() == Pipeline::all().len() {
            warn!(city, "Every pipeline failed");
            return Err(SearchError::AllPipelinesFailed);
        }

        info!(city, failures = failed.len(), "Search finished");

        Ok(SearchOutcome { city: city.to_string(), current, forecast, historical, failed })
    }

    async fn current(&self, city: &str) -> Result<Option<CurrentWeather>, PipelineError> {
        let raw = self.client.fetch(&self.builder.current_by_city(city)).await?;
        Ok(normalize_current(&raw)?)
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastDay>, PipelineError> {
        let raw = self.client.fetch(&self.builder.forecast_by_city(city)).await?;
        Ok(normalize_forecast(&raw, &self.style)?)
    }

    async fn historical(&self, city: &str) -> Result<Option<HistoricalSeries>, PipelineError> {
        let raw = self.client.fetch(&self.builder.current_by_city(city)).await?;
        let coords = extract_coordinates(&raw)?;
        debug!(lat = coords.lat, lon = coords.lon, "Resolved coordinates");

        let raw = self
            .client
            .fetch(&self.builder.daily_by_coordinates(coords.lat, coords.lon))
            .await?;
        Ok(normalize_historical(&raw, &self.style)?)
    }
}

fn settle<T>(
    pipeline: Pipeline,
    result: Result<T, PipelineError>,
    failed: &mut Vec<Pipeline>,
) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(%pipeline, "Pipeline succeeded");
            Some(value)
        }
        Err(err) => {
            let status = err.status().map(|s| s.as_u16());
            warn!(%pipeline, ?status, error = %err, "Pipeline failed");
            failed.push(pipeline);
            None
        }
    }
}
