//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Request building and the HTTP weather client
//! - Normalization of current, forecast and daily payloads
//! - The search flow that fans out to all three and tolerates partial failure
//! - View models and the presenter seam
//!
//! It is used by `citycast-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod request;
pub mod search;
pub mod session;
pub mod view;

pub use client::{HttpWeatherClient, WeatherClient};
pub use config::{ApiConfig, Config, Units};
pub use error::{ConfigError, FetchError, ParseError, PipelineError, SearchError};
pub use model::{Coordinates, CurrentWeather, ForecastDay, HistoricalDay, HistoricalSeries};
pub use request::{Endpoint, RequestBuilder, RequestDescriptor};
pub use search::{Pipeline, SearchFlow, SearchOutcome};
pub use session::{RunStatus, SearchSession, Trigger};
pub use view::{CurrentView, ForecastCard, HistoricalChart, Notice, Presenter, SearchView};
