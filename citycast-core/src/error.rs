//! Error taxonomy shared by the fetch, normalize and search layers.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while talking to the weather API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status.
    #[error("HTTP error! status: {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read or was not JSON.
    #[error("Malformed response body: {0}")]
    Body(String),

    /// The request URL could not be assembled from the configured base URL.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

impl PipelineError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PipelineError::Fetch(e) => e.status(),
            PipelineError::Parse(_) => None,
        }
    }
}

/// A payload was present but did not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected {endpoint} payload: {source}")]
    Shape {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} payload contained an empty conditions list")]
    NoConditions(&'static str),

    #[error("Timestamp {0} is out of range")]
    Timestamp(i64),

    #[error("Date format '{0}' could not be applied")]
    DateFormat(String),
}

/// Why a single pipeline of a search run produced nothing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Run-level failures, the only ones that reach the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter a city name")]
    EmptyInput,

    #[error("Failed to fetch weather data. Please check the city name.")]
    AllPipelinesFailed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: run `citycast configure` or set the OPENWEATHER_API_KEY environment variable."
    )]
    MissingApiKey,

    #[error("Invalid UTC offset of {0} seconds")]
    InvalidUtcOffset(i32),

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_code() {
        let err = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            body: "city not found".into(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn pipeline_error_status_comes_from_fetch_only() {
        let fetch = PipelineError::from(FetchError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        });
        let parse = PipelineError::from(ParseError::NoConditions("weather"));

        assert_eq!(fetch.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(parse.status(), None);
    }

    #[test]
    fn search_errors_carry_user_messages() {
        assert_eq!(SearchError::EmptyInput.to_string(), "Please enter a city name");
        assert!(SearchError::AllPipelinesFailed.to_string().contains("check the city name"));
    }

    #[test]
    fn missing_key_mentions_configure_hint() {
        assert!(ConfigError::MissingApiKey.to_string().contains("citycast configure"));
    }
}
