//! Composition of outbound API queries.

use std::{collections::BTreeMap, fmt, sync::Arc};

use reqwest::Url;

use crate::{config::ApiConfig, error::FetchError};

/// Query keys the builder always owns.
pub const RESERVED_KEYS: [&str; 3] = ["appid", "units", "lang"];

/// Remote operations, one response shape each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Current conditions, by city name or coordinates.
    Weather,
    /// 5 day / 3 hour forecast by city name.
    Forecast,
    /// Daily series by coordinates.
    OneCall,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::OneCall => "onecall",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, fully parameterized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    endpoint: Endpoint,
    params: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// `{base_url}/{endpoint}?{params}` with the query percent-encoded.
    pub fn url(&self, base_url: &str) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", base_url.trim_end_matches('/'), self.endpoint);
        Url::parse_with_params(&raw, &self.params)
            .map_err(|e| FetchError::InvalidUrl { url: raw, reason: e.to_string() })
    }
}

/// Builds [`RequestDescriptor`]s carrying the fixed credential, unit system and
/// language from an [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: Arc<ApiConfig>,
}

impl RequestBuilder {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Caller params go in first; the reserved keys are then written over them.
    pub fn build<K, V, I>(&self, endpoint: Endpoint, params: I) -> RequestDescriptor
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: BTreeMap<String, String> =
            params.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

        params.insert("appid".into(), self.config.api_key.clone());
        params.insert("units".into(), self.config.units.as_str().into());
        params.insert("lang".into(), self.config.lang.clone());

        RequestDescriptor { endpoint, params }
    }

    pub fn current_by_city(&self, city: &str) -> RequestDescriptor {
        self.build(Endpoint::Weather, [("q", city)])
    }

    pub fn forecast_by_city(&self, city: &str) -> RequestDescriptor {
        self.build(Endpoint::Forecast, [("q", city)])
    }

    /// Daily series for a location; minutely and hourly blocks are excluded.
    pub fn daily_by_coordinates(&self, lat: f64, lon: f64) -> RequestDescriptor {
        self.build(
            Endpoint::OneCall,
            [
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("exclude", "minutely,hourly".to_string()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(Arc::new(ApiConfig::new("SECRET")))
    }

    #[test]
    fn reserved_keys_are_always_present() {
        let req = builder().build(Endpoint::Weather, Vec::<(String, String)>::new());

        for key in RESERVED_KEYS {
            assert!(req.param(key).is_some(), "missing {key}");
        }
        assert_eq!(req.param("appid"), Some("SECRET"));
        assert_eq!(req.param("units"), Some("metric"));
        assert_eq!(req.param("lang"), Some("en"));
    }

    #[test]
    fn caller_cannot_override_reserved_keys() {
        let req = builder().build(
            Endpoint::Forecast,
            [("q", "Oslo"), ("appid", "EVIL"), ("units", "imperial"), ("lang", "de")],
        );

        assert_eq!(req.param("q"), Some("Oslo"));
        assert_eq!(req.param("appid"), Some("SECRET"));
        assert_eq!(req.param("units"), Some("metric"));
        assert_eq!(req.param("lang"), Some("en"));
        assert_eq!(req.params().len(), 4);
    }

    #[test]
    fn daily_request_carries_coordinates_and_exclusions() {
        let req = builder().daily_by_coordinates(59.91, 10.75);

        assert_eq!(req.endpoint(), Endpoint::OneCall);
        assert_eq!(req.param("lat"), Some("59.91"));
        assert_eq!(req.param("lon"), Some("10.75"));
        assert_eq!(req.param("exclude"), Some("minutely,hourly"));
    }

    #[test]
    fn url_encodes_city_names() {
        let req = builder().current_by_city("São Paulo");
        let url = req.url("https://api.example.com/data/2.5/").expect("valid url");

        assert_eq!(url.path(), "/data/2.5/weather");
        let pairs: BTreeMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("q").map(String::as_str), Some("São Paulo"));
        assert!(url.as_str().contains("q=S%C3%A3o+Paulo"));
    }

    #[test]
    fn url_rejects_garbage_base() {
        let req = builder().current_by_city("Oslo");
        assert!(matches!(req.url("not a url"), Err(FetchError::InvalidUrl { .. })));
    }
}
