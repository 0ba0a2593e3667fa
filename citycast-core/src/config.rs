use anyhow::{Context, Result, anyhow};
use chrono::{
    FixedOffset,
    format::{Item, StrftimeItems},
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{error::ConfigError, normalize::DateStyle};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";
pub const DEFAULT_LANG: &str = "en";
/// Month/day/year without padding, e.g. `3/7/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Unit system sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

/// Fully resolved, immutable settings handed to the request builder and
/// normalizers. Built once per process from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub units: Units,
    pub lang: String,
    pub icon_base_url: String,
    pub date_format: String,
    /// `None` formats dates in the process's local zone.
    pub utc_offset: Option<FixedOffset>,
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Defaults for everything except the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::Metric,
            lang: DEFAULT_LANG.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset: None,
            timeout_secs: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lang = "en"
/// utc_offset_seconds = 3600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub units: Units,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_seconds: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            units: Units::default(),
            lang: default_lang(),
            icon_base_url: default_icon_base_url(),
            date_format: default_date_format(),
            utc_offset_seconds: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citycast", "citycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve into [`ApiConfig`], letting [`API_KEY_ENV`] override the stored key.
    pub fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        self.resolve(std::env::var(API_KEY_ENV).ok().as_deref())
    }

    /// Same as [`Config::api_config`] with an explicit override key.
    pub fn resolve(&self, key_override: Option<&str>) -> Result<ApiConfig, ConfigError> {
        let api_key = [key_override, self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let utc_offset = self
            .utc_offset_seconds
            .map(|secs| FixedOffset::east_opt(secs).ok_or(ConfigError::InvalidUtcOffset(secs)))
            .transpose()?;

        // Parse errors first, then a trial render for anything the parser lets through.
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
            || DateStyle::new(self.date_format.clone(), utc_offset).date_and_label(0).is_err()
        {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        Ok(ApiConfig {
            api_key: api_key.to_string(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            units: self.units,
            lang: self.lang.clone(),
            icon_base_url: self.icon_base_url.trim_end_matches('/').to_string(),
            date_format: self.date_format.clone(),
            utc_offset,
            timeout_secs: self.timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_when_no_key() {
        let cfg = Config::default();
        let err = cfg.resolve(None).unwrap_err();

        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(matches!(cfg.resolve(None), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn override_key_wins_over_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        let api = cfg.resolve(Some("FROM_ENV")).expect("key must resolve");
        assert_eq!(api.api_key, "FROM_ENV");
    }

    #[test]
    fn empty_override_falls_back_to_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        let api = cfg.resolve(Some("")).expect("key must resolve");
        assert_eq!(api.api_key, "STORED");
    }

    #[test]
    fn defaults_are_applied_from_minimal_toml() {
        let cfg = Config::from_toml("api_key = \"KEY\"\n").expect("toml must parse");
        let api = cfg.resolve(None).expect("key must resolve");

        assert_eq!(api, ApiConfig::new("KEY"));
        assert_eq!(api.units.as_str(), "metric");
        assert_eq!(api.lang, "en");
    }

    #[test]
    fn trailing_slashes_are_trimmed_and_offset_resolved() {
        let cfg = Config::from_toml(
            "api_key = \"KEY\"\nbase_url = \"http://localhost:9000/\"\nutc_offset_seconds = 7200\n",
        )
        .expect("toml must parse");
        let api = cfg.resolve(None).expect("config must resolve");

        assert_eq!(api.base_url, "http://localhost:9000");
        assert_eq!(api.utc_offset, FixedOffset::east_opt(7200));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.utc_offset_seconds = Some(200_000);

        assert!(matches!(cfg.resolve(None), Err(ConfigError::InvalidUtcOffset(200_000))));
    }

    #[test]
    fn broken_date_format_is_rejected() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.date_format = "%Q".into();

        assert!(matches!(cfg.resolve(None), Err(ConfigError::InvalidDateFormat(_))));
    }

    #[test]
    fn zone_fields_in_date_format_render() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.date_format = "%Y-%m-%d %z".into();
        cfg.utc_offset_seconds = Some(3600);

        let api = cfg.resolve(None).expect("zone fields are a valid format");
        let (_, label) = DateStyle::from_config(&api)
            .date_and_label(1_709_251_200)
            .expect("resolved format must render");

        assert_eq!(label, "2024-03-01 +0100");
    }

    #[test]
    fn unknown_units_fail_to_parse() {
        assert!(Config::from_toml("units = \"imperial\"\n").is_err());
    }
}
