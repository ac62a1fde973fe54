//! Configuration management for `TripFinder`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripError;
use crate::models::{DEFAULT_MAX_RESULTS, WaitPolicy};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `TripFinder` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripFinderConfig {
    /// Google Places and Directions settings
    #[serde(default)]
    pub google: GoogleConfig,
    /// OpenWeather settings
    #[serde(default)]
    pub openweather: OpenWeatherConfig,
    /// Place sources to query
    #[serde(default)]
    pub places: PlacesConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Search pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Defaults for query fields left out on the command line
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// API key, required when a Google adapter is used
    pub api_key: Option<String>,
    #[serde(default = "default_places_url")]
    pub places_url: String,
    #[serde(default = "default_directions_url")]
    pub directions_url: String,
    /// Directions mode (transit, walking, driving, bicycling)
    #[serde(default = "default_travel_mode")]
    pub travel_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_openweather_url")]
    pub base_url: String,
    /// Language of condition descriptions when the query names none
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Query Google Places
    #[serde(default = "default_true")]
    pub google: bool,
    /// JSON catalogue of curated places, merged after Google results
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-provider request budget
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum provider calls in flight per stage
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Upper bound for a single provider call, retries included
    #[serde(default = "default_call_timeout")]
    pub call_timeout_seconds: u64,
    #[serde(default)]
    pub wait_policy: WaitPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Search radius in meters
    #[serde(default = "default_search_radius")]
    pub search_radius_m: u32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

// Default value functions
fn default_places_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_directions_url() -> String {
    "https://maps.googleapis.com/maps/api/directions".to_string()
}

fn default_travel_mode() -> String {
    "transit".to_string()
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/3.0".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_concurrency() -> usize {
    8
}

fn default_call_timeout() -> u64 {
    45
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("tripfinder"))
        .unwrap_or_else(|| PathBuf::from(".tripfinder-cache"))
        .to_string_lossy()
        .into_owned()
}

fn default_cache_ttl() -> u32 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_search_radius() -> u32 {
    5_000
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            places_url: default_places_url(),
            directions_url: default_directions_url(),
            travel_mode: default_travel_mode(),
        }
    }
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openweather_url(),
            language: default_language(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            google: true,
            catalog: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            max_retries: default_max_retries(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            call_timeout_seconds: default_call_timeout(),
            wait_policy: WaitPolicy::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            location: default_cache_location(),
            ttl_hours: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_hours) * 3600)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            search_radius_m: default_search_radius(),
            max_results: default_max_results(),
        }
    }
}

impl TripFinderConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPFINDER_GOOGLE__API_KEY style overrides
        builder = builder.add_source(
            Environment::with_prefix("TRIPFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripFinderConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripfinder").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.google.places_url.is_empty() {
            self.google.places_url = default_places_url();
        }
        if self.google.directions_url.is_empty() {
            self.google.directions_url = default_directions_url();
        }
        if self.google.travel_mode.is_empty() {
            self.google.travel_mode = default_travel_mode();
        }
        if self.openweather.base_url.is_empty() {
            self.openweather.base_url = default_openweather_url();
        }
        if self.openweather.language.is_empty() {
            self.openweather.language = default_language();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.http.requests_per_minute == 0 {
            self.http.requests_per_minute = default_requests_per_minute();
        }
        if self.pipeline.concurrency == 0 {
            self.pipeline.concurrency = default_concurrency();
        }
        if self.pipeline.call_timeout_seconds == 0 {
            self.pipeline.call_timeout_seconds = default_call_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.search_radius_m == 0 {
            self.defaults.search_radius_m = default_search_radius();
        }
        if self.defaults.max_results == 0 {
            self.defaults.max_results = default_max_results();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Google", &self.google.api_key),
            ("OpenWeather", &self.openweather.api_key),
        ];
        for (name, key) in keys {
            if let Some(api_key) = key {
                if api_key.is_empty() {
                    return Err(TripError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if api_key.len() < 8 {
                    return Err(TripError::config(format!(
                        "{name} API key appears to be invalid (too short). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(TripError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if self.http.max_retries > 10 {
            return Err(TripError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.pipeline.concurrency > 64 {
            return Err(TripError::config("Pipeline concurrency cannot exceed 64").into());
        }

        if self.cache.ttl_hours > 168 {
            return Err(TripError::config("Cache TTL cannot exceed 168 hours (1 week)").into());
        }

        if self.defaults.search_radius_m > 50_000 {
            return Err(TripError::config("Search radius cannot exceed 50000 m").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_modes = ["transit", "walking", "driving", "bicycling"];
        if !valid_modes.contains(&self.google.travel_mode.as_str()) {
            return Err(TripError::config(format!(
                "Invalid travel mode '{}'. Must be one of: {}",
                self.google.travel_mode,
                valid_modes.join(", ")
            ))
            .into());
        }

        for url in [
            &self.google.places_url,
            &self.google.directions_url,
            &self.openweather.base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripError::config(format!(
                    "Provider URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if !self.places.google && self.places.catalog.is_none() {
            return Err(TripError::config(
                "No place source enabled. Enable Google or set a catalogue path.",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TripFinderConfig::default();
        assert_eq!(config.google.travel_mode, "transit");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.max_results, 10);
        assert_eq!(config.pipeline.wait_policy, WaitPolicy::Exclude);
        assert!(config.google.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = TripFinderConfig::default();
        config.openweather.api_key = Some("abc".to_string());
        let result = config.validate_api_keys();
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripFinderConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripFinderConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_requires_a_place_source() {
        let mut config = TripFinderConfig::default();
        config.places.google = false;
        assert!(config.validate().is_err());

        config.places.catalog = Some(PathBuf::from("places.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = TripFinderConfig::default();
        config.pipeline.concurrency = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.pipeline.concurrency, 8);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[google]
api_key = "google_key_123"
travel_mode = "walking"

[pipeline]
concurrency = 4
wait_policy = "fold_into_travel"

[defaults]
max_results = 3
"#
        )
        .unwrap();

        let config = TripFinderConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.google.api_key.as_deref(), Some("google_key_123"));
        assert_eq!(config.google.travel_mode, "walking");
        assert_eq!(config.pipeline.concurrency, 4);
        assert_eq!(config.pipeline.wait_policy, WaitPolicy::FoldIntoTravel);
        assert_eq!(config.defaults.max_results, 3);
        assert_eq!(config.http.max_retries, 3);
    }

    #[test]
    fn test_config_path_generation() {
        let path = TripFinderConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("tripfinder"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
