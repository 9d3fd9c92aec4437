//! Configuration management
//!
//! Every section has defaults, so an empty or partial TOML file is valid.
//!
//! ```toml
//! [api]
//! api_key_env = "OPENWEATHER_API_KEY"
//! units = "metric"
//!
//! [data]
//! path = "weather_data.csv"
//!
//! [analysis]
//! window = 3
//! threshold = 2.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{DEFAULT_THRESHOLD, DEFAULT_WINDOW};
use crate::api::OPENWEATHER_API_URL;
use crate::error::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Forecast endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unit system passed to the API (metric gives °C)
    #[serde(default = "default_units")]
    pub units: String,

    /// Inline API key; takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    OPENWEATHER_API_URL.to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_api_key_env() -> String {
    "OPENWEATHER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            units: default_units(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// API key from the config, else from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(Error::Config(format!(
                "no API key: set {} or api.api_key",
                self.api_key_env
            ))),
        }
    }
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// CSV file written after each fetch
    #[serde(default = "default_data_path")]
    pub path: String,
}

fn default_data_path() -> String {
    "weather_data.csv".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// Rolling outlier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: default_window(),
            threshold: default_threshold(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.analysis.window == 0 {
            return Err(Error::Config("analysis.window must be > 0".to_string()));
        }
        if !(self.analysis.threshold > 0.0) {
            return Err(Error::Config(
                "analysis.threshold must be positive".to_string(),
            ));
        }
        if self.data.path.trim().is_empty() {
            return Err(Error::Config("data.path must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.api.units, "metric");
        assert_eq!(config.api.base_url, "http://api.openweathermap.org");
        assert_eq!(config.data.path, "weather_data.csv");
        assert_eq!(config.analysis.window, 3);
        assert_eq!(config.analysis.threshold, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            [analysis]
            window = 5

            [data]
            path = "out/forecast.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.window, 5);
        assert_eq!(config.analysis.threshold, 2.0);
        assert_eq!(config.data.path, "out/forecast.csv");
        assert_eq!(config.api.api_key_env, "OPENWEATHER_API_KEY");
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");

        assert!(matches!(
            AppConfig::from_toml_str("[analysis]\nwindow = \"three\""),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.analysis.window = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AppConfig::default();
        config.analysis.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_api_key() {
        let mut api = ApiSettings {
            api_key: Some("inline".to_string()),
            api_key_env: "WEATHER_ANALYSIS_TEST_KEY_UNSET".to_string(),
            ..ApiSettings::default()
        };
        assert_eq!(api.resolve_api_key().unwrap(), "inline");

        api.api_key = None;
        assert!(matches!(api.resolve_api_key(), Err(Error::Config(_))));

        api.api_key_env = "WEATHER_ANALYSIS_TEST_KEY_SET".to_string();
        std::env::set_var("WEATHER_ANALYSIS_TEST_KEY_SET", " from-env ");
        assert_eq!(api.resolve_api_key().unwrap(), "from-env");
    }
}
