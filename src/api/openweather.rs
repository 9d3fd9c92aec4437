//! OpenWeatherMap forecast client

use std::time::Duration;

use tracing::{info, warn};

use super::types::parse_forecast;
use super::ForecastSource;
use crate::data::Record;
use crate::error::{Error, Result};
use crate::utils::ApiSettings;

pub const OPENWEATHER_API_URL: &str = "http://api.openweathermap.org";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocking client for the 5 day / 3 hour forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::blocking::Client,
    base_url: String,
    units: String,
}

impl OpenWeatherClient {
    /// Create a client against the public endpoint with metric units
    pub fn new() -> Result<Self> {
        Self::with_base_url(OPENWEATHER_API_URL)
    }

    /// Create a client with custom base URL (for testing)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::build(base_url, "metric", Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client from the `[api]` config section
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::build(
            &settings.base_url,
            &settings.units,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn build(base_url: &str, units: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            units: units.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the forecast for `city`.
    ///
    /// Any non-success status becomes [`Error::Fetch`]; nothing is retried.
    pub fn fetch_forecast(&self, city: &str, api_key: &str) -> Result<Vec<Record>> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        info!(city, units = %self.units, "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", self.units.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(city, status = status.as_u16(), "Forecast request failed");
            return Err(Error::Fetch {
                status_code: status.as_u16(),
            });
        }

        let body = response.text()?;
        let records = parse_forecast(&body)?;

        info!(city, entries = records.len(), "Fetched forecast");
        Ok(records)
    }
}

impl ForecastSource for OpenWeatherClient {
    fn name(&self) -> &str {
        "OpenWeatherMap"
    }

    fn fetch_forecast(&self, city: &str, api_key: &str) -> Result<Vec<Record>> {
        OpenWeatherClient::fetch_forecast(self, city, api_key)
    }
}

/// Fetch a forecast from the public endpoint with default settings
pub fn fetch_forecast(city: &str, api_key: &str) -> Result<Vec<Record>> {
    OpenWeatherClient::new()?.fetch_forecast(city, api_key)
}
