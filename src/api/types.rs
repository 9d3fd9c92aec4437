//! Type definitions for OpenWeatherMap forecast responses

use serde::Deserialize;

use crate::data::{parse_timestamp, Record};
use crate::error::{Error, Result};

/// `/data/2.5/forecast` response body
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<CityInfo>,
}

/// One 3-hour forecast step
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Text timestamp, e.g. "2024-05-01 12:00:00"
    pub dt_txt: String,
    pub main: MainReadings,
    pub weather: Vec<ConditionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionInfo {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityInfo {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl TryFrom<ForecastEntry> for Record {
    type Error = Error;

    fn try_from(entry: ForecastEntry) -> Result<Self> {
        let timestamp = parse_timestamp(&entry.dt_txt)
            .ok_or_else(|| Error::Parse(format!("invalid dt_txt '{}'", entry.dt_txt)))?;

        let condition = entry
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| Error::Parse(format!("no weather description at {}", entry.dt_txt)))?;

        Ok(Record::new(
            timestamp,
            entry.main.temp,
            entry.main.humidity,
            condition,
        ))
    }
}

/// Parse a forecast body into records in response order
pub fn parse_forecast(body: &str) -> Result<Vec<Record>> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;
    response.list.into_iter().map(Record::try_from).collect()
}
