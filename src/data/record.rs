//! Forecast sample data structure

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the forecast API and the CSV store
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    /// Temperature in °C (`NaN` when missing)
    pub temperature: f64,
    /// Relative humidity in percent (`NaN` when missing)
    pub humidity: f64,
    /// Short condition label, e.g. "light rain"
    pub condition: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f64,
        humidity: f64,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
            condition: condition.into(),
        }
    }

    /// ISO-8601 week number of the timestamp
    pub fn iso_week(&self) -> u32 {
        self.timestamp.iso_week().week()
    }

    /// Timestamp rendered the way it is stored
    pub fn date_label(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }
}

/// Parse a timestamp field.
///
/// Accepts the API/CSV format, the ISO `T` separator and bare dates
/// (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
