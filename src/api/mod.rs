//! Forecast data source module
//!
//! Provides the OpenWeatherMap client and the [`ForecastSource`] seam used
//! by the download step.

mod openweather;
mod types;

use std::path::Path;

use tracing::info;

pub use openweather::{fetch_forecast, OpenWeatherClient, OPENWEATHER_API_URL};
pub use types::*;

use crate::data::{store, Record, WeatherTable};
use crate::error::Result;

/// Anything that can produce an ordered forecast for a city
pub trait ForecastSource {
    /// Name of the provider
    fn name(&self) -> &str;

    /// Fetch the forecast records in chronological order
    fn fetch_forecast(&self, city: &str, api_key: &str) -> Result<Vec<Record>>;
}

/// Fetch a forecast and persist it to `path`.
///
/// Nothing is written when the fetch fails.
pub fn download<S, P>(source: &S, city: &str, api_key: &str, path: P) -> Result<WeatherTable>
where
    S: ForecastSource + ?Sized,
    P: AsRef<Path>,
{
    let records = source.fetch_forecast(city, api_key)?;
    let table = WeatherTable::new(records);
    store::save(&table, &path)?;

    info!(
        source = source.name(),
        city,
        rows = table.len(),
        "Downloaded forecast"
    );
    Ok(table)
}
