//! Data module: forecast records, the in-memory table and CSV persistence

mod record;
pub mod store;
mod table;

pub use record::{parse_timestamp, Record, DATE_FORMAT};
pub use table::{RollingColumns, RollingWindowResult, WeatherTable};
