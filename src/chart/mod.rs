//! Presentation layer
//!
//! Renderers only read the table; they never attach or change columns.

pub mod ascii;
mod terminal;

use std::collections::BTreeMap;

pub use terminal::TerminalRenderer;

use crate::analysis::{ConditionCount, Summary, WeeklyAverage};
use crate::data::WeatherTable;
use crate::error::Result;

/// Output surface for the menu commands
pub trait Renderer {
    /// Descriptive statistics, averages and condition frequencies
    fn summary(&mut self, summary: &Summary) -> Result<()>;

    /// Temperature and humidity over time
    fn trends(&mut self, table: &WeatherTable) -> Result<()>;

    /// Share of each weather condition
    fn conditions(&mut self, counts: &[ConditionCount]) -> Result<()>;

    /// Temperature with rolling mean, band and outliers, followed by the
    /// outlier listing. Requires rolling columns on the table.
    fn rolling(&mut self, table: &WeatherTable) -> Result<()>;

    /// Average temperature per ISO week
    fn weekly(&mut self, weekly: &BTreeMap<u32, WeeklyAverage>) -> Result<()>;
}
