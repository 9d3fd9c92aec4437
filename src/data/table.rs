//! Ordered forecast table and its derived columns

use chrono::NaiveDateTime;
use serde::Serialize;

use super::record::Record;
use crate::error::{Error, Result};

/// Rolling statistics for one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingWindowResult {
    /// Mean of the window ending at this row, `None` until the window is full
    pub rolling_mean: Option<f64>,
    /// Sample standard deviation of the same window
    pub rolling_std: Option<f64>,
    pub is_outlier: bool,
}

impl RollingWindowResult {
    /// Row without a full window
    pub const UNDEFINED: Self = Self {
        rolling_mean: None,
        rolling_std: None,
        is_outlier: false,
    };

    /// Lower and upper edge of `mean ± k·std`
    pub fn band(&self, k: f64) -> Option<(f64, f64)> {
        match (self.rolling_mean, self.rolling_std) {
            (Some(mean), Some(std)) => Some((mean - k * std, mean + k * std)),
            _ => None,
        }
    }
}

/// Rolling mean / std / outlier columns, one entry per table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingColumns {
    pub window: usize,
    /// Band width in standard deviations
    pub threshold: f64,
    pub rows: Vec<RollingWindowResult>,
}

impl RollingColumns {
    pub fn new(window: usize, threshold: f64, rows: Vec<RollingWindowResult>) -> Self {
        Self {
            window,
            threshold,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn means(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.rolling_mean).collect()
    }

    pub fn stds(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.rolling_std).collect()
    }

    /// Indices of flagged rows
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| if r.is_outlier { Some(i) } else { None })
            .collect()
    }

    pub fn outlier_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_outlier).count()
    }
}

/// Chronologically ordered forecast table.
///
/// Records are never removed; analysis steps only attach derived columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    records: Vec<Record>,
    rolling: Option<RollingColumns>,
    weeks: Option<Vec<u32>>,
}

impl WeatherTable {
    /// Create a table from records in source order
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            rolling: None,
            weeks: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.temperature).collect()
    }

    pub fn humidities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.humidity).collect()
    }

    pub fn conditions(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.condition.as_str()).collect()
    }

    /// Attached rolling columns, if computed
    pub fn rolling(&self) -> Option<&RollingColumns> {
        self.rolling.as_ref()
    }

    /// Attached ISO week column, if computed
    pub fn weeks(&self) -> Option<&[u32]> {
        self.weeks.as_deref()
    }

    /// Attach rolling columns, replacing any previous ones
    pub fn with_rolling(mut self, columns: RollingColumns) -> Result<Self> {
        if columns.len() != self.records.len() {
            return Err(Error::InvalidInput(format!(
                "rolling columns cover {} rows, table has {}",
                columns.len(),
                self.records.len()
            )));
        }
        self.rolling = Some(columns);
        Ok(self)
    }

    /// Attach the ISO-8601 week number of every record
    pub fn with_iso_weeks(mut self) -> Self {
        self.weeks = Some(self.records.iter().map(Record::iso_week).collect());
        self
    }

    /// Records flagged as outliers, in table order
    pub fn outliers(&self) -> Vec<&Record> {
        match &self.rolling {
            Some(columns) => columns
                .outlier_indices()
                .into_iter()
                .filter_map(|i| self.records.get(i))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl FromIterator<Record> for WeatherTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WeatherTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::parse_timestamp;

    fn sample_table() -> WeatherTable {
        ["2024-01-01 00:00:00", "2024-01-01 03:00:00", "2024-01-08 00:00:00"]
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                Record::new(
                    parse_timestamp(ts).unwrap(),
                    10.0 + i as f64,
                    50.0,
                    "clear sky",
                )
            })
            .collect()
    }

    #[test]
    fn test_columns() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.temperatures(), vec![10.0, 11.0, 12.0]);
        assert_eq!(table.conditions(), vec!["clear sky"; 3]);
        assert!(table.rolling().is_none());
        assert!(table.outliers().is_empty());
    }

    #[test]
    fn test_with_rolling_checks_length() {
        let table = sample_table();
        let columns = RollingColumns::new(2, 2.0, vec![RollingWindowResult::UNDEFINED; 2]);
        assert!(matches!(
            table.clone().with_rolling(columns),
            Err(Error::InvalidInput(_))
        ));

        let mut rows = vec![RollingWindowResult::UNDEFINED; 3];
        rows[2].is_outlier = true;
        let enriched = table
            .with_rolling(RollingColumns::new(2, 2.0, rows))
            .unwrap();
        assert_eq!(enriched.outliers().len(), 1);
        assert_eq!(enriched.outliers()[0].temperature, 12.0);
    }

    #[test]
    fn test_with_iso_weeks() {
        let table = sample_table().with_iso_weeks();
        assert_eq!(table.weeks(), Some(&[1, 1, 2][..]));
    }

    #[test]
    fn test_band() {
        let row = RollingWindowResult {
            rolling_mean: Some(10.0),
            rolling_std: Some(1.5),
            is_outlier: false,
        };
        assert_eq!(row.band(2.0), Some((7.0, 13.0)));
        assert_eq!(RollingWindowResult::UNDEFINED.band(2.0), None);
    }
}
