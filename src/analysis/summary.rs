//! Descriptive statistics for a forecast table

use std::collections::HashMap;

use serde::Serialize;

use crate::data::WeatherTable;
use crate::error::Result;
use crate::utils::statistics::{finite, mean, quantile_sorted, sorted, std_dev};

/// Count / mean / std / min / quartiles / max of one numeric column.
///
/// Missing values are skipped; aggregates of an empty column are `NaN`.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Calculate summary statistics
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let values = finite(values);
        let sorted = sorted(&values);

        Self {
            name: name.into(),
            count: values.len(),
            mean: mean(&values),
            std: std_dev(&values, 1),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Number of records carrying one condition label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionCount {
    pub condition: String,
    pub count: usize,
}

/// Table-wide summary
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub rows: usize,
    /// One entry per numeric column, in table column order
    pub columns: Vec<ColumnStats>,
    pub mean_temperature: f64,
    pub mean_humidity: f64,
    /// Descending by count, ties in order of first appearance
    pub condition_counts: Vec<ConditionCount>,
}

impl Summary {
    /// Pretty-printed JSON; missing aggregates become `null`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Statistics of a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn most_common_condition(&self) -> Option<&ConditionCount> {
        self.condition_counts.first()
    }

    /// Share of each condition in [0, 1]
    pub fn condition_shares(&self) -> Vec<(&str, f64)> {
        let total: usize = self.condition_counts.iter().map(|c| c.count).sum();
        self.condition_counts
            .iter()
            .map(|c| {
                let share = if total > 0 {
                    c.count as f64 / total as f64
                } else {
                    0.0
                };
                (c.condition.as_str(), share)
            })
            .collect()
    }
}

/// Summarize every numeric column plus condition frequencies
pub fn summarize(table: &WeatherTable) -> Summary {
    let temperature = ColumnStats::from_values("temperature", &table.temperatures());
    let humidity = ColumnStats::from_values("humidity", &table.humidities());
    let mean_temperature = temperature.mean;
    let mean_humidity = humidity.mean;

    let mut columns = vec![temperature, humidity];

    if let Some(rolling) = table.rolling() {
        let defined =
            |values: Vec<Option<f64>>| -> Vec<f64> { values.into_iter().flatten().collect() };
        columns.push(ColumnStats::from_values("rolling_mean", &defined(rolling.means())));
        columns.push(ColumnStats::from_values("rolling_std", &defined(rolling.stds())));
    }

    if let Some(weeks) = table.weeks() {
        let weeks: Vec<f64> = weeks.iter().map(|&w| f64::from(w)).collect();
        columns.push(ColumnStats::from_values("week", &weeks));
    }

    Summary {
        rows: table.len(),
        columns,
        mean_temperature,
        mean_humidity,
        condition_counts: condition_counts(table),
    }
}

/// Frequency of each distinct condition label
pub fn condition_counts(table: &WeatherTable) -> Vec<ConditionCount> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ConditionCount> = Vec::new();

    for condition in table.conditions() {
        match first_seen.get(condition) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                first_seen.insert(condition, counts.len());
                counts.push(ConditionCount {
                    condition: condition.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
