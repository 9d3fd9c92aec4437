//! Weekly aggregation by ISO-8601 week number

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::WeatherTable;

/// Mean temperature and humidity of one ISO week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyAverage {
    pub temperature: f64,
    pub humidity: f64,
    /// Records that fell into the week
    pub samples: usize,
}

#[derive(Default)]
struct Accumulator {
    temperature_sum: f64,
    temperature_count: usize,
    humidity_sum: f64,
    humidity_count: usize,
    samples: usize,
}

impl Accumulator {
    fn add(&mut self, temperature: f64, humidity: f64) {
        self.samples += 1;
        if temperature.is_finite() {
            self.temperature_sum += temperature;
            self.temperature_count += 1;
        }
        if humidity.is_finite() {
            self.humidity_sum += humidity;
            self.humidity_count += 1;
        }
    }

    fn finish(&self) -> WeeklyAverage {
        let avg = |sum: f64, count: usize| {
            if count > 0 {
                sum / count as f64
            } else {
                f64::NAN
            }
        };
        WeeklyAverage {
            temperature: avg(self.temperature_sum, self.temperature_count),
            humidity: avg(self.humidity_sum, self.humidity_count),
            samples: self.samples,
        }
    }
}

/// Group records by ISO week number and average temperature and humidity
/// independently. Iteration order is ascending week number.
///
/// Weeks from different years share a key.
pub fn weekly_average(table: &WeatherTable) -> BTreeMap<u32, WeeklyAverage> {
    let mut groups: BTreeMap<u32, Accumulator> = BTreeMap::new();

    for record in table {
        groups
            .entry(record.iso_week())
            .or_default()
            .add(record.temperature, record.humidity);
    }

    groups
        .into_iter()
        .map(|(week, acc)| (week, acc.finish()))
        .collect()
}

/// Attach the ISO week column
pub fn with_iso_weeks(table: WeatherTable) -> WeatherTable {
    table.with_iso_weeks()
}
