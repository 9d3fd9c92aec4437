//! Rolling-window outlier detection
//!
//! Flags temperatures that are more than `threshold` sample standard
//! deviations away from the mean of the window ending at them.

use tracing::{debug, info};

use crate::data::{RollingColumns, RollingWindowResult, WeatherTable};
use crate::error::{Error, Result};

/// Default window size
pub const DEFAULT_WINDOW: usize = 3;

/// Default band width in standard deviations
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Rolling mean / standard deviation outlier detector
#[derive(Clone, Debug, PartialEq)]
pub struct RollingDetector {
    /// Number of consecutive records in each window
    pub window: usize,
    /// Threshold in standard deviations
    pub threshold: f64,
}

impl Default for RollingDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_THRESHOLD)
    }
}

impl RollingDetector {
    /// Create a new detector
    ///
    /// # Arguments
    /// * `window` - Size of the rolling window (at least 1)
    /// * `threshold` - Number of standard deviations for the outlier band
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }

    /// Compute the derived columns for `table` without touching it.
    ///
    /// Fails with [`Error::Data`] on the first non-finite temperature.
    pub fn compute(&self, table: &WeatherTable) -> Result<RollingColumns> {
        if self.window == 0 {
            return Err(Error::InvalidInput(
                "rolling window must be at least 1".to_string(),
            ));
        }

        let temperatures = table.temperatures();
        if let Some(row) = temperatures.iter().position(|t| !t.is_finite()) {
            return Err(Error::Data {
                row,
                column: "temperature",
            });
        }

        let rows = rolling_window(&temperatures, self.window, self.threshold);
        let columns = RollingColumns::new(self.window, self.threshold, rows);

        info!(
            window = self.window,
            rows = columns.len(),
            outliers = columns.outlier_count(),
            "Computed rolling statistics"
        );
        Ok(columns)
    }

    /// Compute and attach the derived columns
    pub fn apply(&self, table: WeatherTable) -> Result<WeatherTable> {
        let columns = self.compute(&table)?;
        table.with_rolling(columns)
    }
}

/// Enrich `table` with rolling mean, rolling std and outlier flags using
/// the default two-standard-deviation band.
pub fn compute_rolling_outliers(table: WeatherTable, window: usize) -> Result<WeatherTable> {
    RollingDetector::new(window, DEFAULT_THRESHOLD).apply(table)
}

/// Per-position rolling statistics.
///
/// Every window is recomputed from its own slice, so a value only
/// influences the rows whose window contains it.
pub fn rolling_window(values: &[f64], window: usize, threshold: f64) -> Vec<RollingWindowResult> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return RollingWindowResult::UNDEFINED;
            }

            let slice = &values[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / window as f64;
            let std = sample_std(slice, mean);
            let is_outlier = std.is_some_and(|s| (values[i] - mean).abs() > threshold * s);

            if is_outlier {
                debug!(row = i, value = values[i], mean, "Outlier");
            }

            RollingWindowResult {
                rolling_mean: Some(mean),
                rolling_std: std,
                is_outlier,
            }
        })
        .collect()
}

/// Sample standard deviation, undefined for fewer than two values
fn sample_std(slice: &[f64], mean: f64) -> Option<f64> {
    if slice.len() < 2 {
        return None;
    }
    let sum_sq: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum();
    Some((sum_sq / (slice.len() - 1) as f64).sqrt())
}
