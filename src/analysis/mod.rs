//! Statistics engine
//!
//! - `rolling`: rolling mean / std and outlier flags
//! - `summary`: describe-style column statistics and condition frequencies
//! - `weekly`: ISO-week averages

mod rolling;
mod summary;
mod weekly;

pub use rolling::{
    compute_rolling_outliers, rolling_window, RollingDetector, DEFAULT_THRESHOLD, DEFAULT_WINDOW,
};
pub use summary::{condition_counts, summarize, ColumnStats, ConditionCount, Summary};
pub use weekly::{weekly_average, with_iso_weeks, WeeklyAverage};
