//! Weather Forecast Analysis
//!
//! Fetches a 5 day / 3 hour forecast from OpenWeatherMap, stores it as CSV
//! and explores it from an interactive menu.
//!
//! # Modules
//!
//! - `api`: OpenWeatherMap client and the `ForecastSource` seam
//! - `data`: Records, the forecast table and CSV persistence
//! - `analysis`: Summary statistics, rolling outliers, weekly averages
//! - `chart`: Text rendering behind the `Renderer` trait
//! - `menu`: Command state machine driving a session
//! - `utils`: Configuration, logging and statistics helpers
//!
//! # Example
//!
//! ```no_run
//! use weather_analysis::analysis::{summarize, RollingDetector};
//! use weather_analysis::data::store;
//!
//! let table = store::load("weather_data.csv").unwrap();
//! let table = RollingDetector::new(3, 2.0).apply(table).unwrap();
//!
//! let summary = summarize(&table);
//! println!("mean temperature: {:.2}", summary.mean_temperature);
//! for record in table.outliers() {
//!     println!("{} {:.2}", record.date_label(), record.temperature);
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod chart;
pub mod data;
pub mod error;
pub mod menu;
pub mod utils;

pub use error::{Error, Result};
