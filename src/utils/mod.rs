//! Configuration, logging and statistical helpers

mod config;
mod logging;
pub mod statistics;

pub use config::{AnalysisSettings, ApiSettings, AppConfig, DataSettings, LoggingSettings};
pub use logging::setup_logging;
