//! Error types for the weather analysis library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The forecast endpoint answered with a non-success status
    #[error("Failed to fetch data. Status code: {status_code}")]
    Fetch { status_code: u16 },

    /// The response body lacks the expected structure
    #[error("Failed to parse forecast response: {0}")]
    Parse(String),

    /// Transport-level failure (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A date field could not be parsed
    #[error("Invalid date '{value}' on line {line}")]
    Format { line: u64, value: String },

    /// Non-numeric or missing value in a required numeric column
    #[error("Invalid value in column '{column}' at row {row}")]
    Data { row: usize, column: &'static str },

    /// Invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A chart could not be drawn
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error came from the remote forecast service
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Parse(_) | Error::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let error = Error::Fetch { status_code: 404 };
        assert_eq!(error.to_string(), "Failed to fetch data. Status code: 404");
        assert!(error.is_remote());
    }

    #[test]
    fn test_data_error_message() {
        let error = Error::Data {
            row: 3,
            column: "temperature",
        };
        assert_eq!(
            error.to_string(),
            "Invalid value in column 'temperature' at row 3"
        );
        assert!(!error.is_remote());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
    }
}
