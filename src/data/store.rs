//! CSV persistence for forecast tables
//!
//! File layout: header `date,temperature,humidity,weather` followed by one
//! row per record. Derived columns are not persisted.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{Reader, StringRecord, Writer};
use tracing::{debug, info, warn};

use super::record::{parse_timestamp, Record, DATE_FORMAT};
use super::table::WeatherTable;
use crate::error::{Error, Result};

/// Header row of the CSV file
pub const CSV_HEADER: [&str; 4] = ["date", "temperature", "humidity", "weather"];

/// Save a table, overwriting any existing file
pub fn save<P: AsRef<Path>>(table: &WeatherTable, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for record in table {
        writer.write_record([
            record.timestamp.format(DATE_FORMAT).to_string(),
            format_value(record.temperature),
            format_value(record.humidity),
            record.condition.clone(),
        ])?;
    }

    writer.flush()?;
    info!(rows = table.len(), path = %path.display(), "Saved weather table");
    Ok(())
}

/// Load a table written by [`save`]
pub fn load<P: AsRef<Path>>(path: P) -> Result<WeatherTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(columns.parse_row(&row, records.len())?);
    }

    info!(rows = records.len(), path = %path.display(), "Loaded weather table");
    Ok(WeatherTable::new(records))
}

/// Positions of the required columns within a header row
struct ColumnIndex {
    date: usize,
    temperature: usize,
    humidity: usize,
    weather: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                Error::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("missing column '{}'", name),
                ))
            })
        };

        Ok(Self {
            date: find("date")?,
            temperature: find("temperature")?,
            humidity: find("humidity")?,
            weather: find("weather")?,
        })
    }

    fn parse_row(&self, row: &StringRecord, index: usize) -> Result<Record> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| row.get(i).unwrap_or("");

        let date = field(self.date);
        let timestamp = parse_timestamp(date).ok_or_else(|| Error::Format {
            line,
            value: date.to_string(),
        })?;

        Ok(Record {
            timestamp,
            temperature: parse_value(field(self.temperature), index, "temperature"),
            humidity: parse_value(field(self.humidity), index, "humidity"),
            condition: field(self.weather).to_string(),
        })
    }
}

/// Empty or non-numeric fields load as `NaN`; analysis rejects them later.
fn parse_value(value: &str, row: usize, column: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        debug!(row, column, "Missing value");
        return f64::NAN;
    }
    value.parse().unwrap_or_else(|_| {
        warn!(row, column, value, "Non-numeric value");
        f64::NAN
    })
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(
                parse_timestamp("2024-05-01 00:00:00").unwrap(),
                14.2,
                71.0,
                "light rain",
            ),
            Record::new(
                parse_timestamp("2024-05-01 03:00:00").unwrap(),
                13.05,
                f64::NAN,
                "overcast clouds, windy",
            ),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("weather.csv");

        let table = WeatherTable::new(sample_records());
        save(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("date,temperature,humidity,weather\n"));
        assert!(content.contains("2024-05-01 00:00:00,14.2,71,light rain"));

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(0), table.get(0));
        assert_eq!(loaded.get(1).unwrap().condition, "overcast clouds, windy");
        assert!(loaded.get(1).unwrap().humidity.is_nan());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather.csv");

        save(&WeatherTable::new(sample_records()), &path).unwrap();
        save(&WeatherTable::default(), &path).unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_bad_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "date,temperature,humidity,weather").unwrap();
        writeln!(file, "2024-05-01 00:00:00,10,50,clear sky").unwrap();
        writeln!(file, "not a date,11,51,clear sky").unwrap();
        drop(file);

        match load(&path) {
            Err(Error::Format { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather.csv");
        fs::write(
            &path,
            "date,temperature,humidity,weather\n2024-05-01 00:00:00,10\n",
        )
        .unwrap();
        assert!(matches!(load(&path), Err(Error::Csv(_))));

        fs::write(&path, "when,temp\n2024-05-01 00:00:00,10\n").unwrap();
        assert!(matches!(load(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_non_numeric_as_nan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather.csv");
        fs::write(
            &path,
            "date,temperature,humidity,weather\n2024-05-01 00:00:00,warm,50,clear sky\n",
        )
        .unwrap();

        let table = load(&path).unwrap();
        assert!(table.get(0).unwrap().temperature.is_nan());
        assert_eq!(table.get(0).unwrap().humidity, 50.0);
    }
}
