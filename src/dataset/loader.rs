//! CSV loading and time axis inference
//!
//! The header row names the columns. The time axis comes from a `Timestamp`
//! column of Unix epoch seconds when there is one, otherwise from a `Date` and
//! `Time` pair. Rows whose time does not parse are dropped and counted.

use super::{Column, Dataset, TimeSource};
use crate::error::{Result, ResultExt, SensorScopeError};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Accepted layouts for `"{Date} {Time}"`
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S%.f",
    "%Y%m%d %H%M%S",
];

/// Load a CSV file, converting epoch timestamps into `offset`.
pub fn load_csv(path: &Path, offset: FixedOffset) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    read_csv(BufReader::new(file), path, offset)
}

/// Read CSV data from any reader. `source` is recorded as the file of origin.
pub fn read_csv<R: Read>(reader: R, source: &Path, offset: FixedOffset) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let blank_header =
        headers.len() == 1 && headers[0].trim_start_matches('\u{feff}').trim().is_empty();
    if headers.is_empty() || blank_header {
        tracing::warn!("{:?} is empty", source);
        let mut dataset = Dataset::empty(TimeSource::EpochSeconds).with_offset(offset);
        dataset.sources.push(source.to_path_buf());
        return Ok(dataset);
    }

    let names = unique_names(&headers);
    let time = TimeColumns::detect(&names).ok_or_else(|| SensorScopeError::MissingTimeColumn {
        path: source.to_path_buf(),
    })?;

    let width = names.len();
    let mut times = Vec::new();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); width];
    let mut dropped = 0usize;
    let mut ragged = 0usize;

    for (line, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", line + 2))?;
        if record.len() != width {
            ragged += 1;
        }

        let row: Vec<String> = (0..width)
            .map(|i| {
                record
                    .get(i)
                    .map(|b| String::from_utf8_lossy(b).into_owned())
                    .unwrap_or_default()
            })
            .collect();

        let Some(t) = time.parse_row(&row, offset) else {
            dropped += 1;
            continue;
        };

        times.push(t);
        for (column, cell) in cells.iter_mut().zip(row) {
            column.push(cell);
        }
    }

    if ragged > 0 {
        tracing::warn!("{} rows in {:?} had a different field count than the header", ragged, source);
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .enumerate()
        .filter(|(i, _)| Some(*i) != time.replaced_column())
        .map(|(_, (name, raw))| Column::from_raw(name, raw))
        .collect();

    let dataset = Dataset::from_parts(
        time.source(),
        times,
        columns,
        Some(source.to_path_buf()),
        dropped,
    )
    .with_offset(offset);

    tracing::info!(
        "Loaded {} rows ({} dropped) with {} columns from {:?}",
        dataset.len(),
        dropped,
        dataset.columns().len(),
        source
    );

    Ok(dataset)
}

/// Make header names unique the way pandas does (`x`, `x.1`, `x.2`).
///
/// A leading byte order mark is stripped and blank names become `Unnamed: {i}`.
pub fn unique_names(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = if i == 0 {
                raw.trim_start_matches('\u{feff}')
            } else {
                raw.as_str()
            };
            let base = if raw.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                raw.to_string()
            };

            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

/// Header positions of the time columns
#[derive(Debug, Clone, Copy)]
enum TimeColumns {
    Epoch { timestamp: usize },
    DateAndTime { date: usize, time: usize },
}

impl TimeColumns {
    fn detect(names: &[String]) -> Option<Self> {
        let find = |name: &str| names.iter().position(|n| n == name);
        if let Some(timestamp) = find("Timestamp") {
            return Some(TimeColumns::Epoch { timestamp });
        }
        Some(TimeColumns::DateAndTime {
            date: find("Date")?,
            time: find("Time")?,
        })
    }

    fn source(&self) -> TimeSource {
        match self {
            TimeColumns::Epoch { .. } => TimeSource::EpochSeconds,
            TimeColumns::DateAndTime { .. } => TimeSource::DateAndTime,
        }
    }

    /// The raw column that becomes the time axis itself
    fn replaced_column(&self) -> Option<usize> {
        match self {
            TimeColumns::Epoch { timestamp } => Some(*timestamp),
            TimeColumns::DateAndTime { .. } => None,
        }
    }

    fn parse_row(&self, row: &[String], offset: FixedOffset) -> Option<NaiveDateTime> {
        match *self {
            TimeColumns::Epoch { timestamp } => parse_epoch_seconds(&row[timestamp], offset),
            TimeColumns::DateAndTime { date, time } => parse_date_time(&row[date], &row[time]),
        }
    }
}

/// Parse Unix epoch seconds (fractions allowed) into wall-clock time at `offset`.
pub fn parse_epoch_seconds(cell: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let value: f64 = cell.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let secs = value.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    let nanos = (((value - secs) * 1e9).round() as u32).min(999_999_999);
    let utc = DateTime::from_timestamp(secs as i64, nanos)?;
    Some(utc.with_timezone(&offset).naive_local())
}

/// Parse separate date and time cells as local wall-clock time.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use std::path::PathBuf;

    fn taipei() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn read(text: &str) -> Result<Dataset> {
        read_csv(text.as_bytes(), &PathBuf::from("mem.csv"), taipei())
    }

    #[test]
    fn test_epoch_seconds_to_offset() {
        let t = parse_epoch_seconds("0", taipei()).unwrap();
        assert_eq!(
            t,
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
        );

        let t = parse_epoch_seconds(" 1.5 ", FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(t.and_utc().timestamp_subsec_millis(), 500);

        assert!(parse_epoch_seconds("", taipei()).is_none());
        assert!(parse_epoch_seconds("abc", taipei()).is_none());
        assert!(parse_epoch_seconds("inf", taipei()).is_none());
        assert!(parse_epoch_seconds("1e30", taipei()).is_none());
    }

    #[test]
    fn test_date_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(13, 4, 5)
            .unwrap();
        assert_eq!(parse_date_time("2024-05-01", "13:04:05"), Some(expected));
        assert_eq!(parse_date_time("2024/05/01", "13:04:05"), Some(expected));
        assert_eq!(parse_date_time("05/01/2024", "13:04:05"), Some(expected));
        assert_eq!(parse_date_time("01.05.2024", "13:04:05"), Some(expected));
        assert_eq!(
            parse_date_time("2024-05-01", "13:04"),
            Some(expected.with_second(0).unwrap())
        );
        assert!(parse_date_time("2024-05-01", "13:04:05.250").is_some());
        assert!(parse_date_time("yesterday", "noon").is_none());
    }

    #[test]
    fn test_unique_names() {
        let headers: Vec<String> = ["\u{feff}ID", "x", "x", "", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            unique_names(&headers),
            vec!["ID", "x", "x.1", "Unnamed: 3", "x.2"]
        );
    }

    #[test]
    fn test_timestamp_column_is_the_time_axis() {
        let ds = read("ID,Timestamp,temp\n1,0,20.5\n2,60,21\n").unwrap();
        assert_eq!(ds.time_source(), TimeSource::EpochSeconds);
        assert_eq!(ds.len(), 2);
        assert!(ds.column("Timestamp").is_none());
        assert_eq!(ds.column("temp").unwrap().numeric, vec![20.5, 21.0]);
        assert_eq!(ds.times()[0].format("%H:%M").to_string(), "08:00");
    }

    #[test]
    fn test_date_time_columns_kept() {
        let ds = read("Date,Time,p-run\n2024-05-01,10:00:01,01\n2024-05-01,10:00:00,00\n").unwrap();
        assert_eq!(ds.time_source(), TimeSource::DateAndTime);
        assert_eq!(ds.time_column(), "Datetime");
        assert!(ds.column("Date").is_some());
        // Sorted ascending
        assert_eq!(ds.column("p-run").unwrap().raw, vec!["00", "01"]);
    }

    #[test]
    fn test_timestamp_wins_over_date_time() {
        let ds = read("Date,Time,Timestamp\n2024-05-01,10:00:00,0\n").unwrap();
        assert_eq!(ds.time_source(), TimeSource::EpochSeconds);
    }

    #[test]
    fn test_missing_time_column() {
        let err = read("a,b\n1,2\n").unwrap_err();
        assert!(matches!(err, SensorScopeError::MissingTimeColumn { .. }));
        let err = read("Date,b\n2024-01-01,2\n").unwrap_err();
        assert!(matches!(err, SensorScopeError::MissingTimeColumn { .. }));
    }

    #[test]
    fn test_bad_rows_dropped() {
        let ds = read("Timestamp,v\n0,1\nnot-a-time,2\n,3\n120,4\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows(), 2);
        assert_eq!(ds.column("v").unwrap().raw, vec!["1", "4"]);
    }

    #[test]
    fn test_ragged_rows_padded() {
        let ds = read("Timestamp,a,b\n0,1\n1,2,3,4\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("b").unwrap().raw, vec!["", "3"]);
    }

    #[test]
    fn test_empty_inputs() {
        let ds = read("").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.sources().len(), 1);

        let ds = read("Timestamp,v\n").unwrap();
        assert!(ds.is_empty());
        assert!(ds.column("v").is_some());
    }

    #[test]
    fn test_bom_stripped() {
        let ds = read("\u{feff}Timestamp,v\n0,1\n").unwrap();
        assert_eq!(ds.len(), 1);
    }
}
