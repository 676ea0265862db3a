//! In-memory sensor log
//!
//! A [`Dataset`] holds the rows of one or more CSV files, sorted by time. Every
//! cell is kept verbatim for export and the data table, alongside a numeric
//! view (NaN where the cell is not a number) for plotting and statistics.
//!
//! # Main Types
//!
//! - [`Dataset`] - Time axis plus columns, always sorted ascending by time
//! - [`Column`] - Raw and numeric values of one CSV column
//! - [`TimeSource`] - Which header the time axis was inferred from
//!
//! Times are stored as local wall-clock [`NaiveDateTime`] values in the display
//! offset chosen at load time, which the dataset remembers. The plot works in
//! seconds via [`time_to_x`].

pub mod columns;
pub mod loader;

pub use columns::{classify, matches_search, ColumnKind};
pub use loader::{load_csv, read_csv};

use crate::error::{Result, SensorScopeError};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Where the time axis of a dataset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// A `Timestamp` column of Unix epoch seconds (UTC)
    EpochSeconds,
    /// `Date` and `Time` columns in local wall-clock time
    DateAndTime,
}

impl TimeSource {
    /// Name of the time column as shown in tables and exports
    pub fn column_name(&self) -> &'static str {
        match self {
            TimeSource::EpochSeconds => "Timestamp",
            TimeSource::DateAndTime => "Datetime",
        }
    }
}

/// One CSV column
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    /// Cells exactly as read
    pub raw: Vec<String>,
    /// Parsed cells, NaN where the cell is empty or not a number
    pub numeric: Vec<f64>,
}

impl Column {
    /// Build a column from raw cells, classifying it by name
    pub fn from_raw(name: impl Into<String>, raw: Vec<String>) -> Self {
        let name = name.into();
        let numeric = raw.iter().map(|cell| parse_number(cell)).collect();
        Self {
            kind: classify(&name),
            name,
            raw,
            numeric,
        }
    }

    fn permute(&mut self, order: &[usize]) {
        let mut raw = std::mem::take(&mut self.raw);
        self.raw = order.iter().map(|&i| std::mem::take(&mut raw[i])).collect();
        self.numeric = order.iter().map(|&i| self.numeric[i]).collect();
    }
}

/// Parse a cell as a number, NaN when it is not one
pub fn parse_number(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Seconds of a wall-clock time, used as the plot x coordinate
pub fn time_to_x(t: NaiveDateTime) -> f64 {
    let utc = t.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// Inverse of [`time_to_x`]
pub fn x_to_time(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    let secs = x.floor();
    let nanos = (((x - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos).map(|dt| dt.naive_utc())
}

/// Rows of one or more CSV files, sorted by time
#[derive(Debug, Clone)]
pub struct Dataset {
    time_source: TimeSource,
    times: Vec<NaiveDateTime>,
    columns: Vec<Column>,
    sources: Vec<PathBuf>,
    dropped_rows: usize,
    /// Offset the wall-clock times are expressed in
    offset: FixedOffset,
}

impl Dataset {
    /// Create an empty dataset
    pub fn empty(time_source: TimeSource) -> Self {
        Self {
            time_source,
            times: Vec::new(),
            columns: Vec::new(),
            sources: Vec::new(),
            dropped_rows: 0,
            offset: Utc.fix(),
        }
    }

    /// Build a dataset from parsed rows, sorting them by time
    ///
    /// Every column must have one cell per time. Short columns are padded
    /// with empty cells.
    pub fn from_parts(
        time_source: TimeSource,
        times: Vec<NaiveDateTime>,
        columns: Vec<Column>,
        source: Option<PathBuf>,
        dropped_rows: usize,
    ) -> Self {
        let n = times.len();
        let columns = columns
            .into_iter()
            .map(|mut c| {
                if c.raw.len() != n {
                    c.raw.resize(n, String::new());
                    c.numeric.resize(n, f64::NAN);
                }
                c
            })
            .collect();

        let mut dataset = Self {
            time_source,
            times,
            columns,
            sources: source.into_iter().collect(),
            dropped_rows,
            offset: Utc.fix(),
        };
        dataset.sort_by_time();
        dataset
    }

    fn sort_by_time(&mut self) {
        if self.times.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..self.times.len()).collect();
        // Stable, so rows with equal times keep file order
        order.sort_by_key(|&i| self.times[i]);
        self.times = order.iter().map(|&i| self.times[i]).collect();
        for column in &mut self.columns {
            column.permute(&order);
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Record the offset the times were converted to
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Offset the wall-clock times are expressed in
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn time_source(&self) -> TimeSource {
        self.time_source
    }

    /// Name of the time column
    pub fn time_column(&self) -> &'static str {
        self.time_source.column_name()
    }

    /// Sorted row times
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column exists, counting the time column
    pub fn has_column(&self, name: &str) -> bool {
        name == self.time_column() || self.column(name).is_some()
    }

    /// Files the rows were loaded from
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Rows skipped because their time could not be parsed
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// First and last time, if there are rows
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Index range of rows with `start <= t <= end`
    pub fn window_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Range<usize> {
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t <= end);
        lo..hi.max(lo)
    }

    /// Merge the rows of another dataset into this one
    ///
    /// Columns are unioned in first-seen order; rows missing a column get an
    /// empty cell. Both datasets must use the same time column and the same
    /// offset, unless this one has never held any data.
    pub fn append(&mut self, other: Dataset) -> Result<()> {
        if self.is_empty() && self.columns.is_empty() {
            let mut other = other;
            let mut sources = std::mem::take(&mut self.sources);
            sources.append(&mut other.sources);
            other.sources = sources;
            other.dropped_rows += self.dropped_rows;
            *self = other;
            return Ok(());
        }

        if self.time_source != other.time_source {
            return Err(SensorScopeError::IncompatibleTimeColumn {
                existing: self.time_column().to_string(),
                incoming: other.time_column().to_string(),
            });
        }

        if self.offset != other.offset {
            return Err(SensorScopeError::IncompatibleOffset {
                existing: self.offset.to_string(),
                incoming: other.offset.to_string(),
            });
        }

        let own_len = self.len();
        let other_len = other.len();
        let Dataset {
            times: other_times,
            columns: other_columns,
            sources: other_sources,
            dropped_rows: other_dropped,
            ..
        } = other;

        let mut incoming: Vec<Option<Column>> = other_columns.into_iter().map(Some).collect();

        for column in &mut self.columns {
            match incoming
                .iter_mut()
                .find(|c| c.as_ref().is_some_and(|c| c.name == column.name))
                .and_then(Option::take)
            {
                Some(theirs) => {
                    column.raw.extend(theirs.raw);
                    column.numeric.extend(theirs.numeric);
                }
                None => {
                    column.raw.resize(own_len + other_len, String::new());
                    column.numeric.resize(own_len + other_len, f64::NAN);
                }
            }
        }

        for theirs in incoming.into_iter().flatten() {
            let mut raw = vec![String::new(); own_len];
            raw.extend(theirs.raw);
            let mut numeric = vec![f64::NAN; own_len];
            numeric.extend(theirs.numeric);
            self.columns.push(Column {
                name: theirs.name,
                kind: theirs.kind,
                raw,
                numeric,
            });
        }

        self.times.extend(other_times);
        self.sources.extend(other_sources);
        self.dropped_rows += other_dropped;
        self.sort_by_time();

        tracing::debug!(
            "Merged {} rows, dataset now has {} rows and {} columns",
            other_len,
            self.len(),
            self.columns.len()
        );
        Ok(())
    }

    /// Short label for the loaded files (first name plus a count)
    pub fn source_label(&self) -> String {
        let name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        };
        match self.sources.as_slice() {
            [] => String::new(),
            [only] => name(only),
            [first, rest @ ..] => format!("{} (+{})", name(first), rest.len()),
        }
    }
}
