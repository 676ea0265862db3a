//! Time window shown in the plot
//!
//! The window is edited as two text fields, so it is parsed from text on every
//! rebuild and written back as text after a pan.

use crate::error::{Result, SensorScopeError};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// Layout used when writing times back into the fields
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S"];

/// Parse a window bound. A bare date means midnight.
pub fn parse_time(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| SensorScopeError::InvalidTime(text.to_string()))
}

/// Format a time for the text fields. Sub-second precision is dropped.
pub fn format_time(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Smallest whole-second window containing `first..=last`
    pub fn covering(first: NaiveDateTime, last: NaiveDateTime) -> Self {
        let floor = |t: NaiveDateTime| t.with_nanosecond(0).unwrap_or(t);
        let end = if last.nanosecond() > 0 {
            floor(last)
                .checked_add_signed(Duration::seconds(1))
                .unwrap_or(last)
        } else {
            last
        };
        Self {
            start: floor(first),
            end,
        }
    }

    /// Parse both bounds from the text fields
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_time(start)?,
            end: parse_time(end)?,
        })
    }

    /// Both bounds as field text
    pub fn to_text(&self) -> (String, String) {
        (format_time(self.start), format_time(self.end))
    }

    /// Shift both ends by `seconds` (may be fractional or negative)
    ///
    /// A shift that would leave the representable time range keeps the
    /// window where it is.
    pub fn pan(&self, seconds: f64) -> Self {
        let shift = |delta: Duration| {
            Some(Self {
                start: self.start.checked_add_signed(delta)?,
                end: self.end.checked_add_signed(delta)?,
            })
        };
        Duration::try_milliseconds((seconds * 1000.0).round() as i64)
            .and_then(shift)
            .unwrap_or(*self)
    }

    /// File name stem used by the export dialogs
    pub fn export_stem(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y%m%d_%H%M%S"),
            self.end.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, TIME_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = dt("2024-05-01 13:04:05");
        assert_eq!(parse_time("2024-05-01 13:04:05").unwrap(), expected);
        assert_eq!(parse_time("  2024/05/01 13:04:05 ").unwrap(), expected);
        assert_eq!(parse_time("2024-05-01 13:04").unwrap(), dt("2024-05-01 13:04:00"));
        assert_eq!(parse_time("2024-05-01").unwrap(), dt("2024-05-01 00:00:00"));
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_time("2024-13-01 00:00:00").unwrap_err();
        assert!(matches!(err, SensorScopeError::InvalidTime(_)));
        assert!(parse_time("").is_err());
        assert!(TimeWindow::parse("2024-05-01", "soon").is_err());
    }

    #[test]
    fn test_format_truncates_subseconds() {
        let t = dt("2024-05-01 13:04:05") + Duration::milliseconds(750);
        assert_eq!(format_time(t), "2024-05-01 13:04:05");
    }

    #[test]
    fn test_covering_rounds_outward() {
        let first = dt("2024-05-01 10:00:00") + Duration::milliseconds(400);
        let last = dt("2024-05-01 10:59:59") + Duration::milliseconds(1);
        let window = TimeWindow::covering(first, last);
        assert_eq!(
            window.to_text(),
            ("2024-05-01 10:00:00".to_string(), "2024-05-01 11:00:00".to_string())
        );

        let exact = TimeWindow::covering(dt("2024-05-01 10:00:00"), dt("2024-05-01 10:00:05"));
        assert_eq!(exact.end, dt("2024-05-01 10:00:05"));
    }

    #[test]
    fn test_pan() {
        let window = TimeWindow::parse("2024-05-01 10:00:00", "2024-05-01 11:00:00").unwrap();
        let moved = window.pan(-90.0);
        assert_eq!(
            moved.to_text(),
            ("2024-05-01 09:58:30".to_string(), "2024-05-01 10:58:30".to_string())
        );
        assert_eq!(moved.end - moved.start, Duration::hours(1));
    }

    #[test]
    fn test_extreme_times_do_not_overflow() {
        let window = TimeWindow::covering(NaiveDateTime::MIN, NaiveDateTime::MAX);
        assert_eq!(window.end, NaiveDateTime::MAX);

        let edge = TimeWindow::new(NaiveDateTime::MAX - Duration::seconds(10), NaiveDateTime::MAX);
        assert_eq!(edge.pan(5.0), edge);
        assert_eq!(edge.pan(f64::MAX), edge);
        assert_eq!(edge.pan(-5.0).end, NaiveDateTime::MAX - Duration::seconds(5));
    }

    #[test]
    fn test_export_stem() {
        let window = TimeWindow::parse("2024-05-01 10:00:00", "2024-05-02 08:30:15").unwrap();
        assert_eq!(window.export_stem(), "20240501_100000_20240502_083015");
    }
}
