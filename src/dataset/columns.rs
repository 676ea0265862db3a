//! Column classification
//!
//! Sensor logs mix three kinds of columns: numeric sensor readings, string-coded
//! status registers that partition time into discrete states, and two-bit `av-`
//! status columns that are overlaid on the sensor scale. The prefix of the column
//! name decides which is which.

use serde::{Deserialize, Serialize};

/// Prefixes of status columns rendered as background bands.
pub const SWITCHABLE_PREFIXES: &[&str] = &["p-", "b-", "mx-"];

/// Prefix of two-bit AV status columns.
pub const AV_PREFIX: &str = "av-";

/// Bookkeeping columns that are never plotted.
pub const SKIPPED_COLUMNS: &[&str] = &["ID", "Timestamp", "Date", "Time", "Datetime"];

/// What a column is used for in the picker and the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Numeric time series plotted as a line
    Sensor,
    /// Status column whose values become colored background bands
    Switchable,
    /// Two-bit status column mapped to {-1, 0, 1}
    Av,
    /// Identifier or time bookkeeping column
    Skip,
}

/// Classify a column by its name.
pub fn classify(name: &str) -> ColumnKind {
    if SWITCHABLE_PREFIXES.iter().any(|p| name.starts_with(p)) {
        ColumnKind::Switchable
    } else if name.starts_with(AV_PREFIX) {
        ColumnKind::Av
    } else if SKIPPED_COLUMNS.contains(&name) {
        ColumnKind::Skip
    } else {
        ColumnKind::Sensor
    }
}

/// Case-insensitive substring match used by the column search box.
///
/// An empty (or whitespace-only) query matches everything.
pub fn matches_search(name: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Names of all columns of the given kind, keeping file order
pub fn columns_of_kind<'a, I>(names: I, kind: ColumnKind) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| classify(name) == kind)
        .map(str::to_string)
        .collect()
}

/// Status columns that get background bands (`p-`, `b-`, `mx-`)
pub fn switchable_columns<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    columns_of_kind(names, ColumnKind::Switchable)
}

/// Two-bit `av-` status columns
pub fn av_columns<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    columns_of_kind(names, ColumnKind::Av)
}

/// Plain numeric sensor columns
pub fn sensor_columns<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    columns_of_kind(names, ColumnKind::Sensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify("p-pump1"), ColumnKind::Switchable);
        assert_eq!(classify("b-valve"), ColumnKind::Switchable);
        assert_eq!(classify("mx-mixer"), ColumnKind::Switchable);
        assert_eq!(classify("av-door"), ColumnKind::Av);
        assert_eq!(classify("temp_inlet"), ColumnKind::Sensor);
    }

    #[test]
    fn test_classify_skipped() {
        for name in SKIPPED_COLUMNS {
            assert_eq!(classify(name), ColumnKind::Skip);
        }
        // Only exact names are skipped
        assert_eq!(classify("Timestamp2"), ColumnKind::Sensor);
        assert_eq!(classify("id"), ColumnKind::Sensor);
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(classify("P-pump"), ColumnKind::Sensor);
        assert_eq!(classify("AV-door"), ColumnKind::Sensor);
    }

    #[test]
    fn test_group_helpers_keep_order() {
        let names = ["ID", "Timestamp", "t2", "p-a", "av-x", "t1", "mx-b"];
        assert_eq!(switchable_columns(names), vec!["p-a", "mx-b"]);
        assert_eq!(av_columns(names), vec!["av-x"]);
        assert_eq!(sensor_columns(names), vec!["t2", "t1"]);
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("Temp_Inlet", ""));
        assert!(matches_search("Temp_Inlet", "   "));
        assert!(matches_search("Temp_Inlet", "inlet"));
        assert!(matches_search("Temp_Inlet", " TEMP "));
        assert!(!matches_search("Temp_Inlet", "outlet"));
        assert!(matches_search("溫度-入口", "溫度"));
    }
}
