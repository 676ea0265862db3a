//! Test data builders for sensor CSV files

use std::path::{Path, PathBuf};

/// Builder for sensor logs with a `Timestamp` column of epoch seconds
///
/// Rows are one second apart, starting at `start_epoch`.
pub struct CsvBuilder {
    start_epoch: i64,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvBuilder {
    pub fn new(start_epoch: i64) -> Self {
        Self {
            start_epoch,
            headers: vec!["Timestamp".to_string()],
            rows: Vec::new(),
        }
    }

    /// Add a column; `cells` are padded with blanks to the row count
    pub fn column(mut self, name: &str, cells: &[&str]) -> Self {
        self.headers.push(name.to_string());
        let width = self.headers.len();
        while self.rows.len() < cells.len() {
            let t = self.start_epoch + self.rows.len() as i64;
            self.rows.push(vec![t.to_string()]);
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.resize(width - 1, String::new());
            row.push(cells.get(i).copied().unwrap_or("").to_string());
        }
        self
    }

    /// CSV text
    pub fn build(&self) -> String {
        let mut out = self.headers.join(",");
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    /// Write the CSV into `dir` and return its path
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_builder() {
        let csv = CsvBuilder::new(100)
            .column("temp", &["1.5", "2.5"])
            .column("p-run", &["1"])
            .build();

        assert_eq!(csv, "Timestamp,temp,p-run\n100,1.5,1\n101,2.5,\n");
    }
}
