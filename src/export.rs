//! CSV and PNG export of the current window
//!
//! CSV files are written with a UTF-8 byte order mark so spreadsheet tools
//! detect the encoding of non-ASCII column names. PNGs are cut from a viewport
//! screenshot by the frontend and encoded here.

use crate::dataset::Dataset;
use crate::error::{Result, ResultExt, SensorScopeError};
use crate::types::Selection;
use image::{Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

/// UTF-8 byte order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Layout of the time column in exported CSV
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Default file name for a CSV export
pub fn default_csv_name(stem: &str) -> String {
    format!("sensor_{}.csv", stem)
}

/// Default file name for a PNG export
pub fn default_png_name(stem: &str) -> String {
    format!("plot_{}.png", stem)
}

/// Columns written by a CSV export
///
/// The time column first, then the sorted union of main and aux sensors,
/// then the status column when it is selected and not already listed.
/// Columns missing from the dataset are skipped.
pub fn export_columns(dataset: &Dataset, selection: &Selection) -> Vec<String> {
    let mut columns = vec![dataset.time_column().to_string()];

    columns.extend(
        selection
            .sensors()
            .into_iter()
            .filter(|name| dataset.column(name).is_some())
            .map(str::to_string),
    );

    if let Some(status) = selection.status.as_deref() {
        if dataset.column(status).is_some() && !columns.iter().any(|c| c == status) {
            columns.push(status.to_string());
        }
    }

    columns
}

/// Write the rows in `rows` to `out` as CSV. Returns the number of data rows.
///
/// Times carry the offset the dataset was loaded with.
pub fn write_csv_to<W: Write>(
    mut out: W,
    dataset: &Dataset,
    rows: Range<usize>,
    columns: &[String],
) -> Result<usize> {
    let rows = rows.start.min(dataset.len())..rows.end.min(dataset.len());
    if rows.is_empty() || columns.is_empty() {
        return Err(SensorScopeError::NoData);
    }

    out.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns)?;

    let time_column = dataset.time_column();
    let cells: Vec<Option<&[String]>> = columns
        .iter()
        .map(|name| {
            if name == time_column {
                None
            } else {
                dataset.column(name).map(|c| c.raw.as_slice())
            }
        })
        .collect();

    for row in rows.clone() {
        let record: Vec<String> = columns
            .iter()
            .zip(&cells)
            .map(|(name, raw)| match raw {
                Some(raw) => raw[row].clone(),
                None if name == time_column => format_export_time(dataset, row),
                None => String::new(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(rows.len())
}

fn format_export_time(dataset: &Dataset, row: usize) -> String {
    let t = dataset.times()[row];
    match t.and_local_timezone(dataset.offset()).single() {
        Some(dt) => dt.format(EXPORT_TIME_FORMAT).to_string(),
        None => t.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
    }
}

/// Write the rows in `rows` to a CSV file.
pub fn write_csv(
    path: &Path,
    dataset: &Dataset,
    rows: Range<usize>,
    columns: &[String],
) -> Result<usize> {
    if rows.is_empty() || columns.is_empty() {
        return Err(SensorScopeError::NoData);
    }
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let written = write_csv_to(BufWriter::new(file), dataset, rows, columns)?;
    tracing::info!("Exported {} rows to {:?}", written, path);
    Ok(written)
}

/// Convert an egui screenshot region into an RGBA image.
pub fn color_image_to_rgba(image: &egui::ColorImage) -> RgbaImage {
    let [w, h] = image.size;
    let mut out = RgbaImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b, a] = image.pixels[y * w + x].to_srgba_unmultiplied();
            out.put_pixel(x as u32, y as u32, Rgba([r, g, b, a]));
        }
    }
    out
}

/// Save an egui image (usually the cropped plot area) as PNG.
pub fn save_png(path: &Path, image: &egui::ColorImage) -> Result<()> {
    if image.size[0] == 0 || image.size[1] == 0 {
        return Err(SensorScopeError::Export("empty plot image".to_string()));
    }
    color_image_to_rgba(image)
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::info!(
        "Saved {}x{} plot image to {:?}",
        image.size[0],
        image.size[1],
        path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, TimeSource};
    use crate::types::AxisRole;
    use chrono::{Duration, FixedOffset, NaiveDate};

    fn dataset() -> Dataset {
        let t0 = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let col = |name: &str, cells: &[&str]| {
            Column::from_raw(name, cells.iter().map(|c| c.to_string()).collect())
        };
        Dataset::from_parts(
            TimeSource::EpochSeconds,
            vec![t0, t0 + Duration::milliseconds(1500)],
            vec![
                col("b", &["1", "2"]),
                col("a", &["x,y", "3"]),
                col("p-run", &["01", "10"]),
            ],
            None,
            0,
        )
        .with_offset(taipei())
    }

    fn taipei() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_export_columns_order() {
        let ds = dataset();
        let mut sel = Selection::default();
        sel.set_selected(AxisRole::Main, "b", true);
        sel.set_selected(AxisRole::Aux, "a", true);
        sel.set_selected(AxisRole::Aux, "missing", true);
        sel.status = Some("p-run".into());

        assert_eq!(export_columns(&ds, &sel), vec!["Timestamp", "a", "b", "p-run"]);
    }

    #[test]
    fn test_status_not_duplicated() {
        let ds = dataset();
        let mut sel = Selection::default();
        sel.set_selected(AxisRole::Main, "p-run", true);
        sel.status = Some("p-run".into());
        assert_eq!(export_columns(&ds, &sel), vec!["Timestamp", "p-run"]);
    }

    #[test]
    fn test_write_csv_bom_and_time() {
        let ds = dataset();
        let mut buf = Vec::new();
        let columns = vec!["Timestamp".to_string(), "a".to_string()];
        let n = write_csv_to(&mut buf, &ds, 0..2, &columns).unwrap();
        assert_eq!(n, 2);

        assert!(buf.starts_with(UTF8_BOM));
        let text = String::from_utf8(buf[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Timestamp,a");
        assert_eq!(lines[1], "2024-05-01 10:00:00+08:00,\"x,y\"");
        assert_eq!(lines[2], "2024-05-01 10:00:01.500+08:00,3");
    }

    #[test]
    fn test_write_csv_no_data() {
        let ds = dataset();
        let columns = vec!["Timestamp".to_string()];
        let err = write_csv_to(Vec::new(), &ds, 1..1, &columns).unwrap_err();
        assert!(matches!(err, SensorScopeError::NoData));
        let err = write_csv_to(Vec::new(), &ds, 0..2, &[]).unwrap_err();
        assert!(matches!(err, SensorScopeError::NoData));
    }

    #[test]
    fn test_export_uses_load_offset() {
        let ds = crate::dataset::read_csv(
            "Timestamp,v\n0,1\n".as_bytes(),
            Path::new("epoch.csv"),
            taipei(),
        )
        .unwrap();
        let mut buf = Vec::new();
        let columns = vec!["Timestamp".to_string(), "v".to_string()];
        write_csv_to(&mut buf, &ds, 0..1, &columns).unwrap();

        let text = String::from_utf8(buf[UTF8_BOM.len()..].to_vec()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "1970-01-01 08:00:00+08:00,1");
        let instant = chrono::DateTime::parse_from_str(
            line.split(',').next().unwrap(),
            "%Y-%m-%d %H:%M:%S%:z",
        )
        .unwrap();
        assert_eq!(instant.timestamp(), 0);
    }

    #[test]
    fn test_default_names() {
        assert_eq!(default_csv_name("a_b"), "sensor_a_b.csv");
        assert_eq!(default_png_name("a_b"), "plot_a_b.png");
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        let img = egui::ColorImage::from_rgba_unmultiplied([4, 3], &[255, 0, 0, 255].repeat(12));
        save_png(&path, &img).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }
}
