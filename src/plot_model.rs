//! Figure construction
//!
//! [`build_plot_model`] turns a dataset, the column selection and the window
//! text into plain geometry: background bands, line runs and legend entries.
//! Nothing here touches egui, so every rule of the figure can be tested
//! without a window.

use crate::analysis::segments::state_label;
use crate::analysis::{
    distinct_states, normalize_aux, overlay_av, segment_states, MainRange, TimeWindow,
};
use crate::dataset::{time_to_x, Column, Dataset};
use crate::palette::{av_level, series_color, state_color};
use crate::types::{AxisRole, Selection};
use std::collections::BTreeSet;
use std::ops::Range;

/// Why the figure has nothing (or only bands) to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotMessage {
    /// A window bound could not be parsed
    InvalidTime(String),
    /// No main-axis sensor is selected
    NoMainSensor,
    /// The window contains no rows
    NoData,
}

/// How a series is stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Step,
}

/// A colored background span for one run of a status column
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x_start: f64,
    pub x_end: f64,
    pub state: String,
    /// Legend label, shared by every band of the same state
    pub label: String,
    pub color: [u8; 4],
}

/// Legend entry for a status state
#[derive(Debug, Clone, PartialEq)]
pub struct StateLegend {
    pub label: String,
    pub color: [u8; 4],
}

/// One plotted series, split into runs of finite values
#[derive(Debug, Clone)]
pub struct PlotSeries {
    /// Column the series comes from
    pub column: String,
    /// Legend label
    pub label: String,
    pub role: AxisRole,
    pub kind: LineKind,
    pub color: [u8; 4],
    /// Contiguous runs of `[x, y]`; NaN cells end a run
    pub runs: Vec<Vec<[f64; 2]>>,
}

impl PlotSeries {
    /// Number of plotted points
    pub fn point_count(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }
}

/// Everything needed to draw the figure
#[derive(Debug, Clone, Default)]
pub struct PlotModel {
    /// Parsed window, if the text was valid
    pub window: Option<TimeWindow>,
    /// Rows inside the window
    pub rows: Range<usize>,
    pub bands: Vec<Band>,
    pub state_legend: Vec<StateLegend>,
    pub series: Vec<PlotSeries>,
    pub main_range: Option<MainRange>,
    pub message: Option<PlotMessage>,
    /// The caller should deselect every aux sensor
    pub clear_aux: bool,
}

impl PlotModel {
    /// X bounds of the window
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.window
            .map(|w| (time_to_x(w.start), time_to_x(w.end)))
    }

    /// Padded y range of all finite points
    ///
    /// Pads by 10% of the span, or by 1.0 when every value is equal.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for point in self.series.iter().flat_map(|s| s.runs.iter().flatten()) {
            let y = point[1];
            if !y.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => (y, y),
                Some((lo, hi)) => (lo.min(y), hi.max(y)),
            });
        }
        let (lo, hi) = bounds?;
        let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
        Some((lo - pad, hi + pad))
    }
}

/// Split `(x, y)` pairs into runs at non-finite y values.
pub fn split_runs(xs: &[f64], ys: &[f64]) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if y.is_finite() {
            current.push([x, y]);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Selected columns in file order
fn selected_columns<'a>(
    dataset: &'a Dataset,
    selected: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a Column> + 'a {
    dataset
        .columns()
        .iter()
        .filter(move |c| selected.contains(&c.name))
}

/// Build the figure for the current selection and window text.
///
/// Series of each axis group follow the column order of the file.
pub fn build_plot_model(
    dataset: &Dataset,
    selection: &Selection,
    start_text: &str,
    end_text: &str,
) -> PlotModel {
    let mut model = PlotModel::default();

    let window = match TimeWindow::parse(start_text, end_text) {
        Ok(window) => window,
        Err(e) => {
            tracing::debug!("Not plotting: {}", e);
            let bad = if crate::analysis::parse_time(start_text).is_err() {
                start_text
            } else {
                end_text
            };
            model.message = Some(PlotMessage::InvalidTime(bad.trim().to_string()));
            return model;
        }
    };
    model.window = Some(window);

    let rows = dataset.window_range(window.start, window.end);
    model.rows = rows.clone();
    let times = &dataset.times()[rows.clone()];
    let xs: Vec<f64> = times.iter().map(|t| time_to_x(*t)).collect();

    if let Some(status) = selection.status.as_deref() {
        if let Some(column) = dataset.column(status).filter(|_| !rows.is_empty()) {
            let states = &column.raw[rows.clone()];
            model.bands = segment_states(times, states)
                .into_iter()
                .map(|span| Band {
                    x_start: time_to_x(span.start),
                    x_end: time_to_x(span.end),
                    color: state_color(&span.state),
                    label: state_label(status, &span.state),
                    state: span.state,
                })
                .collect();
            model.state_legend = distinct_states(states)
                .into_iter()
                .map(|state| StateLegend {
                    label: state_label(status, &state),
                    color: state_color(&state),
                })
                .collect();
        }
    }

    if selection.main.is_empty() {
        model.message = Some(PlotMessage::NoMainSensor);
        model.clear_aux = !selection.aux.is_empty();
        return model;
    }

    if rows.is_empty() {
        model.message = Some(PlotMessage::NoData);
        return model;
    }

    let mut color_index = 0;
    let mut next_color = || {
        let c = series_color(color_index);
        color_index += 1;
        c
    };

    let main_values: Vec<(&str, &[f64])> = selected_columns(dataset, &selection.main)
        .map(|c| (c.name.as_str(), &c.numeric[rows.clone()]))
        .collect();

    for (name, values) in &main_values {
        model.series.push(PlotSeries {
            column: name.to_string(),
            label: name.to_string(),
            role: AxisRole::Main,
            kind: LineKind::Solid,
            color: next_color(),
            runs: split_runs(&xs, values),
        });
    }

    model.main_range = MainRange::from_series(main_values.iter().map(|(_, v)| *v));

    if let Some(range) = model.main_range {
        for column in selected_columns(dataset, &selection.aux) {
            let name = &column.name;
            let scaled = normalize_aux(&column.numeric[rows.clone()], &range);
            model.series.push(PlotSeries {
                column: name.clone(),
                label: format!("{} (aux normalized)", name),
                role: AxisRole::Aux,
                kind: LineKind::Dashed,
                color: next_color(),
                runs: split_runs(&xs, &scaled),
            });
        }

        for column in selected_columns(dataset, &selection.av) {
            let name = &column.name;
            let levels: Vec<i8> = column.raw[rows.clone()].iter().map(|s| av_level(s)).collect();
            let ys = overlay_av(&levels, &range);
            model.series.push(PlotSeries {
                column: name.clone(),
                label: name.clone(),
                role: AxisRole::Av,
                kind: LineKind::Step,
                color: next_color(),
                runs: split_runs(&xs, &ys),
            });
        }
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, TimeSource};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn dataset() -> Dataset {
        let times: Vec<_> = (0..4).map(|s| t0() + Duration::seconds(s)).collect();
        let col = |name: &str, cells: &[&str]| {
            Column::from_raw(name, cells.iter().map(|c| c.to_string()).collect())
        };
        Dataset::from_parts(
            TimeSource::EpochSeconds,
            times,
            vec![
                col("temp", &["10", "", "30", "20"]),
                col("flow", &["1", "2", "3", "2"]),
                col("p-run", &["00", "00", "01", "01"]),
                col("av-door", &["11", "10", "00", "11"]),
            ],
            None,
            0,
        )
    }

    const START: &str = "2024-05-01 10:00:00";
    const END: &str = "2024-05-01 10:00:03";

    fn select(main: &[&str], aux: &[&str]) -> Selection {
        let mut sel = Selection::default();
        for m in main {
            sel.set_selected(AxisRole::Main, m, true);
        }
        for a in aux {
            sel.set_selected(AxisRole::Aux, a, true);
        }
        sel
    }

    #[test]
    fn test_invalid_time() {
        let model = build_plot_model(&dataset(), &select(&["temp"], &[]), "bogus", END);
        assert_eq!(model.message, Some(PlotMessage::InvalidTime("bogus".into())));
        assert!(model.bands.is_empty() && model.series.is_empty());
    }

    #[test]
    fn test_no_main_sensor_clears_aux() {
        let mut sel = select(&[], &["flow"]);
        sel.status = Some("p-run".into());
        let model = build_plot_model(&dataset(), &sel, START, END);
        assert_eq!(model.message, Some(PlotMessage::NoMainSensor));
        assert!(model.clear_aux);
        // Bands are still drawn
        assert_eq!(model.bands.len(), 2);
        assert!(model.series.is_empty());
    }

    #[test]
    fn test_empty_window() {
        let model = build_plot_model(
            &dataset(),
            &select(&["temp"], &["flow"]),
            "2024-06-01 00:00:00",
            "2024-06-02 00:00:00",
        );
        assert_eq!(model.message, Some(PlotMessage::NoData));
        assert!(!model.clear_aux);
        assert!(model.bands.is_empty());
    }

    #[test]
    fn test_main_line_split_at_nan() {
        let model = build_plot_model(&dataset(), &select(&["temp"], &[]), START, END);
        assert!(model.message.is_none());
        let temp = &model.series[0];
        assert_eq!(temp.kind, LineKind::Solid);
        assert_eq!(temp.runs.len(), 2);
        assert_eq!(temp.point_count(), 3);
        assert_eq!(model.main_range, Some(MainRange { min: 10.0, max: 30.0 }));
    }

    #[test]
    fn test_series_follow_file_order() {
        // "temp" comes before "flow" in the file
        let model = build_plot_model(&dataset(), &select(&["flow", "temp"], &[]), START, END);
        let columns: Vec<_> = model.series.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["temp", "flow"]);
        assert_eq!(model.series[0].color, series_color(0));
    }

    #[test]
    fn test_aux_normalized_around_center() {
        let model = build_plot_model(&dataset(), &select(&["temp"], &["flow"]), START, END);
        let aux = model.series.iter().find(|s| s.role == AxisRole::Aux).unwrap();
        assert_eq!(aux.label, "flow (aux normalized)");
        assert_eq!(aux.kind, LineKind::Dashed);
        // flow mean is 2, max deviation 1, center 20, quarter 2.5
        let ys: Vec<f64> = aux.runs[0].iter().map(|p| p[1]).collect();
        assert_eq!(ys, vec![17.5, 20.0, 22.5, 20.0]);
    }

    #[test]
    fn test_av_overlay_and_bands() {
        let mut sel = select(&["temp"], &[]);
        sel.set_selected(AxisRole::Av, "av-door", true);
        sel.status = Some("p-run".into());

        let model = build_plot_model(&dataset(), &sel, START, END);

        let av = model.series.iter().find(|s| s.role == AxisRole::Av).unwrap();
        assert_eq!(av.kind, LineKind::Step);
        let ys: Vec<f64> = av.runs[0].iter().map(|p| p[1]).collect();
        assert_eq!(ys, vec![30.0, 20.0, 10.0, 30.0]);

        assert_eq!(model.bands.len(), 2);
        assert_eq!(model.bands[1].x_end - model.bands[1].x_start, 2.0);
        let labels: Vec<_> = model.state_legend.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["p-run=00", "p-run=01"]);
    }

    #[test]
    fn test_y_extent_padding() {
        let model = build_plot_model(&dataset(), &select(&["temp"], &[]), START, END);
        let (lo, hi) = model.y_extent().unwrap();
        assert!((lo - 8.0).abs() < 1e-9);
        assert!((hi - 32.0).abs() < 1e-9);

        let flat = build_plot_model(
            &dataset(),
            &select(&["flow"], &[]),
            "2024-05-01 10:00:01",
            "2024-05-01 10:00:01",
        );
        assert_eq!(flat.y_extent(), Some((1.0, 3.0)));
    }

    #[test]
    fn test_split_runs() {
        let runs = split_runs(&[0.0, 1.0, 2.0, 3.0], &[f64::NAN, 1.0, f64::NAN, 3.0]);
        assert_eq!(runs, vec![vec![[1.0, 1.0]], vec![[3.0, 3.0]]]);
        assert!(split_runs(&[0.0], &[f64::NAN]).is_empty());
    }
}
