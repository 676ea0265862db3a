//! Statistics pane - per-sensor summary over the window
//!
//! Values are the raw sensor readings, before aux normalization.

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::analysis::SeriesStatistics;
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::ColorSwatch;
use crate::frontend::workspace::PaneKind;
use crate::plot_model::PlotModel;

/// State for the statistics pane
pub struct StatisticsState {
    /// Show standard deviation and RMS columns
    pub show_spread: bool,
}

impl Default for StatisticsState {
    fn default() -> Self {
        Self { show_spread: true }
    }
}

/// One row of the statistics table
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub column: String,
    pub color: Option<[u8; 4]>,
    pub stats: SeriesStatistics,
}

/// Statistics for every selected main and aux sensor in the window
pub fn statistics_rows(shared: &SharedState<'_>) -> Vec<StatisticsRow> {
    let rows = shared.model.rows.clone();
    let selected = shared.selection.sensors();
    shared
        .dataset
        .columns()
        .iter()
        .filter(|column| selected.contains(column.name.as_str()))
        .map(|column| {
            let values = column.numeric.get(rows.clone()).unwrap_or(&[]);
            StatisticsRow {
                column: column.name.clone(),
                color: series_color_of(shared.model, &column.name),
                stats: SeriesStatistics::from_values(values),
            }
        })
        .collect()
}

fn series_color_of(model: &PlotModel, column: &str) -> Option<[u8; 4]> {
    model
        .series
        .iter()
        .find(|s| s.column == column)
        .map(|s| s.color)
}

/// Render the statistics pane
pub fn render(state: &mut StatisticsState, shared: &mut SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.show_spread, t!("stats_show_spread"));
        ui.separator();
        ui.weak(t!("stats_rows", count = shared.model.rows.len()));
    });
    ui.separator();

    let rows = statistics_rows(shared);
    if rows.is_empty() {
        ui.colored_label(Color32::GRAY, t!("stats_empty"));
        return Vec::new();
    }

    let num_cols = if state.show_spread { 9 } else { 6 };

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("statistics_grid")
                .num_columns(num_cols)
                .striped(true)
                .min_col_width(60.0)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("");
                    ui.strong(t!("stats_sensor"));
                    ui.strong(t!("stats_min"));
                    ui.strong(t!("stats_max"));
                    ui.strong(t!("stats_mean"));
                    if state.show_spread {
                        ui.strong(t!("stats_std"));
                        ui.strong(t!("stats_rms"));
                        ui.strong(t!("stats_peak_to_peak"));
                    }
                    ui.strong(t!("stats_count"));
                    ui.end_row();

                    for row in &rows {
                        match row.color {
                            Some(rgba) => {
                                ui.add(ColorSwatch::from_rgba(rgba));
                            }
                            None => {
                                ui.label("");
                            }
                        }
                        ui.label(row.column.as_str());

                        if row.stats.is_valid() {
                            let cell = |v: f64| RichText::new(format!("{:.4}", v)).monospace();
                            ui.label(cell(row.stats.min));
                            ui.label(cell(row.stats.max));
                            ui.label(cell(row.stats.mean));
                            if state.show_spread {
                                ui.label(cell(row.stats.std_dev));
                                ui.label(cell(row.stats.rms));
                                ui.label(cell(row.stats.peak_to_peak()));
                            }
                        } else {
                            let blanks = if state.show_spread { 6 } else { 3 };
                            for _ in 0..blanks {
                                ui.label("-");
                            }
                        }
                        ui.label(format!("{} / {}", row.stats.count, row.stats.count + row.stats.missing));
                        ui.end_row();
                    }
                });
        });

    Vec::new()
}

impl Pane for StatisticsState {
    fn kind(&self) -> PaneKind {
        PaneKind::Statistics
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        render(self, shared, ui)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
