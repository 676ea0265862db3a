//! Data pane - the windowed rows of the selected columns
//!
//! Shows exactly what a CSV export would write. Rows are virtualized, so
//! large windows stay cheap.

use egui::Ui;
use egui_extras::{Column, TableBuilder};
use rust_i18n::t;

use crate::dataset::Dataset;
use crate::export::export_columns;
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;

const ROW_HEIGHT: f32 = 18.0;

/// State for the data table pane
#[derive(Default)]
pub struct DataTableState {
    /// Show parsed numbers instead of the raw cells
    pub show_parsed: bool,
}

/// Text for one cell of the table
pub fn cell_text(dataset: &Dataset, column: &str, row: usize, parsed: bool) -> String {
    if column == dataset.time_column() {
        return dataset
            .times()
            .get(row)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_default();
    }
    let Some(col) = dataset.column(column) else {
        return String::new();
    };
    if parsed {
        match col.numeric.get(row) {
            Some(v) if v.is_finite() => format!("{}", v),
            _ => String::new(),
        }
    } else {
        col.raw.get(row).cloned().unwrap_or_default()
    }
}

/// Render the data table pane
pub fn render(state: &mut DataTableState, shared: &mut SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
    let mut actions = Vec::new();
    let rows = shared.model.rows.clone();
    let columns = export_columns(shared.dataset, shared.selection);

    ui.horizontal(|ui| {
        ui.checkbox(&mut state.show_parsed, t!("data_show_parsed"));
        ui.separator();
        ui.weak(t!("stats_rows", count = rows.len()));
        if ui
            .add_enabled(!rows.is_empty(), egui::Button::new(t!("menu_export_csv")))
            .clicked()
        {
            actions.push(AppAction::ExportCsv);
        }
    });
    ui.separator();

    if rows.is_empty() || columns.len() < 2 {
        ui.weak(t!("data_empty"));
        return actions;
    }

    let dataset = shared.dataset;
    let parsed = state.show_parsed;

    egui::ScrollArea::horizontal().show(ui, |ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(150.0));
        for _ in 1..columns.len() {
            table = table.column(Column::auto().at_least(60.0).clip(true));
        }

        table
            .header(20.0, |mut header| {
                for name in &columns {
                    header.col(|ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let index = rows.start + row.index();
                    for name in &columns {
                        row.col(|ui| {
                            ui.monospace(cell_text(dataset, name, index, parsed));
                        });
                    }
                });
            });
    });

    actions
}

impl Pane for DataTableState {
    fn kind(&self) -> PaneKind {
        PaneKind::DataTable
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
