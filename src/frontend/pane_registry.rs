//! Pane registry - data-driven pane registration.
//!
//! The registry is the single source of truth for all pane kinds:
//! translation keys for their titles and factory functions.
//! The View menu and workspace pane creation are driven from this data.

use crate::frontend::pane_trait::Pane;
use crate::frontend::panes::{ColumnPickerState, DataTableState, PlotPaneState, StatisticsState};
use crate::frontend::workspace::PaneKind;

/// Metadata for a pane kind, including its factory function.
pub struct PaneKindInfo {
    pub kind: PaneKind,
    /// Translation key of the tab title
    pub title_key: &'static str,
    pub factory: fn() -> Box<dyn Pane>,
}

/// Build the pane registry with all known pane kinds, in menu order.
pub fn build_registry() -> Vec<PaneKindInfo> {
    vec![
        PaneKindInfo {
            kind: PaneKind::ColumnPicker,
            title_key: "pane_columns",
            factory: || Box::new(ColumnPickerState::default()),
        },
        PaneKindInfo {
            kind: PaneKind::Plot,
            title_key: "pane_plot",
            factory: || Box::new(PlotPaneState::default()),
        },
        PaneKindInfo {
            kind: PaneKind::Statistics,
            title_key: "pane_statistics",
            factory: || Box::new(StatisticsState::default()),
        },
        PaneKindInfo {
            kind: PaneKind::DataTable,
            title_key: "pane_data",
            factory: || Box::new(DataTableState::default()),
        },
    ]
}
