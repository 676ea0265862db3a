//! Shared state types for the frontend
//!
//! This module defines the shared state container and action types used by
//! the workspace-based architecture. Panes receive `SharedState` via borrowing
//! and return `AppAction`s instead of mutating the dataset or selection directly.

use std::path::PathBuf;

use crate::analysis::TimeWindow;
use crate::config::settings::ViewSettings;
use crate::config::AppState;
use crate::dataset::Dataset;
use crate::i18n::Language;
use crate::plot_model::PlotModel;
use crate::types::{AxisRole, Selection};

use super::workspace::{PaneId, PaneKind};

/// Text of the start/end fields
///
/// The fields are free text so a half-typed time never moves the plot; the
/// model is rebuilt from them when editing finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFields {
    pub start: String,
    pub end: String,
}

impl WindowFields {
    /// Fill both fields from a parsed window
    pub fn set(&mut self, window: TimeWindow) {
        let (start, end) = window.to_text();
        self.start = start;
        self.end = end;
    }

    /// Fill both fields with the full span of the dataset
    pub fn cover(&mut self, dataset: &Dataset) {
        match dataset.time_bounds() {
            Some((first, last)) => self.set(TimeWindow::covering(first, last)),
            None => {
                self.start.clear();
                self.end.clear();
            }
        }
    }
}

/// Shared state accessible by all panes (borrowed, not owned).
pub struct SharedState<'a> {
    // Data (read-only for panes)
    pub dataset: &'a Dataset,
    pub model: &'a PlotModel,
    /// Bumped on every model rebuild
    pub model_generation: u64,
    pub selection: &'a Selection,

    // View (panes may zoom/pan y directly)
    pub view: &'a mut ViewSettings,
    pub app_state: &'a AppState,

    /// Screen rectangle of the plot, recorded for PNG export
    pub plot_rect: &'a mut Option<egui::Rect>,
}

/// Actions that any pane, the toolbar or the menu can emit
///
/// Panes return `Vec<AppAction>` instead of mutating state directly.
/// This enables:
/// - Testable pane logic
/// - A single place where the plot model is rebuilt
/// - Centralized action handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Files
    /// Load a CSV, replacing the current data
    OpenCsv(PathBuf),
    /// Load a CSV and merge it into the current data
    AppendCsv(PathBuf),
    /// Export the windowed rows of the selected columns
    ExportCsv,
    /// Export the plot area as PNG
    ExportPng,

    // Selection
    /// Select a status column (or none)
    SetStatus(Option<String>),
    /// Tick or untick a sensor in one of the axis groups
    SetSelected {
        role: AxisRole,
        column: String,
        selected: bool,
    },

    // Window
    /// The window text changed, rebuild the figure
    ApplyWindow,
    /// Shift the window by a number of seconds
    PanWindow(f64),
    /// Reset the window to the whole dataset and y to auto-fit
    ResetView,

    // Dialogs
    /// Open a dialog
    OpenDialog(DialogId),
    /// Switch the UI language
    SetLanguage(Language),

    // Workspace actions
    /// Open/focus a pane, or create it if it does not exist
    OpenPane(PaneKind),
    /// Close a pane (remove from dock and clean up state)
    ClosePane(PaneId),
}

/// Dialog identifiers
///
/// Used with `AppAction::OpenDialog` to specify which dialog to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogId {
    /// Application preferences
    Preferences,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, TimeSource};
    use chrono::NaiveDate;

    #[test]
    fn test_cover_dataset() {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 600)
            .unwrap();
        let t1 = t0 + chrono::Duration::minutes(10);
        let ds = Dataset::from_parts(
            TimeSource::EpochSeconds,
            vec![t0, t1],
            vec![Column::from_raw("a", vec!["1".into(), "2".into()])],
            None,
            0,
        );

        let mut fields = WindowFields::default();
        fields.cover(&ds);
        assert_eq!(fields.start, "2024-01-02 03:04:05");
        assert_eq!(fields.end, "2024-01-02 03:14:06");

        fields.cover(&Dataset::empty(TimeSource::EpochSeconds));
        assert!(fields.start.is_empty() && fields.end.is_empty());
    }
}
