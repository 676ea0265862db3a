//! Explorer state: the loaded data, the selection and the current figure
//!
//! Everything the UI changes in response to an [`AppAction`] that does not
//! need a window lives here, so the rebuild rules can be tested headless.
//!
//! [`AppAction`]: crate::frontend::state::AppAction

use crate::analysis::TimeWindow;
use crate::backend::LoadMode;
use crate::config::settings::ViewSettings;
use crate::dataset::{Dataset, TimeSource};
use crate::error::Result;
use crate::plot_model::{build_plot_model, PlotModel};
use crate::types::{AxisRole, Selection};

use super::state::WindowFields;

/// Data, selection, window text and the figure built from them
pub struct ExplorerState {
    pub dataset: Dataset,
    pub selection: Selection,
    /// Window text as currently typed
    pub window: WindowFields,
    /// Window text the model was last built from
    applied: WindowFields,
    pub model: PlotModel,
    /// Bumped on every rebuild
    pub generation: u64,
    pub view: ViewSettings,
}

impl ExplorerState {
    pub fn new(view: ViewSettings) -> Self {
        Self {
            dataset: Dataset::empty(TimeSource::EpochSeconds),
            selection: Selection::default(),
            window: WindowFields::default(),
            applied: WindowFields::default(),
            model: PlotModel::default(),
            generation: 0,
            view,
        }
    }

    /// Rebuild the figure from the current data, selection and window text
    pub fn rebuild(&mut self) {
        self.model = if self.dataset.columns().is_empty() {
            PlotModel::default()
        } else {
            build_plot_model(
                &self.dataset,
                &self.selection,
                &self.window.start,
                &self.window.end,
            )
        };

        if self.model.clear_aux {
            tracing::debug!("No main sensor selected, clearing aux selection");
            self.selection.clear_aux();
        }

        self.applied = self.window.clone();
        self.generation += 1;
    }

    /// Take in a freshly loaded dataset
    ///
    /// `Replace` resets the window to the new data; `Append` keeps the window
    /// unless nothing was loaded before. Selections of columns that no longer
    /// exist are dropped.
    pub fn install(&mut self, dataset: Dataset, mode: LoadMode) -> Result<()> {
        let had_data = !self.dataset.columns().is_empty();
        match mode {
            LoadMode::Replace => self.dataset = dataset,
            LoadMode::Append => self.dataset.append(dataset)?,
        }

        if mode == LoadMode::Replace || !had_data {
            self.window.cover(&self.dataset);
        }

        let dataset = &self.dataset;
        self.selection.retain_existing(|name| dataset.has_column(name));
        self.view.clear_y_range();
        self.rebuild();
        Ok(())
    }

    /// Rebuild when the window text differs from the last applied text.
    ///
    /// Returns whether a rebuild happened.
    pub fn apply_window(&mut self) -> bool {
        if self.window == self.applied {
            return false;
        }
        self.view.clear_y_range();
        self.rebuild();
        true
    }

    /// Shift the window by `seconds`; ignored while the window text is invalid
    pub fn pan_window(&mut self, seconds: f64) {
        match TimeWindow::parse(&self.window.start, &self.window.end) {
            Ok(window) => {
                self.window.set(window.pan(seconds));
                self.rebuild();
            }
            Err(e) => tracing::debug!("Ignoring pan: {}", e),
        }
    }

    /// Window back to the whole dataset, y back to auto-fit
    pub fn reset_view(&mut self) {
        self.window.cover(&self.dataset);
        self.view.clear_y_range();
        self.rebuild();
    }

    /// Select a status column, or none
    pub fn set_status(&mut self, status: Option<String>) {
        self.selection.status = status;
        self.view.clear_y_range();
        self.rebuild();
    }

    /// Tick or untick a column in one of the axis groups
    pub fn set_selected(&mut self, role: AxisRole, column: &str, selected: bool) {
        self.selection.set_selected(role, column, selected);
        self.view.clear_y_range();
        self.rebuild();
    }

    /// Whether the current window holds any rows
    pub fn has_rows(&self) -> bool {
        !self.model.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::plot_model::PlotMessage;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    fn t(secs: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(secs)
    }

    fn dataset(name: &str, start: i64, columns: &[&str]) -> Dataset {
        let times: Vec<_> = (0..10).map(|i| t(start + i)).collect();
        let columns = columns
            .iter()
            .map(|c| Column::from_raw(*c, (0..10).map(|i| i.to_string()).collect()))
            .collect();
        Dataset::from_parts(
            TimeSource::EpochSeconds,
            times,
            columns,
            Some(PathBuf::from(name)),
            0,
        )
    }

    #[test]
    fn test_install_covers_window() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp"]), LoadMode::Replace)
            .unwrap();

        assert_eq!(ex.window.start, "2024-05-01 12:00:00");
        assert_eq!(ex.window.end, "2024-05-01 12:00:09");
        assert_eq!(ex.generation, 1);
        assert_eq!(ex.model.message, Some(PlotMessage::NoMainSensor));
    }

    #[test]
    fn test_replace_drops_missing_selection() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp", "hum"]), LoadMode::Replace)
            .unwrap();
        ex.set_selected(AxisRole::Main, "temp", true);
        ex.set_selected(AxisRole::Main, "hum", true);

        ex.install(dataset("b.csv", 100, &["temp"]), LoadMode::Replace)
            .unwrap();
        assert!(ex.selection.contains(AxisRole::Main, "temp"));
        assert!(!ex.selection.contains(AxisRole::Main, "hum"));
        assert_eq!(ex.window.start, "2024-05-01 12:01:40");
    }

    #[test]
    fn test_append_keeps_window() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp"]), LoadMode::Replace)
            .unwrap();
        let window = ex.window.clone();

        ex.install(dataset("b.csv", 10, &["hum"]), LoadMode::Append)
            .unwrap();
        assert_eq!(ex.window, window);
        assert_eq!(ex.dataset.len(), 20);
        assert!(ex.dataset.has_column("hum"));

        ex.reset_view();
        assert_eq!(ex.window.end, "2024-05-01 12:00:19");
    }

    #[test]
    fn test_apply_window_only_on_change() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp"]), LoadMode::Replace)
            .unwrap();
        let generation = ex.generation;

        assert!(!ex.apply_window());
        assert_eq!(ex.generation, generation);

        ex.window.start = "2024-05-01 12:00:05".into();
        assert!(ex.apply_window());
        assert_eq!(ex.model.rows, 5..10);
    }

    #[test]
    fn test_clearing_main_clears_aux() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp", "hum"]), LoadMode::Replace)
            .unwrap();
        ex.set_selected(AxisRole::Main, "temp", true);
        ex.set_selected(AxisRole::Aux, "hum", true);
        assert!(ex.selection.contains(AxisRole::Aux, "hum"));

        ex.set_selected(AxisRole::Main, "temp", false);
        assert!(ex.selection.aux.is_empty());
    }

    #[test]
    fn test_status_change_resets_manual_y() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp", "p-run"]), LoadMode::Replace)
            .unwrap();
        ex.view.set_y_range(-1.0, 1.0);

        ex.set_status(Some("p-run".into()));
        assert!(!ex.view.is_manual_y_scale());

        ex.view.set_y_range(-1.0, 1.0);
        ex.set_status(None);
        assert!(!ex.view.is_manual_y_scale());
    }

    #[test]
    fn test_pan_keeps_manual_y() {
        let mut ex = ExplorerState::new(ViewSettings::default());
        ex.install(dataset("a.csv", 0, &["temp"]), LoadMode::Replace)
            .unwrap();
        ex.view.set_y_range(-1.0, 1.0);

        ex.pan_window(3.0);
        assert_eq!(ex.window.start, "2024-05-01 12:00:03");
        assert!(ex.view.is_manual_y_scale());

        ex.window.end = "garbage".into();
        let generation = ex.generation;
        ex.pan_window(3.0);
        assert_eq!(ex.generation, generation);
    }
}
