//! Column picker pane
//!
//! Search box plus four groups: the status column (single select), main-axis
//! sensors, aux-axis sensors and AV overlays. The search filters all groups
//! once typing has paused.

use std::time::Instant;

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::dataset::columns::{av_columns, sensor_columns, switchable_columns};
use crate::dataset::matches_search;
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::Debouncer;
use crate::frontend::workspace::PaneKind;
use crate::types::AxisRole;

/// State for the column picker pane
#[derive(Default)]
pub struct ColumnPickerState {
    /// Text in the search box
    pub search: String,
    /// Query the lists are currently filtered by
    pub applied_query: String,
    debouncer: Debouncer<String>,
}

impl ColumnPickerState {
    /// Feed a new search text and apply it once it settles
    fn update_query(&mut self, changed: bool, now: Instant) -> Option<std::time::Duration> {
        if changed {
            self.debouncer.push(self.search.clone(), now);
        }
        if let Some(query) = self.debouncer.poll(now) {
            self.applied_query = query;
        }
        self.debouncer.time_left(now)
    }
}

/// Render the column picker pane
pub fn render(state: &mut ColumnPickerState, shared: &mut SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.label("🔍");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search)
                .hint_text(t!("columns_search_hint"))
                .desired_width(f32::INFINITY),
        );
        if let Some(left) = state.update_query(response.changed(), Instant::now()) {
            ui.ctx().request_repaint_after(left);
        }
    });

    ui.horizontal(|ui| {
        ui.label(RichText::new(t!("columns_selected_status")).color(Color32::from_rgb(160, 80, 200)));
        match shared.selection.status.as_deref() {
            Some(status) => {
                ui.label(RichText::new(status).color(Color32::RED));
                if ui.small_button(t!("columns_remove")).clicked() {
                    actions.push(AppAction::SetStatus(None));
                }
            }
            None => {
                ui.weak("-");
            }
        }
    });

    ui.separator();

    if shared.dataset.columns().is_empty() {
        ui.weak(t!("columns_no_data"));
        return actions;
    }

    let query = state.applied_query.as_str();
    let names = || shared.dataset.column_names();
    let filter = |cols: Vec<String>| -> Vec<String> {
        cols.into_iter().filter(|c| matches_search(c, query)).collect()
    };
    let switchable = filter(switchable_columns(names()));
    let sensors = filter(sensor_columns(names()));
    let avs = filter(av_columns(names()));

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::CollapsingHeader::new(
                RichText::new(t!("columns_group_status")).color(Color32::from_rgb(160, 80, 200)),
            )
            .id_salt("group_status")
            .default_open(true)
            .show(ui, |ui| {
                if switchable.is_empty() {
                    ui.weak(t!("columns_none_match"));
                }
                for name in &switchable {
                    let selected = shared.selection.status.as_deref() == Some(name.as_str());
                    if ui.radio(selected, name.as_str()).clicked() && !selected {
                        actions.push(AppAction::SetStatus(Some(name.clone())));
                    }
                }
            });

            render_group(
                ui,
                &t!("columns_group_main"),
                Color32::from_rgb(70, 130, 220),
                AxisRole::Main,
                &sensors,
                shared,
                &mut actions,
            );
            render_group(
                ui,
                &t!("columns_group_aux"),
                Color32::from_rgb(60, 170, 90),
                AxisRole::Aux,
                &sensors,
                shared,
                &mut actions,
            );
            render_group(
                ui,
                &t!("columns_group_av"),
                Color32::from_rgb(200, 140, 40),
                AxisRole::Av,
                &avs,
                shared,
                &mut actions,
            );
        });

    actions
}

fn render_group(
    ui: &mut Ui,
    title: &str,
    color: Color32,
    role: AxisRole,
    columns: &[String],
    shared: &SharedState<'_>,
    actions: &mut Vec<AppAction>,
) {
    egui::CollapsingHeader::new(RichText::new(title).color(color))
        .id_salt(("group", role as u8))
        .default_open(true)
        .show(ui, |ui| {
            if columns.is_empty() {
                ui.weak(t!("columns_none_match"));
            }
            for name in columns {
                let mut checked = shared.selection.contains(role, name);
                if ui.checkbox(&mut checked, name.as_str()).changed() {
                    actions.push(AppAction::SetSelected {
                        role,
                        column: name.clone(),
                        selected: checked,
                    });
                }
            }
        });
}

impl Pane for ColumnPickerState {
    fn kind(&self) -> PaneKind {
        PaneKind::ColumnPicker
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_search_applies_after_delay() {
        let mut state = ColumnPickerState::default();
        let t0 = Instant::now();

        state.search = "tem".into();
        assert!(state.update_query(true, t0).is_some());
        assert_eq!(state.applied_query, "");

        state.search = "temp".into();
        state.update_query(true, t0 + Duration::from_millis(100));
        assert_eq!(state.applied_query, "");

        assert!(state
            .update_query(false, t0 + Duration::from_millis(400))
            .is_none());
        assert_eq!(state.applied_query, "temp");
    }
}
