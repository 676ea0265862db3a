//! TabViewer implementation for the workspace
//!
//! Dispatches rendering to individual panes through the [`Pane`] trait.

use std::collections::HashMap;

use egui::{Ui, WidgetText};
use rust_i18n::t;

use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};

use super::{PaneEntry, PaneId};

/// Tab viewer that bridges egui_dock with our pane system.
pub struct WorkspaceTabViewer<'a> {
    pub shared: SharedState<'a>,
    pub pane_states: &'a mut HashMap<PaneId, Box<dyn Pane>>,
    pub pane_entries: &'a HashMap<PaneId, PaneEntry>,
    pub actions: Vec<AppAction>,
}

impl egui_dock::TabViewer for WorkspaceTabViewer<'_> {
    type Tab = PaneId;

    fn title(&mut self, tab: &mut PaneId) -> WidgetText {
        self.pane_entries
            .get(tab)
            .map(|e| WidgetText::from(t!(e.title_key).to_string()))
            .unwrap_or_else(|| WidgetText::from("?"))
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut PaneId) {
        if !self.pane_entries.contains_key(tab) {
            ui.label("Pane not found");
            return;
        }
        let Some(pane) = self.pane_states.get_mut(tab) else {
            ui.label("Pane state not found");
            return;
        };

        let pane_actions = pane.render(&mut self.shared, ui);
        self.actions.extend(pane_actions);
    }

    fn on_close(&mut self, tab: &mut PaneId) -> egui_dock::widgets::tab_viewer::OnCloseResponse {
        // Allow closing; cleanup happens in the main app
        self.actions.push(AppAction::ClosePane(*tab));
        egui_dock::widgets::tab_viewer::OnCloseResponse::Close
    }

    fn closeable(&mut self, _tab: &mut PaneId) -> bool {
        true
    }
}
