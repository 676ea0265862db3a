//! Plot pane - the sensor figure
//!
//! Thin wrapper around [`PlotView`]; a left drag is turned into a window pan
//! and the plot rectangle is recorded for PNG export.

use egui::Ui;

use crate::frontend::pane_trait::Pane;
use crate::frontend::plot::{PlotStyle, PlotView};
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;

/// State for the plot pane
#[derive(Default)]
pub struct PlotPaneState {
    pub view: PlotView,
}

/// Render the plot pane
pub fn render(state: &mut PlotPaneState, shared: &mut SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
    let style = PlotStyle::from_preferences(&shared.app_state.plot_preferences);
    let output = state
        .view
        .render(ui, shared.model, shared.model_generation, shared.view, style);

    *shared.plot_rect = Some(output.rect);

    match output.pan_seconds {
        Some(seconds) => vec![AppAction::PanWindow(seconds)],
        None => Vec::new(),
    }
}

impl Pane for PlotPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Plot
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
