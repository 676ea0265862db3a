//! Error message dialog
//!
//! Shown for failures the user has to acknowledge: unreadable CSV files,
//! failed exports, exports with nothing to write.

use egui::{RichText, Ui};
use rust_i18n::t;

use crate::frontend::dialogs::{Dialog, DialogAction, DialogState, DialogWindowConfig};

/// State for the error dialog
#[derive(Debug, Clone, Default)]
pub struct ErrorMessageState {
    pub message: String,
}

impl DialogState for ErrorMessageState {}

/// The error dialog
pub struct ErrorMessageDialog;

impl Dialog for ErrorMessageDialog {
    type State = ErrorMessageState;
    type Action = ();
    type Context<'a> = ();

    fn title(_state: &Self::State) -> String {
        t!("dialog_error").to_string()
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered(360.0)
    }

    fn render(
        state: &mut Self::State,
        _ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        ui.label(RichText::new(&state.message).color(ui.visuals().error_fg_color));
        ui.add_space(8.0);
        if ui.button(t!("dialog_ok")).clicked() {
            return DialogAction::Close;
        }
        DialogAction::None
    }
}
