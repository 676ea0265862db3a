//! Preferences dialog
//!
//! App-wide settings: language, theme, font scale, plot defaults and the
//! time zone used to read epoch timestamps.

use std::path::PathBuf;

use egui::Ui;
use rust_i18n::t;

use crate::config::AppState;
use crate::frontend::dialogs::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::i18n::Language;

/// State for the preferences dialog
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesState {
    // Appearance
    pub dark_mode: bool,
    pub font_scale: f32,
    pub language: Language,
    /// Font path as typed; empty means automatic discovery
    pub cjk_font_path: String,

    // Plot defaults
    pub show_grid: bool,
    pub show_legend: bool,
    pub line_width: f32,
    pub band_alpha: f32,

    // Data
    pub utc_offset_hours: f32,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self::from_app_state(&AppState::default())
    }
}

impl PreferencesState {
    /// Create from the current app state
    pub fn from_app_state(app_state: &AppState) -> Self {
        let ui = &app_state.ui_preferences;
        let plot = &app_state.plot_preferences;
        Self {
            dark_mode: ui.dark_mode,
            font_scale: ui.font_scale,
            language: ui.language,
            cjk_font_path: ui
                .cjk_font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            show_grid: plot.show_grid,
            show_legend: plot.show_legend,
            line_width: plot.line_width,
            band_alpha: plot.band_alpha,
            utc_offset_hours: app_state.utc_offset_hours,
        }
    }

    /// Write the edited values back into the app state
    pub fn apply_to(&self, app_state: &mut AppState) {
        let ui = &mut app_state.ui_preferences;
        ui.dark_mode = self.dark_mode;
        ui.font_scale = self.font_scale.clamp(0.5, 2.0);
        ui.language = self.language;
        let font = self.cjk_font_path.trim();
        ui.cjk_font_path = (!font.is_empty()).then(|| PathBuf::from(font));

        let plot = &mut app_state.plot_preferences;
        plot.show_grid = self.show_grid;
        plot.show_legend = self.show_legend;
        plot.line_width = self.line_width.max(0.1);
        plot.band_alpha = self.band_alpha.clamp(0.0, 1.0);

        app_state.utc_offset_hours = self.utc_offset_hours.clamp(-12.0, 14.0);
    }
}

impl DialogState for PreferencesState {}

/// Actions produced by the preferences dialog
#[derive(Debug, Clone)]
pub enum PreferencesAction {
    /// Apply preferences
    Apply(PreferencesState),
}

/// Context for rendering
pub struct PreferencesContext;

/// The preferences dialog
pub struct PreferencesDialog;

impl Dialog for PreferencesDialog {
    type State = PreferencesState;
    type Action = PreferencesAction;
    type Context<'a> = PreferencesContext;

    fn title(_state: &Self::State) -> String {
        t!("dialog_preferences").to_string()
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig {
            default_width: 420.0,
            ..Default::default()
        }
    }

    fn render(
        state: &mut Self::State,
        _ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        // === Appearance ===
        ui.heading(t!("pref_appearance"));
        ui.add_space(4.0);

        egui::Grid::new("prefs_appearance_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label(format!("{}:", t!("pref_language")));
                egui::ComboBox::from_id_salt("language_selector")
                    .selected_text(state.language.display_name())
                    .show_ui(ui, |ui| {
                        for lang in Language::all() {
                            ui.selectable_value(&mut state.language, *lang, lang.display_name());
                        }
                    });
                ui.end_row();

                ui.label(format!("{}:", t!("pref_dark_mode")));
                ui.checkbox(&mut state.dark_mode, "");
                ui.end_row();

                ui.label(format!("{}:", t!("pref_font_scale")));
                ui.add(egui::Slider::new(&mut state.font_scale, 0.5..=2.0).step_by(0.1));
                ui.end_row();

                ui.label(format!("{}:", t!("pref_cjk_font")));
                ui.add(
                    egui::TextEdit::singleline(&mut state.cjk_font_path)
                        .hint_text(t!("pref_cjk_font_auto")),
                );
                ui.end_row();
            });

        ui.add_space(8.0);

        // === Plot ===
        ui.heading(t!("pref_plot"));
        ui.add_space(4.0);

        egui::Grid::new("prefs_plot_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label(format!("{}:", t!("pref_grid")));
                ui.checkbox(&mut state.show_grid, "");
                ui.end_row();

                ui.label(format!("{}:", t!("pref_legend")));
                ui.checkbox(&mut state.show_legend, "");
                ui.end_row();

                ui.label(format!("{}:", t!("pref_line_width")));
                ui.add(egui::Slider::new(&mut state.line_width, 0.5..=5.0));
                ui.end_row();

                ui.label(format!("{}:", t!("pref_band_alpha")));
                ui.add(egui::Slider::new(&mut state.band_alpha, 0.0..=1.0).step_by(0.01));
                ui.end_row();
            });

        ui.add_space(8.0);

        // === Data ===
        ui.heading(t!("pref_data"));
        ui.add_space(4.0);

        egui::Grid::new("prefs_data_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label(format!("{}:", t!("pref_utc_offset")));
                ui.add(
                    egui::DragValue::new(&mut state.utc_offset_hours)
                        .range(-12.0..=14.0)
                        .speed(0.25)
                        .prefix("UTC"),
                );
                ui.end_row();
            });
        ui.weak(t!("pref_utc_offset_hint"));

        ui.add_space(8.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(t!("dialog_apply")).clicked() {
                return DialogAction::CloseWithAction(PreferencesAction::Apply(state.clone()));
            }
            if ui.button(t!("dialog_cancel")).clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
