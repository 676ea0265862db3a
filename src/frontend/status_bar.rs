//! Status bar panel - bottom bar showing dataset, window and error info.
//!
//! Sits below the dock workspace area.

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::dataset::Dataset;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub dataset: &'a Dataset,
    /// Rows inside the current window
    pub window_rows: usize,
    /// File being read in the background
    pub loading: Option<&'a str>,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Loader state ===
        match ctx.loading {
            Some(file) => {
                ui.colored_label(Color32::YELLOW, "●");
                ui.label(RichText::new(t!("status_loading", file = file)).small());
            }
            None if ctx.dataset.is_empty() => {
                ui.colored_label(Color32::GRAY, "●");
                ui.label(RichText::new(t!("status_no_file")).small());
            }
            None => {
                ui.colored_label(Color32::GREEN, "●");
                ui.label(RichText::new(ctx.dataset.source_label()).small());
            }
        }

        ui.separator();

        // === Row counts ===
        ui.label(RichText::new(t!("status_rows", count = ctx.dataset.len())).small());
        if ctx.dataset.dropped_rows() > 0 {
            ui.colored_label(
                Color32::LIGHT_RED,
                RichText::new(t!("status_dropped", count = ctx.dataset.dropped_rows())).small(),
            );
        }

        ui.separator();

        ui.label(RichText::new(t!("status_window_rows", count = ctx.window_rows)).small());

        ui.separator();

        ui.label(RichText::new(t!("status_time_column", name = ctx.dataset.time_column())).small());

        // === Error message (right-aligned) ===
        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
