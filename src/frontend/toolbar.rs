//! Toolbar panel - file buttons, the time window editor and plot toggles.
//!
//! Sits between the menu bar and the dock workspace area.

use std::path::{Path, PathBuf};

use egui::{Color32, RichText, Ui};
use rust_i18n::t;

use crate::config::settings::ViewSettings;
use crate::frontend::state::{AppAction, WindowFields};
use crate::frontend::widgets::DateTimeField;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub window: &'a mut WindowFields,
    pub view: &'a mut ViewSettings,
    pub has_data: bool,
    pub has_rows: bool,
    pub loading: bool,
    pub last_directory: Option<&'a Path>,
}

/// Ask the user for a CSV file to read
pub fn pick_csv(title: &str, directory: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .add_filter("*", &["*"]);
    if let Some(dir) = directory {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

/// Render the main application toolbar.
///
/// Returns the actions to be applied by the app. Legend and grid toggles
/// write to `ctx.view` directly.
pub fn render_toolbar(ui: &mut Ui, ctx: &mut ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        // === File group ===
        render_file_group(ui, ctx, &mut actions);

        ui.separator();

        // === Window group ===
        render_window_group(ui, ctx, &mut actions);

        ui.separator();

        // === Export group ===
        render_export_group(ui, ctx, &mut actions);

        ui.separator();

        // === View group ===
        render_view_group(ui, ctx, &mut actions);
    });

    actions
}

fn render_file_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    if ctx.loading {
        ui.spinner();
    }

    if ui
        .add_enabled(!ctx.loading, egui::Button::new("📂"))
        .on_hover_text(t!("toolbar_open"))
        .clicked()
    {
        if let Some(path) = pick_csv(&t!("toolbar_open"), ctx.last_directory) {
            actions.push(AppAction::OpenCsv(path));
        }
    }

    if ui
        .add_enabled(!ctx.loading && ctx.has_data, egui::Button::new("➕"))
        .on_hover_text(t!("toolbar_append"))
        .clicked()
    {
        if let Some(path) = pick_csv(&t!("toolbar_append"), ctx.last_directory) {
            actions.push(AppAction::AppendCsv(path));
        }
    }
}

fn render_window_group(ui: &mut Ui, ctx: &mut ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    ui.add_enabled_ui(ctx.has_data, |ui| {
        ui.label(RichText::new(t!("toolbar_start")).color(Color32::from_rgb(70, 130, 220)));
        let start_done = DateTimeField::new(&mut ctx.window.start, "window_start").show(ui);

        ui.label(RichText::new(t!("toolbar_end")).color(Color32::from_rgb(70, 130, 220)));
        let end_done = DateTimeField::new(&mut ctx.window.end, "window_end").show(ui);

        if start_done || end_done {
            actions.push(AppAction::ApplyWindow);
        }
    });
}

fn render_export_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    if ui
        .add_enabled(ctx.has_rows, egui::Button::new(format!("⬇ {}", t!("toolbar_csv"))))
        .on_hover_text(t!("menu_export_csv"))
        .clicked()
    {
        actions.push(AppAction::ExportCsv);
    }

    if ui
        .add_enabled(ctx.has_data, egui::Button::new(format!("🖼 {}", t!("toolbar_png"))))
        .on_hover_text(t!("menu_export_png"))
        .clicked()
    {
        actions.push(AppAction::ExportPng);
    }
}

fn render_view_group(ui: &mut Ui, ctx: &mut ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    ui.toggle_value(&mut ctx.view.show_legend, "🏷")
        .on_hover_text(t!("toolbar_legend"));
    ui.toggle_value(&mut ctx.view.show_grid, "▦")
        .on_hover_text(t!("toolbar_grid"));

    if ui
        .add_enabled(ctx.has_data, egui::Button::new("⟲"))
        .on_hover_text(t!("toolbar_reset"))
        .clicked()
    {
        actions.push(AppAction::ResetView);
    }

    if ctx.view.is_manual_y_scale() {
        ui.weak(t!("toolbar_manual_y"));
    }
}
