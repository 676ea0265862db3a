//! Frontend module for egui UI
//!
//! This module provides the main UI components using eframe/egui.
//! CSV files are parsed on the loader thread and arrive through crossbeam
//! channels; everything else happens on the UI thread.
//!
//! # Architecture
//!
//! The frontend uses an egui_dock workspace where every UI element is a pane:
//! column picker, plot, statistics, data table. Panes can be rearranged via
//! drag-and-drop docking. Panes, the toolbar and the menu emit [`AppAction`]s
//! which the app applies in one place.
//!
//! # Main Types
//!
//! - [`SensorScopeApp`] - Main application state implementing [`eframe::App`]
//! - [`ExplorerState`] - Dataset, selection, window and the current figure
//! - [`Workspace`](workspace::Workspace) - Dock state and pane management
//!
//! # Submodules
//!
//! - `workspace` - Dock workspace, tab viewer, default layout
//! - `panes` - Individual pane render functions
//! - `plot` - Plot rendering with egui_plot
//! - `widgets` - Custom UI widgets (time field, color swatch, debouncer)

pub mod dialogs;
pub mod explorer;
pub mod pane_registry;
pub mod pane_trait;
pub mod panes;
pub mod plot;
pub mod state;
pub mod status_bar;
pub mod toolbar;
pub mod widgets;
pub mod workspace;

pub use explorer::ExplorerState;
pub use state::{AppAction, DialogId, SharedState};

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use rust_i18n::t;

use dialogs::{
    show_dialog, ErrorMessageDialog, ErrorMessageState, PreferencesAction, PreferencesContext,
    PreferencesDialog, PreferencesState,
};
use status_bar::{render_status_bar, StatusBarContext};
use toolbar::{pick_csv, render_toolbar, ToolbarContext};
use workspace::tab_viewer::WorkspaceTabViewer;
use workspace::Workspace;

use crate::backend::{spawn_loader, LoadMessage, LoaderHandle};
use crate::config::settings::ViewSettings;
use crate::config::AppState;
use crate::export::{default_csv_name, default_png_name, export_columns, save_png, write_csv};
use crate::i18n::{set_language, Language};

/// Main application state
pub struct SensorScopeApp {
    // === Communication ===
    loader: LoaderHandle,
    loader_thread: Option<JoinHandle<()>>,
    /// File currently being parsed
    loading: Option<String>,
    egui_ctx: egui::Context,

    // === Shared State ===
    explorer: ExplorerState,
    app_state: AppState,
    last_error: Option<String>,

    // === PNG export ===
    /// Screen rectangle of the plot in the last frame
    plot_rect: Option<egui::Rect>,
    /// Target of a requested screenshot
    pending_png: Option<PathBuf>,

    // === Workspace ===
    workspace: Workspace,

    // === Global Dialogs ===
    preferences_open: bool,
    preferences_state: PreferencesState,
    error_open: bool,
    error_state: ErrorMessageState,
}

impl SensorScopeApp {
    /// Create a new application instance and start the loader thread
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        app_state: AppState,
        initial_file: Option<PathBuf>,
    ) -> std::io::Result<Self> {
        crate::fonts::install_fonts(
            &cc.egui_ctx,
            app_state.ui_preferences.cjk_font_path.as_deref(),
        );
        apply_appearance(&cc.egui_ctx, &app_state);

        let (loader_thread, loader) = spawn_loader(Some(cc.egui_ctx.clone()))?;

        let mut workspace = Workspace::new();
        workspace.dock_state = workspace::default_layout::build_default_layout(&mut workspace);

        let view = ViewSettings::from_preferences(&app_state.plot_preferences);

        let mut app = Self {
            loader,
            loader_thread: Some(loader_thread),
            loading: None,
            egui_ctx: cc.egui_ctx.clone(),
            explorer: ExplorerState::new(view),
            app_state,
            last_error: None,
            plot_rect: None,
            pending_png: None,
            workspace,
            preferences_open: false,
            preferences_state: PreferencesState::default(),
            error_open: false,
            error_state: ErrorMessageState::default(),
        };

        if let Some(path) = initial_file {
            app.handle_action(AppAction::OpenCsv(path));
        }

        Ok(app)
    }

    fn process_loader_messages(&mut self) {
        for message in self.loader.drain() {
            match message {
                LoadMessage::Started { path } => {
                    self.loading = Some(file_name(&path));
                }
                LoadMessage::Loaded {
                    path,
                    mode,
                    dataset,
                    elapsed,
                } => {
                    self.loading = None;
                    let rows = dataset.len();
                    match self.explorer.install(*dataset, mode) {
                        Ok(()) => {
                            tracing::info!(
                                "Installed {:?} ({} rows, {:?} to parse, {:?})",
                                path,
                                rows,
                                elapsed,
                                mode
                            );
                            self.last_error = None;
                            self.app_state.add_recent_file(&path, Some(rows));
                            if let Err(e) = self.app_state.save() {
                                tracing::warn!("Failed to save app state: {}", e);
                            }
                        }
                        Err(e) => self.show_error(
                            t!("error_load_failed", file = file_name(&path), error = e).to_string(),
                        ),
                    }
                }
                LoadMessage::Failed { path, error, .. } => {
                    self.loading = None;
                    if !path.exists() {
                        self.app_state.remove_recent_file(&path);
                    }
                    self.show_error(
                        t!("error_load_failed", file = file_name(&path), error = error).to_string(),
                    );
                }
                LoadMessage::Shutdown => {
                    tracing::debug!("Loader reported shutdown");
                }
            }
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::OpenCsv(path) => {
                tracing::info!("Opening {:?}", path);
                if !self.loader.open(path, self.app_state.utc_offset()) {
                    self.show_error(t!("error_loader_stopped").to_string());
                }
            }
            AppAction::AppendCsv(path) => {
                tracing::info!("Appending {:?}", path);
                // Appended rows must share the offset of the rows already loaded
                let offset = if self.explorer.dataset.columns().is_empty() {
                    self.app_state.utc_offset()
                } else {
                    self.explorer.dataset.offset()
                };
                if !self.loader.append(path, offset) {
                    self.show_error(t!("error_loader_stopped").to_string());
                }
            }
            AppAction::ExportCsv => self.export_csv(),
            AppAction::ExportPng => self.request_png(),
            AppAction::SetStatus(status) => self.explorer.set_status(status),
            AppAction::SetSelected {
                role,
                column,
                selected,
            } => self.explorer.set_selected(role, &column, selected),
            AppAction::ApplyWindow => {
                self.explorer.apply_window();
            }
            AppAction::PanWindow(seconds) => self.explorer.pan_window(seconds),
            AppAction::ResetView => self.explorer.reset_view(),
            AppAction::OpenDialog(dialog_id) => self.open_dialog(dialog_id),
            AppAction::SetLanguage(lang) => {
                let mut prefs = PreferencesState::from_app_state(&self.app_state);
                prefs.language = lang;
                self.apply_preferences(prefs);
            }
            AppAction::OpenPane(kind) => self.workspace.open_or_focus(kind),
            AppAction::ClosePane(id) => self.workspace.remove_pane(id),
        }
    }

    fn open_dialog(&mut self, dialog_id: DialogId) {
        match dialog_id {
            DialogId::Preferences => {
                self.preferences_state = PreferencesState::from_app_state(&self.app_state);
                self.preferences_open = true;
            }
        }
    }

    fn show_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.last_error = Some(message.clone());
        self.error_state.message = message;
        self.error_open = true;
    }

    fn export_csv(&mut self) {
        let (Some(window), true) = (self.explorer.model.window, self.explorer.has_rows()) else {
            self.show_error(t!("error_nothing_to_export").to_string());
            return;
        };
        let columns = export_columns(&self.explorer.dataset, &self.explorer.selection);

        let mut dialog = rfd::FileDialog::new()
            .set_title(t!("dialog_save_csv"))
            .set_file_name(default_csv_name(&window.export_stem()))
            .add_filter("CSV", &["csv"]);
        if let Some(dir) = &self.app_state.last_directory {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        if let Err(e) = write_csv(
            &path,
            &self.explorer.dataset,
            self.explorer.model.rows.clone(),
            &columns,
        ) {
            self.show_error(t!("error_export_failed", error = e).to_string());
        }
    }

    fn request_png(&mut self) {
        let Some(window) = self.explorer.model.window else {
            self.show_error(t!("error_nothing_to_export").to_string());
            return;
        };

        let mut dialog = rfd::FileDialog::new()
            .set_title(t!("dialog_save_png"))
            .set_file_name(default_png_name(&window.export_stem()))
            .add_filter("PNG", &["png"]);
        if let Some(dir) = &self.app_state.last_directory {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            self.pending_png = Some(path);
            self.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
        }
    }

    /// Save the plot region once the requested screenshot arrives
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_png.is_none() {
            return;
        }
        let image = ctx.input(|i| {
            i.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let (Some(image), Some(path)) = (image, self.pending_png.take()) else {
            return;
        };

        let region = match self.plot_rect {
            Some(rect) => image.region(&rect, Some(ctx.pixels_per_point())),
            None => (*image).clone(),
        };
        if let Err(e) = save_png(&path, &region) {
            self.show_error(t!("error_export_failed", error = e).to_string());
        }
    }

    fn apply_preferences(&mut self, state: PreferencesState) {
        let font_changed = state.cjk_font_path
            != self
                .app_state
                .ui_preferences
                .cjk_font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();

        state.apply_to(&mut self.app_state);
        self.explorer.view.show_legend = self.app_state.plot_preferences.show_legend;
        self.explorer.view.show_grid = self.app_state.plot_preferences.show_grid;

        set_language(self.app_state.ui_preferences.language);
        if font_changed {
            crate::fonts::install_fonts(
                &self.egui_ctx,
                self.app_state.ui_preferences.cjk_font_path.as_deref(),
            );
        }
        apply_appearance(&self.egui_ctx, &self.app_state);

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        let mut open = false;
        let mut reset = false;

        ctx.input(|i| {
            if i.key_pressed(Key::O) && i.modifiers.command_only() {
                open = true;
            }
            if i.key_pressed(Key::R) && i.modifiers.command_only() {
                reset = true;
            }
        });

        if open && self.loading.is_none() {
            if let Some(path) = pick_csv(&t!("toolbar_open"), self.app_state.last_directory.as_deref()) {
                self.handle_action(AppAction::OpenCsv(path));
            }
        }
        if reset {
            self.handle_action(AppAction::ResetView);
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button(t!("menu_file"), |ui| {
                    let busy = self.loading.is_some();
                    if ui.add_enabled(!busy, egui::Button::new(t!("toolbar_open"))).clicked() {
                        if let Some(path) =
                            pick_csv(&t!("toolbar_open"), self.app_state.last_directory.as_deref())
                        {
                            actions.push(AppAction::OpenCsv(path));
                        }
                        ui.close();
                    }
                    let has_data = !self.explorer.dataset.is_empty();
                    if ui
                        .add_enabled(!busy && has_data, egui::Button::new(t!("toolbar_append")))
                        .clicked()
                    {
                        if let Some(path) =
                            pick_csv(&t!("toolbar_append"), self.app_state.last_directory.as_deref())
                        {
                            actions.push(AppAction::AppendCsv(path));
                        }
                        ui.close();
                    }

                    ui.menu_button(t!("menu_recent"), |ui| {
                        if self.app_state.recent_files.is_empty() {
                            ui.weak(t!("menu_recent_empty"));
                        }
                        for recent in &self.app_state.recent_files {
                            let label = match recent.rows {
                                Some(rows) => format!("{} ({})", recent.name, rows),
                                None => recent.name.clone(),
                            };
                            if ui
                                .add_enabled(!busy, egui::Button::new(label))
                                .on_hover_text(recent.path.display().to_string())
                                .clicked()
                            {
                                actions.push(AppAction::OpenCsv(recent.path.clone()));
                                ui.close();
                            }
                        }
                    });

                    ui.separator();
                    if ui.button(t!("menu_export_csv")).clicked() {
                        actions.push(AppAction::ExportCsv);
                        ui.close();
                    }
                    if ui.button(t!("menu_export_png")).clicked() {
                        actions.push(AppAction::ExportPng);
                        ui.close();
                    }

                    ui.separator();
                    if ui.button(t!("menu_preferences")).clicked() {
                        actions.push(AppAction::OpenDialog(DialogId::Preferences));
                        ui.close();
                    }
                    if ui.button(t!("menu_quit")).clicked() {
                        ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close();
                    }
                });

                ui.menu_button(t!("menu_view"), |ui| {
                    // Panes (open/focus), generated from the registry
                    let panes: Vec<_> = self
                        .workspace
                        .registry()
                        .map(|info| (info.kind, info.title_key))
                        .collect();
                    for (kind, title_key) in panes {
                        if ui.button(t!(title_key)).clicked() {
                            actions.push(AppAction::OpenPane(kind));
                            ui.close();
                        }
                    }

                    ui.separator();
                    if ui.button(t!("toolbar_reset")).clicked() {
                        actions.push(AppAction::ResetView);
                        ui.close();
                    }
                });

                ui.menu_button(t!("menu_language"), |ui| {
                    for lang in Language::all() {
                        let selected = self.app_state.ui_preferences.language == *lang;
                        if ui.selectable_label(selected, lang.display_name()).clicked() {
                            actions.push(AppAction::SetLanguage(*lang));
                            ui.close();
                        }
                    }
                });
            });
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(PreferencesAction::Apply(state)) = show_dialog::<PreferencesDialog>(
            ctx,
            &mut self.preferences_open,
            &mut self.preferences_state,
            PreferencesContext,
        ) {
            self.apply_preferences(state);
        }

        show_dialog::<ErrorMessageDialog>(ctx, &mut self.error_open, &mut self.error_state, ());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Theme and font scale from the preferences
fn apply_appearance(ctx: &egui::Context, app_state: &AppState) {
    let prefs = &app_state.ui_preferences;
    if prefs.dark_mode {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
    ctx.set_zoom_factor(prefs.font_scale);
}

impl eframe::App for SensorScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_loader_messages();
        self.handle_screenshot(ctx);
        self.handle_keyboard_shortcuts(ctx);

        self.render_menu_bar(ctx);

        // Toolbar
        let toolbar_actions = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let mut toolbar_ctx = ToolbarContext {
                    window: &mut self.explorer.window,
                    view: &mut self.explorer.view,
                    has_data: !self.explorer.dataset.is_empty(),
                    has_rows: !self.explorer.model.rows.is_empty(),
                    loading: self.loading.is_some(),
                    last_directory: self.app_state.last_directory.as_deref(),
                };
                render_toolbar(ui, &mut toolbar_ctx)
            })
            .inner;
        for action in toolbar_actions {
            self.handle_action(action);
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(
                ui,
                &StatusBarContext {
                    dataset: &self.explorer.dataset,
                    window_rows: self.explorer.model.rows.len(),
                    loading: self.loading.as_deref(),
                    last_error: self.last_error.as_deref(),
                },
            );
        });

        // Dock workspace
        {
            let explorer = &mut self.explorer;
            let shared = SharedState {
                dataset: &explorer.dataset,
                model: &explorer.model,
                model_generation: explorer.generation,
                selection: &explorer.selection,
                view: &mut explorer.view,
                app_state: &self.app_state,
                plot_rect: &mut self.plot_rect,
            };

            let mut viewer = WorkspaceTabViewer {
                shared,
                pane_states: &mut self.workspace.pane_states,
                pane_entries: &self.workspace.pane_entries,
                actions: Vec::new(),
            };

            egui_dock::DockArea::new(&mut self.workspace.dock_state)
                .style(egui_dock::Style::from_egui(ctx.style().as_ref()))
                .show(ctx, &mut viewer);

            let actions = viewer.actions;
            for action in actions {
                self.handle_action(action);
            }
        }

        self.render_dialogs(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.loader.shutdown();
        if let Some(handle) = self.loader_thread.take() {
            if handle.join().is_err() {
                tracing::warn!("Loader thread panicked");
            }
        }

        // Toolbar toggles become the new defaults
        self.app_state.plot_preferences.show_legend = self.explorer.view.show_legend;
        self.app_state.plot_preferences.show_grid = self.explorer.view.show_grid;

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}
