//! # SensorScope: CSV sensor log explorer
//!
//! A desktop tool for browsing time-series sensor logs exported as CSV. A log
//! is loaded once, then any mix of sensors can be plotted against a chosen
//! time window, with status columns drawn as colored background bands.
//!
//! ## Architecture
//!
//! - **Dataset**: CSV parsing, time axis detection and column classification
//! - **Analysis**: Time windows, status segmentation, aux scaling, statistics
//! - **Plot model**: Pure geometry for one figure, independent of egui
//! - **Backend**: A loader thread so large files never block the UI
//! - **Frontend**: eframe/egui with an egui_dock workspace and egui_plot
//! - **Communication**: Crossbeam channels between loader and UI
//!
//! ## Configuration
//!
//! Application state (recent files, preferences) is stored in the platform-appropriate
//! data directory under `dev.sensorscope`:
//!
//! - **Linux**: `~/.local/share/dev.sensorscope/`
//! - **macOS**: `~/Library/Application Support/dev.sensorscope/`
//! - **Windows**: `%APPDATA%\dev.sensorscope\`
//!
//! ## Example
//!
//! ```ignore
//! use sensorscope::{config::AppState, frontend::SensorScopeApp};
//!
//! fn main() -> anyhow::Result<()> {
//!     let app_state = AppState::load_or_default();
//!
//!     eframe::run_native(
//!         "SensorScope",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(SensorScopeApp::new(cc, app_state, None)?))),
//!     )
//!     .map_err(|e| anyhow::anyhow!("{e}"))
//! }
//! ```

rust_i18n::i18n!("locales", fallback = "en");

pub mod analysis;
pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fonts;
pub mod frontend;
pub mod i18n;
pub mod palette;
pub mod plot_model;
pub mod types;

// Re-export commonly used types
pub use backend::{LoadCommand, LoadMessage, LoadMode};
pub use config::AppState;
pub use dataset::Dataset;
pub use error::{Result, SensorScopeError};
pub use frontend::SensorScopeApp;
pub use plot_model::{build_plot_model, PlotModel};
pub use types::{AxisRole, Selection};
