//! Configuration module for SensorScope
//!
//! This module handles application configuration including:
//! - Application state persistence (recent CSV files, last directory, preferences)
//! - Optional TOML overrides for site-wide defaults
//! - Runtime view settings during execution
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.sensorscope/`
//! - **macOS**: `~/Library/Application Support/dev.sensorscope/`
//! - **Windows**: `%APPDATA%\dev.sensorscope\`
//!
//! # Files
//!
//! - `app_state.json` - Recent files and preferences, rewritten by the app
//! - `sensorscope.toml` - Optional hand-edited overrides, never written by the app
//! - `logs/` - Daily rolling log files
//!
//! # Example
//!
//! ```ignore
//! use sensorscope::config::AppState;
//!
//! let mut state = AppState::load_or_default();
//! state.add_recent_file("/data/line3_2024-05-01.csv", Some(86_400));
//! state.save()?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, SensorScopeError};
use crate::i18n::Language;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.sensorscope";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Optional overrides filename
pub const OVERRIDES_FILE: &str = "sensorscope.toml";

/// Maximum number of recent files to remember
pub const MAX_RECENT_FILES: usize = 10;

/// Display offset used when nothing else is configured (Asia/Taipei)
pub const DEFAULT_UTC_OFFSET_HOURS: f32 = 8.0;

/// Default alpha of status bands
pub const DEFAULT_BAND_ALPHA: f32 = 0.28;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        SensorScopeError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            SensorScopeError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Directory for rolling log files
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join("logs"))
}

/// Convert an hour offset to a chrono offset, clamped to the valid range.
pub fn offset_from_hours(hours: f32) -> FixedOffset {
    let seconds = (hours.clamp(-14.0, 14.0) * 3600.0).round() as i32;
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

// ==================== Recent File Entry ====================

/// Information about a recently opened CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentFile {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Display name (file name)
    pub name: String,

    /// Last opened timestamp (Unix seconds)
    pub last_opened: u64,

    /// Number of rows loaded the last time
    #[serde(default)]
    pub rows: Option<usize>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl RecentFile {
    /// Create a new recent file entry
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path,
            name,
            last_opened: unix_now(),
            rows: None,
        }
    }

    /// Check if the file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// Persistent application state
///
/// Preferences and history that persist across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Recently opened CSV files, most recent first
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,

    /// Directory the file dialog starts in
    #[serde(default)]
    pub last_directory: Option<PathBuf>,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,

    /// Plot preferences
    #[serde(default)]
    pub plot_preferences: PlotPreferences,

    /// Offset of displayed times from UTC, in hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: f32,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_utc_offset_hours() -> f32 {
    DEFAULT_UTC_OFFSET_HOURS
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_files: Vec::new(),
            last_directory: None,
            ui_preferences: UiPreferences::default(),
            plot_preferences: PlotPreferences::default(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    ///
    /// `sensorscope.toml` overrides are applied on top when present.
    pub fn load() -> Result<Self> {
        let dir = app_data_dir().ok_or_else(|| {
            SensorScopeError::Config("Could not determine app state path".to_string())
        })?;

        Self::load_from_dir(&dir)
    }

    /// Load the app state file in `dir` and apply the overrides file next to it
    ///
    /// An overrides file that cannot be read or parsed is logged and skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut state = Self::load_from(dir.join(APP_STATE_FILE))?;

        let overrides_path = dir.join(OVERRIDES_FILE);
        if overrides_path.exists() {
            match ConfigOverrides::load(&overrides_path) {
                Ok(overrides) => {
                    tracing::info!("Applying overrides from {:?}", overrides_path);
                    state.apply_overrides(&overrides);
                }
                Err(e) => tracing::warn!("Ignoring {:?}: {}", overrides_path, e),
            }
        }

        Ok(state)
    }

    /// Load app state from a specific file, defaulting when it does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SensorScopeError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| SensorScopeError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SensorScopeError::Config(format!("Failed to serialize app state: {}", e))
        })?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| SensorScopeError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Add or update a recent file and remember its directory
    pub fn add_recent_file(&mut self, path: impl AsRef<Path>, rows: Option<usize>) {
        let path = path.as_ref().to_path_buf();

        self.recent_files.retain(|f| f.path != path);

        let mut entry = RecentFile::new(path.clone());
        entry.rows = rows;
        self.recent_files.insert(0, entry);

        self.recent_files.truncate(MAX_RECENT_FILES);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }

    /// Remove a file from recents (e.g., if it was deleted)
    pub fn remove_recent_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_files.retain(|f| f.path != path);
    }

    /// Clean up recent files that no longer exist
    pub fn cleanup_missing(&mut self) {
        self.recent_files.retain(|f| f.exists());

        if let Some(ref dir) = self.last_directory {
            if !dir.exists() {
                self.last_directory = None;
            }
        }
    }

    /// Display offset applied to files loaded from now on
    pub fn utc_offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }

    /// Apply hand-edited overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(hours) = overrides.utc_offset_hours {
            self.utc_offset_hours = hours;
        }
        if let Some(width) = overrides.line_width {
            self.plot_preferences.line_width = width;
        }
        if let Some(alpha) = overrides.band_alpha {
            self.plot_preferences.band_alpha = alpha.clamp(0.0, 1.0);
        }
        if let Some(ref font) = overrides.cjk_font_path {
            self.ui_preferences.cjk_font_path = Some(font.clone());
        }
        if let Some(ref code) = overrides.language {
            match Language::from_code(code) {
                Some(lang) => self.ui_preferences.language = lang,
                None => tracing::warn!("Unknown language '{}' in overrides", code),
            }
        }
    }
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default)]
    pub dark_mode: bool,

    /// Font scale factor
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// UI language
    #[serde(default)]
    pub language: Language,

    /// Font used for CJK glyphs instead of the discovered system font
    #[serde(default)]
    pub cjk_font_path: Option<PathBuf>,
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            font_scale: 1.0,
            language: Language::default(),
            cjk_font_path: None,
        }
    }
}

/// Plot appearance preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotPreferences {
    /// Width of sensor lines
    #[serde(default = "default_line_width")]
    pub line_width: f32,

    /// Alpha of status bands
    #[serde(default = "default_band_alpha")]
    pub band_alpha: f32,

    /// Show the legend
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Show the grid
    #[serde(default = "default_true")]
    pub show_grid: bool,
}

fn default_true() -> bool {
    true
}

fn default_line_width() -> f32 {
    1.5
}

fn default_band_alpha() -> f32 {
    DEFAULT_BAND_ALPHA
}

impl Default for PlotPreferences {
    fn default() -> Self {
        Self {
            line_width: 1.5,
            band_alpha: DEFAULT_BAND_ALPHA,
            show_legend: true,
            show_grid: true,
        }
    }
}

// ==================== TOML Overrides ====================

/// Optional site-wide defaults read from `sensorscope.toml`
///
/// ```toml
/// utc_offset_hours = 9
/// language = "zh-TW"
/// band_alpha = 0.35
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub utc_offset_hours: Option<f32>,
    pub language: Option<String>,
    pub line_width: Option<f32>,
    pub band_alpha: Option<f32>,
    pub cjk_font_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Parse overrides from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SensorScopeError::Config(format!("Failed to parse overrides: {}", e)))
    }

    /// Load overrides from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SensorScopeError::Config(format!("Failed to read overrides {:?}: {}", path, e))
        })?;
        Self::parse(&content)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert!(state.recent_files.is_empty());
        assert!(state.last_directory.is_none());
        assert_eq!(state.version, 1);
        assert_eq!(state.utc_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_add_recent_file() {
        let mut state = AppState::default();

        state.add_recent_file("/data/a.csv", Some(10));
        assert_eq!(state.recent_files.len(), 1);
        assert_eq!(state.recent_files[0].name, "a.csv");
        assert_eq!(state.last_directory, Some(PathBuf::from("/data")));

        state.add_recent_file("/data/b.csv", None);
        assert_eq!(state.recent_files.len(), 2);
        assert_eq!(state.recent_files[0].name, "b.csv"); // Most recent first

        // Adding same path again should update, not duplicate
        state.add_recent_file("/data/a.csv", Some(20));
        assert_eq!(state.recent_files.len(), 2);
        assert_eq!(state.recent_files[0].name, "a.csv");
        assert_eq!(state.recent_files[0].rows, Some(20));
    }

    #[test]
    fn test_recent_files_max_limit() {
        let mut state = AppState::default();

        for i in 0..15 {
            state.add_recent_file(format!("/data/log{}.csv", i), None);
        }

        assert_eq!(state.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(state.recent_files[0].name, "log14.csv");
    }

    #[test]
    fn test_remove_recent_file() {
        let mut state = AppState::default();
        state.add_recent_file("/data/a.csv", None);
        state.add_recent_file("/data/b.csv", None);
        state.remove_recent_file("/data/a.csv");
        assert_eq!(state.recent_files.len(), 1);
        assert_eq!(state.recent_files[0].name, "b.csv");
    }

    #[test]
    fn test_app_state_serialization() {
        let mut state = AppState::default();
        state.add_recent_file("/test/run.csv", Some(3));
        state.ui_preferences.language = Language::TraditionalChinese;
        state.utc_offset_hours = 9.0;

        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: AppState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.recent_files.len(), 1);
        assert_eq!(parsed.ui_preferences.language, Language::TraditionalChinese);
        assert_eq!(parsed.utc_offset_hours, 9.0);
    }

    #[test]
    fn test_app_state_missing_fields_use_defaults() {
        let parsed: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.utc_offset_hours, DEFAULT_UTC_OFFSET_HOURS);
        assert!(parsed.plot_preferences.show_legend);
        assert_eq!(parsed.plot_preferences.band_alpha, DEFAULT_BAND_ALPHA);
    }

    #[test]
    fn test_offset_from_hours() {
        assert_eq!(offset_from_hours(0.0).local_minus_utc(), 0);
        assert_eq!(offset_from_hours(5.5).local_minus_utc(), 5 * 3600 + 1800);
        assert_eq!(offset_from_hours(-3.0).local_minus_utc(), -3 * 3600);
        assert_eq!(offset_from_hours(30.0).local_minus_utc(), 14 * 3600);
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ConfigOverrides::parse(
            r#"
            utc_offset_hours = 0
            language = "zh-TW"
            band_alpha = 2.0
            "#,
        )
        .unwrap();

        let mut state = AppState::default();
        state.apply_overrides(&overrides);

        assert_eq!(state.utc_offset_hours, 0.0);
        assert_eq!(state.ui_preferences.language, Language::TraditionalChinese);
        assert_eq!(state.plot_preferences.band_alpha, 1.0);
        assert_eq!(state.plot_preferences.line_width, 1.5);
    }

    #[test]
    fn test_overrides_reject_garbage() {
        assert!(ConfigOverrides::parse("utc_offset_hours = \"eight\"").is_err());
    }

    #[test]
    fn test_bad_overrides_keep_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log.csv");
        std::fs::write(&log, "Timestamp\n").unwrap();

        let mut state = AppState::default();
        state.add_recent_file(&log, Some(0));
        state.utc_offset_hours = 9.0;
        state.save_to(dir.path().join(APP_STATE_FILE)).unwrap();
        std::fs::write(dir.path().join(OVERRIDES_FILE), "utc_offset_hours = \"eight\"").unwrap();

        let loaded = AppState::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.recent_files.len(), 1);
        assert_eq!(loaded.utc_offset_hours, 9.0);

        std::fs::write(dir.path().join(OVERRIDES_FILE), "utc_offset_hours = 0").unwrap();
        let loaded = AppState::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.recent_files.len(), 1);
        assert_eq!(loaded.utc_offset_hours, 0.0);
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_STATE_FILE);

        let mut state = AppState::default();
        state.ui_preferences.dark_mode = true;
        state.save_to(&path).unwrap();

        let loaded = AppState::load_from(&path).unwrap();
        assert!(loaded.ui_preferences.dark_mode);

        let missing = AppState::load_from(dir.path().join("nope.json")).unwrap();
        assert!(!missing.ui_preferences.dark_mode);
    }
}
