//! Runtime view settings that change while the application runs
//!
//! These are not persisted directly. Legend and grid toggles are seeded from
//! [`PlotPreferences`](super::PlotPreferences) and written back on exit; the
//! y-axis override only lives until the next plot rebuild.
//!
//! # Axis Control
//!
//! - **Auto**: the y range follows the visible geometry (`y_min`/`y_max` are `None`)
//! - **Manual**: a drag or scroll in the plot pins an explicit range
//! - **Reset**: clears the manual range, as does any rebuild of the plot model

use serde::{Deserialize, Serialize};

/// Smallest y span a zoom can shrink to
const MIN_Y_SPAN: f64 = 1e-9;

/// Runtime view settings for the plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Show the legend
    pub show_legend: bool,

    /// Show the grid
    pub show_grid: bool,

    /// Y-axis minimum (if manual scaling)
    pub y_min: Option<f64>,

    /// Y-axis maximum (if manual scaling)
    pub y_max: Option<f64>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_grid: true,
            y_min: None,
            y_max: None,
        }
    }
}

impl ViewSettings {
    /// Create view settings seeded from plot preferences
    pub fn from_preferences(prefs: &super::PlotPreferences) -> Self {
        Self {
            show_legend: prefs.show_legend,
            show_grid: prefs.show_grid,
            ..Default::default()
        }
    }

    /// Set manual Y-axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.y_min = Some(min);
        self.y_max = Some(max);
    }

    /// Clear manual Y-axis range (enable auto-scaling)
    pub fn clear_y_range(&mut self) {
        self.y_min = None;
        self.y_max = None;
    }

    /// Check if Y-axis is using manual scaling
    pub fn is_manual_y_scale(&self) -> bool {
        self.y_min.is_some() && self.y_max.is_some()
    }

    /// The manual range if set, otherwise `auto`
    pub fn y_range_or(&self, auto: (f64, f64)) -> (f64, f64) {
        match (self.y_min, self.y_max) {
            (Some(min), Some(max)) => (min, max),
            _ => auto,
        }
    }

    /// Shift the y range by `delta` plot units, starting from `current`
    pub fn pan_y(&mut self, current: (f64, f64), delta: f64) {
        let (min, max) = self.y_range_or(current);
        self.set_y_range(min + delta, max + delta);
    }

    /// Scale the y range around `anchor` by `factor`
    ///
    /// The span is multiplied by `factor`, so a factor above one zooms out and
    /// below one zooms in. Non-positive or non-finite factors are ignored.
    pub fn zoom_y(&mut self, current: (f64, f64), anchor: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (min, max) = self.y_range_or(current);
        let mut new_min = anchor - (anchor - min) * factor;
        let mut new_max = anchor + (max - anchor) * factor;
        if new_max - new_min < MIN_Y_SPAN {
            let mid = (new_min + new_max) / 2.0;
            new_min = mid - MIN_Y_SPAN / 2.0;
            new_max = mid + MIN_Y_SPAN / 2.0;
        }
        self.set_y_range(new_min, new_max);
    }
}
