//! Custom widgets for the SensorScope UI
//!
//! This module provides reusable UI widgets for the application.
//!
//! # Widgets
//!
//! - [`DateTimeField`] - Window bound text field with date picker and h/m/s drag values
//! - [`ColorSwatch`] - Small colored square for legend and statistics rows
//! - [`Debouncer`] - Delays a value until input has settled (search box)

use std::time::{Duration, Instant};

use chrono::Timelike;
use egui::{Color32, Response, Ui, Widget};
use egui_extras::DatePickerButton;

use crate::analysis::{format_time, parse_time};

/// Delay between the last keystroke in the search box and the refilter
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Holds the latest value until `delay` has passed without a newer one
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value, restarting the delay
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the value once it has settled
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Time until the pending value settles
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

/// Editor for one window bound
///
/// A free text field followed by a date picker and hour/minute/second drag
/// values. The picker only appears while the text parses. `show` returns
/// true when an edit is finished: focus left the text field, or the picker
/// or a drag value changed.
pub struct DateTimeField<'a> {
    text: &'a mut String,
    id_salt: &'a str,
}

impl<'a> DateTimeField<'a> {
    pub fn new(text: &'a mut String, id_salt: &'a str) -> Self {
        Self { text, id_salt }
    }

    pub fn show(self, ui: &mut Ui) -> bool {
        let parsed = parse_time(self.text).ok();
        let invalid = is_invalid_time_text(self.text);

        let mut edit = egui::TextEdit::singleline(self.text)
            .desired_width(140.0)
            .hint_text("YYYY-MM-DD HH:MM:SS");
        if invalid {
            edit = edit.text_color(ui.visuals().error_fg_color);
        }
        let mut committed = ui.add(edit).lost_focus();

        let Some(current) = parsed else {
            return committed;
        };

        let mut date = current.date();
        let (mut hour, mut minute, mut second) = (current.hour(), current.minute(), current.second());
        let mut picked = false;

        picked |= ui
            .add(
                DatePickerButton::new(&mut date)
                    .id_salt(self.id_salt)
                    .calendar_week(false),
            )
            .changed();
        picked |= ui
            .add(egui::DragValue::new(&mut hour).range(0..=23).suffix("h"))
            .changed();
        picked |= ui
            .add(egui::DragValue::new(&mut minute).range(0..=59).suffix("m"))
            .changed();
        picked |= ui
            .add(egui::DragValue::new(&mut second).range(0..=59).suffix("s"))
            .changed();

        if picked {
            if let Some(t) = date.and_hms_opt(hour, minute, second) {
                *self.text = format_time(t);
                committed = true;
            }
        }

        committed
    }
}

/// Non-blank field text that does not parse as a time
pub fn is_invalid_time_text(text: &str) -> bool {
    !text.trim().is_empty() && parse_time(text).is_err()
}

/// A color swatch widget
pub struct ColorSwatch {
    color: Color32,
    size: f32,
}

impl ColorSwatch {
    /// Create a new color swatch
    pub fn new(color: Color32) -> Self {
        Self { color, size: 12.0 }
    }

    /// Create a color swatch from an RGBA array
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]))
    }

    /// Set the size of the swatch
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

impl Widget for ColorSwatch {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(self.size, self.size), egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            ui.painter().rect_filled(rect, 2.0, self.color);
            ui.painter().rect_stroke(
                rect,
                2.0,
                egui::Stroke::new(1.0, Color32::GRAY),
                egui::StrokeKind::Outside,
            );
        }

        response
    }
}
