//! Plot rendering module using egui_plot
//!
//! This module draws a [`PlotModel`] and turns mouse input into window pans
//! and y-axis changes. egui_plot's own drag, zoom and scroll handling is
//! switched off: the x range always equals the time window from the toolbar,
//! so every x movement has to go through the window fields.
//!
//! # Interaction
//!
//! - **Left drag**: pans the time window (reported as whole seconds)
//! - **Right/middle drag**: pans the y axis
//! - **Scroll wheel**: zooms y around the pointer
//!
//! # Main Types
//!
//! - [`PlotView`] - Render state (decimation cache, pan remainder)
//! - [`PlotStyle`] - Line width and band opacity from the preferences
//! - [`PlotOutput`] - What the interaction produced this frame

use crate::config::settings::ViewSettings;
use crate::config::PlotPreferences;
use crate::dataset::x_to_time;
use crate::palette::with_alpha;
use crate::plot_model::{Band, LineKind, PlotMessage, PlotModel, StateLegend};
use crate::types::MAX_RENDER_POINTS;
use egui::{Align2, Color32, FontId, PointerButton, Stroke, Ui};
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, Polygon};
use rust_i18n::t;

/// Y span multiplier for one scroll step up
pub const SCROLL_UP_ZOOM: f64 = 1.25;
/// Y span multiplier for one scroll step down
pub const SCROLL_DOWN_ZOOM: f64 = 0.8;

/// Layout of x-axis tick labels
pub const TICK_FORMAT: &str = "%m-%d %H:%M";

/// Stroke settings taken from the plot preferences
#[derive(Debug, Clone, Copy)]
pub struct PlotStyle {
    pub line_width: f32,
    pub band_alpha: f32,
}

impl PlotStyle {
    pub fn from_preferences(prefs: &PlotPreferences) -> Self {
        Self {
            line_width: prefs.line_width,
            band_alpha: prefs.band_alpha,
        }
    }
}

/// Result of one rendered frame
#[derive(Debug, Clone, Copy)]
pub struct PlotOutput {
    /// Whole seconds the window should move by
    pub pan_seconds: Option<f64>,
    /// Screen rectangle of the plot
    pub rect: egui::Rect,
}

/// Plot render state
#[derive(Debug, Default)]
pub struct PlotView {
    /// Model generation the cache was built from
    cache_generation: Option<u64>,
    /// Decimated (and stepped) runs per series
    cache: Vec<Vec<Vec<[f64; 2]>>>,
    /// Sub-second part of an ongoing drag
    pending_pan: f64,
}

impl PlotView {
    fn prepare(&mut self, model: &PlotModel, generation: u64) {
        if self.cache_generation == Some(generation) {
            return;
        }
        self.cache = model
            .series
            .iter()
            .map(|series| {
                series
                    .runs
                    .iter()
                    .map(|run| {
                        let points = decimate_points(run, MAX_RENDER_POINTS);
                        if series.kind == LineKind::Step {
                            to_step_points(&points)
                        } else {
                            points
                        }
                    })
                    .collect()
            })
            .collect();
        self.cache_generation = Some(generation);
    }

    /// Draw the model and apply y-axis interaction to `view`.
    pub fn render(
        &mut self,
        ui: &mut Ui,
        model: &PlotModel,
        generation: u64,
        view: &mut ViewSettings,
        style: PlotStyle,
    ) -> PlotOutput {
        self.prepare(model, generation);

        let (x_min, x_max) = match model.x_range() {
            Some((lo, hi)) if hi > lo => (lo, hi),
            Some((lo, _)) => (lo, lo + 1.0),
            None => (0.0, 1.0),
        };
        let (y_min, y_max) = view.y_range_or(model.y_extent().unwrap_or((0.0, 1.0)));

        let mut plot = Plot::new("sensor_plot")
            .show_grid(view.show_grid)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .x_axis_formatter(|mark, _range| format_tick(mark.value))
            .label_formatter(|name, value| format_hover(name, value));

        if view.show_legend {
            plot = plot.legend(Legend::default().position(Corner::LeftTop));
        }

        let cache = &self.cache;
        let response = plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

            // Bands first so lines stay on top, grouped so the legend lists
            // each state once in sorted order
            for (entry, bands) in bands_by_state(model) {
                let fill = to_color32(with_alpha(entry.color, style.band_alpha));
                for band in bands {
                    plot_ui.polygon(
                        Polygon::new(
                            entry.label.clone(),
                            PlotPoints::from(band_polygon(band, y_min, y_max)),
                        )
                        .fill_color(fill)
                        .stroke(Stroke::NONE),
                    );
                }
            }

            for (series, runs) in model.series.iter().zip(cache) {
                let color = to_color32(series.color);
                for run in runs {
                    let mut line = Line::new(series.label.clone(), PlotPoints::from(run.clone()))
                        .color(color)
                        .width(style.line_width);
                    if series.kind == LineKind::Dashed {
                        line = line.style(LineStyle::dashed_loose());
                    }
                    plot_ui.line(line);
                }
            }
        });

        let rect = response.response.rect;
        if let Some(message) = &model.message {
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                message_text(message),
                FontId::proportional(16.0),
                ui.visuals().warn_fg_color,
            );
        }

        let resp = &response.response;
        let [dx_per_px, dy_per_px] = response.transform.dvalue_dpos();
        let bounds = response.transform.bounds();
        let current_y = (bounds.min()[1], bounds.max()[1]);

        let mut pan_seconds = None;
        if resp.dragged_by(PointerButton::Primary) {
            self.pending_pan -= resp.drag_delta().x as f64 * dx_per_px;
            let whole = self.pending_pan.trunc();
            if whole != 0.0 {
                self.pending_pan -= whole;
                pan_seconds = Some(whole);
            }
        } else {
            self.pending_pan = 0.0;
        }

        if resp.dragged_by(PointerButton::Secondary) || resp.dragged_by(PointerButton::Middle) {
            let delta = -(resp.drag_delta().y as f64) * dy_per_px;
            if delta != 0.0 {
                view.pan_y(current_y, delta);
            }
        }

        if resp.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                if let Some(pos) = resp.hover_pos() {
                    let anchor = response.transform.value_from_position(pos).y;
                    let factor = if scroll > 0.0 { SCROLL_UP_ZOOM } else { SCROLL_DOWN_ZOOM };
                    view.zoom_y(current_y, anchor, factor);
                }
            }
        }

        PlotOutput { pan_seconds, rect }
    }
}

/// Text shown over an empty or partial figure
pub fn message_text(message: &PlotMessage) -> String {
    match message {
        PlotMessage::InvalidTime(text) => t!("plot_invalid_time", text = text).to_string(),
        PlotMessage::NoMainSensor => t!("plot_no_main_sensor").to_string(),
        PlotMessage::NoData => t!("plot_no_data").to_string(),
    }
}

fn to_color32(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// X tick label for a plot x value
pub fn format_tick(x: f64) -> String {
    x_to_time(x)
        .map(|t| t.format(TICK_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_hover(name: &str, value: &PlotPoint) -> String {
    let time = x_to_time(value.x)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    if name.is_empty() {
        format!("{}\n{:.4}", time, value.y)
    } else {
        format!("{}\n{}\n{:.4}", name, time, value.y)
    }
}

/// Bands grouped under their legend entry, in legend order
pub fn bands_by_state(model: &PlotModel) -> Vec<(&StateLegend, Vec<&Band>)> {
    model
        .state_legend
        .iter()
        .map(|entry| {
            let bands = model.bands.iter().filter(|b| b.label == entry.label).collect();
            (entry, bands)
        })
        .collect()
}

/// Rectangle covering a band over the visible y range
pub fn band_polygon(band: &Band, y_min: f64, y_max: f64) -> Vec<[f64; 2]> {
    vec![
        [band.x_start, y_min],
        [band.x_end, y_min],
        [band.x_end, y_max],
        [band.x_start, y_max],
    ]
}

/// Reduce a run to at most `max_points` by keeping the min and max of each bucket
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || points.is_empty() {
        return points.to_vec();
    }

    let bucket_size = points.len() / (max_points / 2).max(1);
    let mut result = Vec::with_capacity(max_points);

    result.push(points[0]);

    for bucket in points[1..points.len().saturating_sub(1)].chunks(bucket_size.max(1)) {
        if bucket.is_empty() {
            continue;
        }
        let (min_pt, max_pt) = bucket.iter().fold((bucket[0], bucket[0]), |(min, max), pt| {
            (
                if pt[1] < min[1] { *pt } else { min },
                if pt[1] > max[1] { *pt } else { max },
            )
        });
        if min_pt[0] < max_pt[0] {
            result.push(min_pt);
            result.push(max_pt);
        } else {
            result.push(max_pt);
            result.push(min_pt);
        }
    }

    if let Some(last) = points.last() {
        result.push(*last);
    }

    result
}

/// Hold each value until the next sample
pub fn to_step_points(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(points.len() * 2);
    for window in points.windows(2) {
        result.push(window[0]);
        result.push([window[1][0], window[0][1]]);
    }
    if let Some(last) = points.last() {
        result.push(*last);
    }
    result
}
