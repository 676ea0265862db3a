//! Analysis module for windowed sensor data
//!
//! This module provides the computations behind the plot:
//! - Run-length segmentation of status columns into background bands
//! - Dual-axis normalization of auxiliary sensors and AV overlays
//! - Time window parsing and panning
//! - Window statistics

pub mod scaling;
pub mod segments;
pub mod statistics;
pub mod window;

pub use scaling::{normalize_aux, overlay_av, MainRange};
pub use segments::{distinct_states, segment_states, StateSpan};
pub use statistics::SeriesStatistics;
pub use window::{format_time, parse_time, TimeWindow};
