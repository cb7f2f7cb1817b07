//! Plot-area layout.
//!
//! Reserves space for margins, titles, axis labels and the legend, and
//! yields the pixel rectangle the data renders into.

use log::warn;

use crate::config::{GraphConfig, KeyPosition};

/// Character width as a fraction of the font size, the usual estimate
/// for proportional fonts when no text measurement is available.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Side of the legend color box in pixels.
pub const KEY_BOX_SIZE: f64 = 12.0;

/// Smallest plot area the layout will clamp to instead of going
/// negative.
pub const MIN_PLOT_SIZE: f64 = 20.0;

/// The rectangle inside the chart margins where data geometry is
/// drawn. Computed once per render; immutable afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Formatted-label estimates the layout needs before any geometry
/// exists.
#[derive(Debug, Clone, Default)]
pub struct LayoutInput<'a> {
    pub x_labels: &'a [String],
    pub y_labels: &'a [String],
    /// Dataset titles shown in the key.
    pub key_titles: &'a [String],
    /// Widen the side margins so the first and last x labels do not
    /// overhang the canvas (XY plots center labels on the data).
    pub edge_x_overhang: bool,
}

fn longest(labels: &[String]) -> usize {
    labels.iter().map(String::len).max().unwrap_or(0)
}

/// Compute the plot area for a configuration and its label estimates.
///
/// Reservation order and arithmetic follow the classic layout: fixed
/// margins, then title/subtitle on top, x labels and x title below,
/// y labels and y title to the left, and the key to the right or
/// below. Never returns a degenerate rectangle: undersized canvases
/// are clamped to [`MIN_PLOT_SIZE`] with a warning.
pub fn compute(config: &GraphConfig, input: &LayoutInput<'_>) -> PlotArea {
    let left = left_margin(config, input);
    let right = right_margin(config, input);
    let top = top_margin(config);
    let bottom = bottom_margin(config, input);

    let mut width = config.width - left - right;
    let mut height = config.height - top - bottom;

    if width < MIN_PLOT_SIZE || height < MIN_PLOT_SIZE {
        warn!(
            "reserved space exceeds the {}x{} canvas, clamping plot area to {}px",
            config.width, config.height, MIN_PLOT_SIZE
        );
        width = width.max(MIN_PLOT_SIZE);
        height = height.max(MIN_PLOT_SIZE);
    }

    PlotArea {
        x: left,
        y: top,
        width,
        height,
    }
}

fn left_margin(config: &GraphConfig, input: &LayoutInput<'_>) -> f64 {
    let mut margin = 7.0;
    let label_width = if config.rotate_y_labels {
        config.y_label_font_size
    } else {
        longest(input.y_labels) as f64 * CHAR_WIDTH_RATIO * config.y_label_font_size
    };
    if config.show_y_labels {
        margin += label_width;
        if config.stagger_y_labels {
            margin += label_width + 10.0;
        }
    }
    if config.show_y_title {
        margin += config.y_title_font_size + 5.0;
    }
    if input.edge_x_overhang {
        if let Some(first) = input.x_labels.first() {
            let overhang = first.len() as f64 / 2.0 * config.font_size * CHAR_WIDTH_RATIO;
            margin = margin.max(overhang);
        }
    }
    margin
}

fn right_margin(config: &GraphConfig, input: &LayoutInput<'_>) -> f64 {
    let mut margin = 7.0;
    if config.key && config.key_position == KeyPosition::Right {
        margin += longest(input.key_titles) as f64 * config.key_font_size * CHAR_WIDTH_RATIO;
        margin += KEY_BOX_SIZE;
        margin += 10.0;
    }
    if input.edge_x_overhang {
        if let Some(last) = input.x_labels.last() {
            let overhang = last.len() as f64 / 2.0 * config.font_size * CHAR_WIDTH_RATIO;
            margin = margin.max(overhang);
        }
    }
    margin
}

fn top_margin(config: &GraphConfig) -> f64 {
    let mut margin = 5.0;
    if config.show_graph_title {
        margin += config.title_font_size;
    }
    margin += 5.0;
    if config.show_graph_subtitle {
        margin += config.subtitle_font_size;
    }
    margin
}

fn bottom_margin(config: &GraphConfig, input: &LayoutInput<'_>) -> f64 {
    let mut margin = 7.0;
    if config.key && config.key_position == KeyPosition::Bottom {
        margin += input.key_titles.len() as f64 * (config.font_size + 5.0);
        margin += 10.0;
    }
    if config.show_x_labels {
        let mut label_height = config.x_label_font_size;
        if config.rotate_x_labels {
            label_height *= longest(input.x_labels) as f64 * CHAR_WIDTH_RATIO;
        }
        margin += label_height;
        if config.stagger_x_labels {
            margin += label_height + 10.0;
        }
    }
    if config.show_x_title {
        margin += config.x_title_font_size + 5.0;
    }
    margin
}
