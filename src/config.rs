//! Shared chart configuration.
//!
//! Every chart kind carries a [`GraphConfig`]; fields default to the
//! values a bare chart renders with, and the whole struct can be
//! loaded from JSON.

use serde::Deserialize;

use crate::error::{ChartError, ChartResult};

/// Where the legend (key) is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPosition {
    #[default]
    Right,
    Bottom,
}

/// Reading direction of the rotated y-axis title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleDirection {
    /// Bottom to top.
    #[default]
    BottomUp,
    /// Top to bottom.
    TopDown,
}

/// Configuration shared by all chart kinds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,

    pub show_x_guidelines: bool,
    pub show_y_guidelines: bool,
    /// Label each data point with its value (or its text override).
    pub show_data_values: bool,

    pub show_x_labels: bool,
    pub stagger_x_labels: bool,
    pub rotate_x_labels: bool,
    /// Draw every n-th x label.
    pub step_x_labels: usize,
    pub step_include_first_x_label: bool,

    pub show_y_labels: bool,
    pub rotate_y_labels: bool,
    pub stagger_y_labels: bool,
    /// Draw every n-th y label.
    pub step_y_labels: usize,
    pub step_include_first_y_label: bool,

    /// Round scale divisions so ticks land on integers.
    pub scale_integers: bool,
    /// Lower bound override for the value axis.
    pub min_scale_value: Option<f64>,
    /// Tick count the derived scale division aims for.
    pub target_ticks: usize,

    pub show_x_title: bool,
    pub x_title: String,
    pub show_y_title: bool,
    pub y_title: String,
    pub y_title_direction: TitleDirection,
    pub show_graph_title: bool,
    pub graph_title: String,
    pub show_graph_subtitle: bool,
    pub graph_subtitle: String,

    /// Show the legend.
    pub key: bool,
    pub key_position: KeyPosition,

    pub font_size: f64,
    pub title_font_size: f64,
    pub subtitle_font_size: f64,
    pub x_label_font_size: f64,
    pub x_title_font_size: f64,
    pub y_label_font_size: f64,
    pub y_title_font_size: f64,
    pub key_font_size: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            width: 500.0,
            height: 300.0,
            show_x_guidelines: false,
            show_y_guidelines: true,
            show_data_values: true,
            show_x_labels: true,
            stagger_x_labels: false,
            rotate_x_labels: false,
            step_x_labels: 1,
            step_include_first_x_label: true,
            show_y_labels: true,
            rotate_y_labels: false,
            stagger_y_labels: false,
            step_y_labels: 1,
            step_include_first_y_label: true,
            scale_integers: false,
            min_scale_value: None,
            target_ticks: 10,
            show_x_title: false,
            x_title: "X Field names".into(),
            show_y_title: false,
            y_title: "Y Scale".into(),
            y_title_direction: TitleDirection::BottomUp,
            show_graph_title: false,
            graph_title: "Graph Title".into(),
            show_graph_subtitle: false,
            graph_subtitle: "Graph Subtitle".into(),
            key: true,
            key_position: KeyPosition::Right,
            font_size: 12.0,
            title_font_size: 16.0,
            subtitle_font_size: 14.0,
            x_label_font_size: 12.0,
            x_title_font_size: 14.0,
            y_label_font_size: 12.0,
            y_title_font_size: 14.0,
            key_font_size: 10.0,
        }
    }
}

impl GraphConfig {
    /// Load a configuration from a JSON document; absent fields keep
    /// their defaults.
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json).map_err(|e| ChartError::Config(e.to_string()))
    }
}
