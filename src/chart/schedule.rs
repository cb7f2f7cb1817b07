//! Schedule (Gantt) charts.

use chrono::NaiveDateTime;

use crate::chart::{
    primitive_element, Chart, DrawHook, FieldSizing, Frame, RenderStage, RootAttributesFn,
};
use crate::config::GraphConfig;
use crate::data::{Axis, Dataset};
use crate::error::{ChartError, ChartResult};
use crate::geometry;
use crate::layout::LayoutInput;
use crate::range::{self, RangeOptions};
use crate::scale::ScaleTransform;
use crate::style::{bar_stylesheet, DefaultStyles, StyleResolver};
use crate::ticks::{self, TickFormat, TimeInterval};

/// One bar on the schedule.
#[derive(Debug, Clone)]
pub struct Task {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Row the bar renders in; tasks default to their insertion
    /// order. Rows are authoritative: overlapping tasks on the same
    /// row stay overlapped.
    pub row: usize,
}

/// A schedule chart: one horizontal bar per task on a date axis.
pub struct Schedule {
    pub config: GraphConfig,
    /// strftime-style format for x-axis labels.
    pub x_label_format: String,
    /// Calendar tick spacing, e.g. `"1 month"`. Derived numerically
    /// when unset.
    pub timescale_divisions: Option<String>,
    /// Fixed lower x bound.
    pub min_x_value: Option<NaiveDateTime>,
    /// Leave a gap between rows.
    pub bar_gap: bool,
    tasks: Vec<Task>,
    styles: Box<dyn StyleResolver>,
    hooks: Vec<(RenderStage, DrawHook)>,
    root_attrs: Option<RootAttributesFn>,
    stylesheet: Option<String>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        let config = GraphConfig {
            key: false,
            show_data_values: false,
            ..Default::default()
        };
        Schedule {
            config,
            x_label_format: "%Y-%m-%d".into(),
            timescale_divisions: None,
            min_x_value: None,
            bar_gap: true,
            tasks: Vec::new(),
            styles: Box::new(DefaultStyles),
            hooks: Vec::new(),
            root_attrs: None,
            stylesheet: None,
        }
    }

    /// Add a task on the next row.
    pub fn add_task(
        &mut self,
        label: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ChartResult<()> {
        let row = self.tasks.len();
        self.add_task_row(label, start, end, row)
    }

    /// Add a task on an explicit row.
    pub fn add_task_row(
        &mut self,
        label: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        row: usize,
    ) -> ChartResult<()> {
        let label = label.into();
        if end < start {
            return Err(ChartError::DataShape(format!(
                "task '{}' ends before it starts",
                label
            )));
        }
        self.tasks.push(Task {
            label,
            start,
            end,
            row,
        });
        Ok(())
    }

    pub fn set_styles(&mut self, styles: Box<dyn StyleResolver>) {
        self.styles = styles;
    }

    pub fn add_hook(&mut self, stage: RenderStage, hook: DrawHook) {
        self.hooks.push((stage, hook));
    }

    pub fn set_root_attributes(&mut self, f: RootAttributesFn) {
        self.root_attrs = Some(f);
    }

    pub fn set_stylesheet(&mut self, css: impl Into<String>) {
        self.stylesheet = Some(css.into());
    }

    fn epoch(date: NaiveDateTime) -> f64 {
        date.and_utc().timestamp() as f64
    }

    /// Row labels, bottom row first; rows without a labeled task stay
    /// blank.
    fn row_labels(&self) -> Vec<String> {
        let rows = self.tasks.iter().map(|t| t.row).max().unwrap_or(0) + 1;
        let mut labels = vec![String::new(); rows];
        for task in &self.tasks {
            if labels[task.row].is_empty() {
                labels[task.row] = task.label.clone();
            }
        }
        labels
    }
}

impl Chart for Schedule {
    fn render(&self) -> ChartResult<String> {
        if self.tasks.is_empty() {
            return Err(ChartError::EmptyData);
        }
        let config = &self.config;

        // The resolver works on datasets; the task endpoints become
        // one throwaway series on the x axis.
        let endpoints = Dataset::from_pairs(
            "",
            self.tasks
                .iter()
                .flat_map(|t| [(Self::epoch(t.start), 0.0), (Self::epoch(t.end), 0.0)]),
        );
        let opts = RangeOptions {
            fixed_min: self.min_x_value.map(Self::epoch),
            target_ticks: config.target_ticks,
            ..Default::default()
        };
        let x_range = range::resolve(&[endpoints], Axis::X, &opts)?;

        let x_format = TickFormat::DateTime {
            format: self.x_label_format.clone(),
        };
        let calendar = self
            .timescale_divisions
            .as_deref()
            .map(TimeInterval::parse)
            .transpose()?;

        let row_labels = self.row_labels();
        let x_labels: Vec<String> = match &calendar {
            Some(interval) => {
                let probe = ScaleTransform::new(&x_range, (0.0, 1.0), false);
                ticks::generate_calendar(&x_range, interval, &probe, &x_format)?
                    .into_iter()
                    .map(|t| t.label)
                    .collect()
            }
            None => ticks::labels(&x_range, &x_format),
        };

        let empty: Vec<String> = Vec::new();
        let input = LayoutInput {
            x_labels: &x_labels,
            y_labels: &row_labels,
            key_titles: &empty,
            edge_x_overhang: false,
        };
        let stylesheet = self.stylesheet.as_deref().unwrap_or_else(|| bar_stylesheet());
        let mut frame = Frame::new(
            config,
            self.styles.as_ref(),
            stylesheet,
            self.root_attrs.as_ref(),
            &input,
            &self.hooks,
        );

        let usable_w = frame.plot.width - config.font_size * 2.0;
        let x_scale = ScaleTransform::new(&x_range, (0.0, usable_w), false);
        let x_ticks = match &calendar {
            Some(interval) => ticks::generate_calendar(&x_range, interval, &x_scale, &x_format)?,
            None => ticks::generate(&x_range, &x_scale, &x_format),
        };
        let row_height = frame.field_height(row_labels.len(), FieldSizing::default());

        frame.run_hooks(RenderStage::BeforeAxes);
        let positions: Vec<(f64, &str)> = x_ticks
            .iter()
            .map(|t| (t.position, t.label.as_str()))
            .collect();
        frame.draw_x_labels_at(&positions);
        frame.draw_y_labels(&row_labels, row_height, -row_height / 2.0);
        let guide_positions: Vec<f64> = x_ticks.iter().skip(1).map(|t| t.position).collect();
        frame.draw_x_guidelines_at(&guide_positions);
        frame.draw_y_guidelines(row_height, row_labels.len());
        frame.run_hooks(RenderStage::AfterAxes);

        frame.run_hooks(RenderStage::BeforeData);
        let spans: Vec<(f64, f64, usize)> = self
            .tasks
            .iter()
            .map(|t| (Self::epoch(t.start), Self::epoch(t.end), t.row))
            .collect();
        let fill = |d: usize, f: usize| self.styles.fill_key(d, f);
        let segments = geometry::schedule_segments(
            &spans,
            &x_scale,
            row_height,
            frame.plot.height,
            self.bar_gap,
            &fill,
        )?;
        for segment in &segments {
            let el = primitive_element(self.styles.as_ref(), segment);
            frame.graph.append(el);
        }
        frame.run_hooks(RenderStage::AfterData);

        frame.draw_titles();
        Ok(frame.finish())
    }
}
