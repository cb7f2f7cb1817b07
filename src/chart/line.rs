//! Line charts over categorical fields.

use crate::chart::{
    classed, primitive_element, tick_span_end, Chart, DrawHook, FieldSizing, Frame, RenderStage,
    RootAttributesFn,
};
use crate::config::GraphConfig;
use crate::data::Dataset;
use crate::error::{ChartError, ChartResult};
use crate::geometry;
use crate::layout::LayoutInput;
use crate::markup::Element;
use crate::range::{self, RangeOptions};
use crate::scale::ScaleTransform;
use crate::style::{plot_stylesheet, DefaultStyles, StyleResolver};
use crate::ticks::{self, TickFormat};

/// A line chart: one polyline per dataset across a fixed field list.
pub struct Line {
    pub config: GraphConfig,
    /// Category names along the x axis.
    pub fields: Vec<String>,
    /// Accumulate each dataset on top of the ones before it.
    pub stacked: bool,
    /// Fill the area under each line.
    pub area_fill: bool,
    /// Mark each vertex with a small circle.
    pub show_data_points: bool,
    /// Explicit value-axis step; derived when unset.
    pub scale_divisions: Option<f64>,
    datasets: Vec<Dataset>,
    styles: Box<dyn StyleResolver>,
    hooks: Vec<(RenderStage, DrawHook)>,
    root_attrs: Option<RootAttributesFn>,
    stylesheet: Option<String>,
}

impl Line {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Line {
            config: GraphConfig::default(),
            fields: fields.into_iter().map(Into::into).collect(),
            stacked: false,
            area_fill: false,
            show_data_points: true,
            scale_divisions: None,
            datasets: Vec::new(),
            styles: Box::new(DefaultStyles),
            hooks: Vec::new(),
            root_attrs: None,
            stylesheet: None,
        }
    }

    /// Add a data series; it must cover every field.
    pub fn add_data(&mut self, dataset: Dataset) -> ChartResult<()> {
        dataset.validate()?;
        if dataset.is_paired() {
            return Err(ChartError::DataShape(format!(
                "line charts take bare value sequences, dataset '{}' has (x, y) pairs",
                dataset.title
            )));
        }
        if dataset.len() < self.fields.len() {
            return Err(ChartError::DataShape(format!(
                "dataset '{}' has {} values for {} fields",
                dataset.title,
                dataset.len(),
                self.fields.len()
            )));
        }
        self.datasets.push(dataset);
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
}

impl Chart for Line {
    fn render(&self) -> ChartResult<String> {
        if self.fields.is_empty() {
            return Err(ChartError::Config("line chart has no fields".into()));
        }
        if self.datasets.is_empty() {
            return Err(ChartError::EmptyData);
        }

        let config = &self.config;
        let format = TickFormat::number(config.scale_integers);
        let opts = RangeOptions {
            fixed_min: config.min_scale_value,
            step: self.scale_divisions,
            integers: config.scale_integers,
            target_ticks: config.target_ticks,
            stacked: self.stacked,
            ..Default::default()
        };
        let value_range = range::resolve(&self.datasets, crate::data::Axis::Y, &opts)?;
        let value_labels = ticks::labels(&value_range, &format);
        let key_titles: Vec<String> = self.datasets.iter().map(|d| d.title.clone()).collect();

        let input = LayoutInput {
            x_labels: &self.fields,
            y_labels: &value_labels,
            key_titles: &key_titles,
            edge_x_overhang: true,
        };
        let stylesheet = self.stylesheet.as_deref().unwrap_or_else(|| plot_stylesheet());
        let mut frame = Frame::new(
            config,
            self.styles.as_ref(),
            stylesheet,
            self.root_attrs.as_ref(),
            &input,
            &self.hooks,
        );

        let sizing = FieldSizing {
            right_font: true,
            right_align: true,
            top_font: true,
            top_align: true,
        };
        let field_width = frame.field_width(self.fields.len(), sizing);
        let field_height = frame.field_height(value_labels.len(), sizing);

        frame.run_hooks(RenderStage::BeforeAxes);
        frame.draw_x_labels(&self.fields, field_width, 0.0);
        frame.draw_y_labels(&value_labels, field_height, 0.0);
        frame.draw_x_guidelines(field_width, self.fields.len());
        frame.draw_y_guidelines(field_height, value_labels.len());
        frame.run_hooks(RenderStage::AfterAxes);

        let tick_end = tick_span_end(&value_range, value_labels.len());
        let usable = frame.plot.height - config.font_size * 2.0;
        let scale = ScaleTransform::with_domain((value_range.min, tick_end), (0.0, usable), false);

        frame.run_hooks(RenderStage::BeforeData);
        let fill = |d: usize, f: usize| self.styles.fill_key(d, f);
        let line = |d: usize, _f: usize| self.styles.line_key(d);
        let series = geometry::line_series(
            &self.datasets,
            self.fields.len(),
            field_width,
            frame.plot.height,
            &scale,
            self.stacked,
            self.area_fill,
            &fill,
            &line,
        )?;
        for s in &series {
            if let Some(area) = &s.area {
                let el = primitive_element(self.styles.as_ref(), area);
                frame.graph.append(el);
            }
            let el = primitive_element(self.styles.as_ref(), &s.polyline);
            frame.graph.append(el);
            for (x, y, text) in &s.vertices {
                if self.show_data_points {
                    let point = classed(
                        self.styles.as_ref(),
                        Element::new("circle")
                            .attr("cx", crate::chart::px(*x))
                            .attr("cy", crate::chart::px(*y))
                            .attr("r", "2.5"),
                        &self.styles.point_key(s.dataset_index),
                    );
                    frame.graph.append(point);
                }
                frame.make_datapoint_text(*x, *y - 6.0, text);
            }
        }
        frame.run_hooks(RenderStage::AfterData);

        frame.draw_titles();
        frame.draw_legend(&key_titles);
        Ok(frame.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Line {
        let mut chart = Line::new(["Mon", "Tue", "Wed"]);
        chart.config.show_data_values = false;
        chart
    }

    #[test]
    fn renders_one_path_per_dataset() {
        let mut c = chart();
        c.add_data(Dataset::from_values("a", [1.0, 2.0, 3.0])).unwrap();
        c.add_data(Dataset::from_values("b", [3.0, 1.0, 2.0])).unwrap();
        let svg = c.render().unwrap();
        assert!(svg.contains("class=\"line1\""));
        assert!(svg.contains("class=\"line2\""));
        // vertices marked
        assert!(svg.contains("class=\"dataPoint1\""));
    }

    #[test]
    fn area_fill_adds_closed_paths() {
        let mut c = chart();
        c.area_fill = true;
        c.add_data(Dataset::from_values("a", [1.0, 2.0, 3.0])).unwrap();
        let svg = c.render().unwrap();
        assert!(svg.contains("class=\"fill1\""));
        assert!(svg.contains("Z\""));
    }

    #[test]
    fn stacked_series_render_in_reverse_order() {
        let mut c = chart();
        c.stacked = true;
        c.add_data(Dataset::from_values("a", [1.0, 1.0, 1.0])).unwrap();
        c.add_data(Dataset::from_values("b", [1.0, 1.0, 1.0])).unwrap();
        let svg = c.render().unwrap();
        // line2 drawn before line1 so the first dataset paints on top
        let pos1 = svg.find("class=\"line1\"").unwrap();
        let pos2 = svg.find("class=\"line2\"").unwrap();
        assert!(pos2 < pos1);
    }

    #[test]
    fn point_text_override_is_used() {
        let mut c = Line::new(["a", "b"]);
        let mut set = Dataset::from_values("s", [1.0, 2.0]);
        set.points[1].text = Some("peak".into());
        c.add_data(set).unwrap();
        let svg = c.render().unwrap();
        assert!(svg.contains(">peak</text>"));
    }
}
