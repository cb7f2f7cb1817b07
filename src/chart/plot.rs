//! XY plots of paired scalar data.

use crate::chart::{
    classed, primitive_element, px, Chart, DrawHook, Frame, RenderStage, RootAttributesFn,
};
use crate::config::GraphConfig;
use crate::data::{Axis, Dataset};
use crate::error::{ChartError, ChartResult};
use crate::geometry::GeometryPrimitive;
use crate::layout::LayoutInput;
use crate::markup::Element;
use crate::range::{self, RangeOptions};
use crate::scale::ScaleTransform;
use crate::style::{plot_stylesheet, DefaultStyles, StyleResolver};
use crate::ticks::{self, format_value, TickFormat, TimeInterval};

/// A horizontal reference line at a fixed y value.
struct ConstantLine {
    value: f64,
    label: Option<String>,
    style: Option<String>,
}

/// An XY plot. Datasets are (x, y) pairs; they may differ in length
/// and are sorted along x before drawing.
pub struct Plot {
    pub config: GraphConfig,
    pub scale_x_divisions: Option<f64>,
    pub scale_y_divisions: Option<f64>,
    pub scale_x_integers: bool,
    pub scale_y_integers: bool,
    pub min_x_value: Option<f64>,
    pub max_x_value: Option<f64>,
    pub min_y_value: Option<f64>,
    pub max_y_value: Option<f64>,
    /// Fill the area under each series.
    pub area_fill: bool,
    /// Mark each point with a small circle.
    pub show_data_points: bool,
    pub draw_lines_between_points: bool,
    constant_lines: Vec<ConstantLine>,
    datasets: Vec<Dataset>,
    styles: Box<dyn StyleResolver>,
    hooks: Vec<(RenderStage, DrawHook)>,
    root_attrs: Option<RootAttributesFn>,
    stylesheet: Option<String>,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new()
    }
}

impl Plot {
    pub fn new() -> Self {
        Plot {
            config: GraphConfig::default(),
            scale_x_divisions: None,
            scale_y_divisions: None,
            scale_x_integers: false,
            scale_y_integers: false,
            min_x_value: None,
            max_x_value: None,
            min_y_value: None,
            max_y_value: None,
            area_fill: false,
            show_data_points: true,
            draw_lines_between_points: true,
            constant_lines: Vec::new(),
            datasets: Vec::new(),
            styles: Box::new(DefaultStyles),
            hooks: Vec::new(),
            root_attrs: None,
            stylesheet: None,
        }
    }

    /// Add a paired dataset. Points are ordered along x; input order
    /// does not matter.
    pub fn add_data(&mut self, mut dataset: Dataset) -> ChartResult<()> {
        dataset.validate()?;
        if !dataset.is_paired() {
            return Err(ChartError::DataShape(format!(
                "plots take (x, y) pairs, dataset '{}' has bare values",
                dataset.title
            )));
        }
        dataset.sort_by_x();
        self.datasets.push(dataset);
        Ok(())
    }

    /// Draw a horizontal reference line at `value`, with an optional
    /// label and inline style.
    pub fn add_constant_line(
        &mut self,
        value: f64,
        label: Option<String>,
        style: Option<String>,
    ) {
        self.constant_lines.push(ConstantLine {
            value,
            label,
            style,
        });
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

    pub(crate) fn render_xy(
        &self,
        x_format: &TickFormat,
        calendar: Option<&TimeInterval>,
        popup: &dyn Fn(f64, f64) -> String,
    ) -> ChartResult<String> {
        if self.datasets.is_empty() {
            return Err(ChartError::EmptyData);
        }
        let config = &self.config;

        let x_opts = RangeOptions {
            fixed_min: self.min_x_value,
            fixed_max: self.max_x_value,
            step: self.scale_x_divisions,
            integers: self.scale_x_integers,
            target_ticks: config.target_ticks,
            ..Default::default()
        };
        let y_opts = RangeOptions {
            fixed_min: self.min_y_value,
            fixed_max: self.max_y_value,
            step: self.scale_y_divisions,
            integers: self.scale_y_integers,
            target_ticks: config.target_ticks,
            ..Default::default()
        };
        let x_range = range::resolve(&self.datasets, Axis::X, &x_opts)?;
        let y_range = range::resolve(&self.datasets, Axis::Y, &y_opts)?;

        let y_format = TickFormat::number(self.scale_y_integers);
        let y_labels = ticks::labels(&y_range, &y_format);
        let key_titles: Vec<String> = self.datasets.iter().map(|d| d.title.clone()).collect();

        // Label text is needed for layout before any scale exists.
        let x_labels: Vec<String> = match calendar {
            Some(interval) => {
                let probe = ScaleTransform::new(&x_range, (0.0, 1.0), false);
                ticks::generate_calendar(&x_range, interval, &probe, x_format)?
                    .into_iter()
                    .map(|t| t.label)
                    .collect()
            }
            None => ticks::labels(&x_range, x_format),
        };

        let input = LayoutInput {
            x_labels: &x_labels,
            y_labels: &y_labels,
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

        let usable_w = frame.plot.width - config.font_size * 2.0;
        let usable_h = frame.plot.height - config.font_size * 2.0;
        let x_scale = ScaleTransform::new(&x_range, (0.0, usable_w), false);
        // measured from the bottom edge of the plot area
        let y_rise = ScaleTransform::new(&y_range, (0.0, usable_h), false);
        let plot_height = frame.plot.height;
        let map_xy = |x: f64, y: f64| (x_scale.map(x), plot_height - y_rise.map(y));

        let x_ticks = match calendar {
            Some(interval) => ticks::generate_calendar(&x_range, interval, &x_scale, x_format)?,
            None => ticks::generate(&x_range, &x_scale, x_format),
        };
        let y_spacing = y_rise.map(y_range.min + y_range.step);

        frame.run_hooks(RenderStage::BeforeAxes);
        let positions: Vec<(f64, &str)> = x_ticks
            .iter()
            .map(|t| (t.position, t.label.as_str()))
            .collect();
        frame.draw_x_labels_at(&positions);
        frame.draw_y_labels(&y_labels, y_spacing, 0.0);
        let guide_positions: Vec<f64> = x_ticks.iter().skip(1).map(|t| t.position).collect();
        frame.draw_x_guidelines_at(&guide_positions);
        frame.draw_y_guidelines(y_spacing, y_labels.len());
        frame.run_hooks(RenderStage::AfterAxes);

        frame.run_hooks(RenderStage::BeforeData);
        for (n, dataset) in self.datasets.iter().enumerate() {
            let points: Vec<(f64, f64)> = dataset
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| map_xy(p.x.unwrap_or(i as f64), p.y))
                .collect();

            if self.area_fill {
                let mut outline = Vec::with_capacity(points.len() + 2);
                outline.push((points[0].0, plot_height));
                outline.extend(points.iter().copied());
                outline.push((points[points.len() - 1].0, plot_height));
                let area = GeometryPrimitive::Polyline {
                    points: outline,
                    closed: true,
                    class: self.styles.fill_key(n, 0),
                };
                let el = primitive_element(self.styles.as_ref(), &area);
                frame.graph.append(el);
            }
            if self.draw_lines_between_points {
                let line = GeometryPrimitive::Polyline {
                    points: points.clone(),
                    closed: false,
                    class: self.styles.line_key(n),
                };
                let el = primitive_element(self.styles.as_ref(), &line);
                frame.graph.append(el);
            }
            for (point, (gx, gy)) in dataset.points.iter().zip(&points) {
                if self.show_data_points {
                    let circle = classed(
                        self.styles.as_ref(),
                        Element::new("circle")
                            .attr("cx", px(*gx))
                            .attr("cy", px(*gy))
                            .attr("r", "2.5"),
                        &self.styles.point_key(n),
                    );
                    frame.graph.append(circle);
                }
                if config.show_data_values {
                    let x_value = point.x.unwrap_or_default();
                    frame.add_popup(*gx, *gy, &popup(x_value, point.y));
                    let text = point
                        .text
                        .clone()
                        .unwrap_or_else(|| format_value(point.y));
                    frame.make_datapoint_text(*gx, *gy - 6.0, &text);
                }
            }
        }
        self.draw_constant_lines(&mut frame, &map_xy);
        frame.run_hooks(RenderStage::AfterData);

        frame.draw_titles();
        frame.draw_legend(&key_titles);
        Ok(frame.finish())
    }

    fn draw_constant_lines(&self, frame: &mut Frame<'_>, map_xy: &dyn Fn(f64, f64) -> (f64, f64)) {
        for line in &self.constant_lines {
            let (_, y) = map_xy(0.0, line.value);
            let mut path = classed(
                self.styles.as_ref(),
                Element::new("path")
                    .attr("d", format!("M 0 {} h{}", px(y), px(frame.plot.width))),
                "constantLine",
            );
            if let Some(style) = &line.style {
                path.set_attr("style", style.clone());
            }
            frame.graph.append(path);
            if let Some(label) = &line.label {
                frame.graph.append(
                    classed(self.styles.as_ref(), Element::new("text"), "constantLine")
                        .attr("x", "2")
                        .attr("y", px(y - 2.0))
                        .text(label),
                );
            }
        }
    }
}

impl Chart for Plot {
    fn render(&self) -> ChartResult<String> {
        let x_format = TickFormat::number(self.scale_x_integers);
        let popup = |x: f64, y: f64| format!("({:.2}, {:.2})", x, y);
        self.render_xy(&x_format, None, &popup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Plot {
        let mut plot = Plot::new();
        plot.config.show_data_values = false;
        plot.min_x_value = Some(0.0);
        plot.min_y_value = Some(0.0);
        plot
    }

    #[test]
    fn unpaired_dataset_is_rejected() {
        let mut plot = Plot::new();
        let result = plot.add_data(Dataset::from_values("bare", [1.0, 2.0]));
        assert!(matches!(result, Err(ChartError::DataShape(_))));
    }

    #[test]
    fn renders_lines_and_points() {
        let mut plot = chart();
        plot.add_data(Dataset::from_pairs(
            "series 1",
            [(1.0, 25.0), (2.0, 30.0), (3.0, 45.0)],
        ))
        .unwrap();
        let svg = plot.render().unwrap();
        assert!(svg.contains("class=\"line1\""));
        assert_eq!(svg.matches("class=\"dataPoint1\"").count(), 3);
    }

    #[test]
    fn datasets_may_differ_in_length() {
        let mut plot = chart();
        plot.add_data(Dataset::from_pairs("a", [(1.0, 2.0), (2.0, 4.0)]))
            .unwrap();
        plot.add_data(Dataset::from_pairs("b", [(0.5, 1.0), (1.0, 3.0), (3.0, 9.5)]))
            .unwrap();
        assert!(plot.render().is_ok());
    }

    #[test]
    fn unordered_input_is_sorted_along_x() {
        let mut plot = chart();
        plot.add_data(Dataset::from_pairs("a", [(3.0, 1.0), (1.0, 5.0), (2.0, 3.0)]))
            .unwrap();
        let svg = plot.render().unwrap();
        let chunk = svg
            .split("<path ")
            .find(|s| s.contains("class=\"line1\""))
            .unwrap();
        let d = chunk.split("d=\"").nth(1).unwrap().split('"').next().unwrap();
        let xs: Vec<f64> = d
            .split(['M', 'L'])
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().split(' ').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(xs.len(), 3);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn popups_accompany_data_values() {
        let mut plot = chart();
        plot.config.show_data_values = true;
        plot.add_data(Dataset::from_pairs("a", [(1.0, 2.0), (2.0, 4.0)]))
            .unwrap();
        let svg = plot.render().unwrap();
        assert!(svg.contains("onmouseover"));
        assert!(svg.contains("(1.00, 2.00)"));
    }

    #[test]
    fn constant_line_draws_with_label() {
        let mut plot = chart();
        plot.add_data(Dataset::from_pairs("a", [(1.0, 2.0), (2.0, 4.0)]))
            .unwrap();
        plot.add_constant_line(3.0, Some("limit".into()), None);
        let svg = plot.render().unwrap();
        assert!(svg.contains("class=\"constantLine\""));
        assert!(svg.contains(">limit</text>"));
    }

    #[test]
    fn area_fill_closes_to_baseline() {
        let mut plot = chart();
        plot.area_fill = true;
        plot.add_data(Dataset::from_pairs("a", [(1.0, 2.0), (2.0, 4.0)]))
            .unwrap();
        let svg = plot.render().unwrap();
        assert!(svg.contains("class=\"fill1\""));
    }
}
