//! Bar charts, vertical and horizontal.

use crate::chart::{
    primitive_element, tick_span_end, Chart, DrawHook, FieldSizing, Frame, RenderStage,
    RootAttributesFn,
};
use crate::config::GraphConfig;
use crate::data::Dataset;
use crate::error::{ChartError, ChartResult};
use crate::geometry::{self, BarStack};
use crate::layout::LayoutInput;
use crate::range::{self, RangeOptions};
use crate::scale::ScaleTransform;
use crate::style::{bar_stylesheet, DefaultStyles, StyleResolver};
use crate::ticks::{self, TickFormat};

/// Direction the bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// A bar chart over a fixed list of category fields.
///
/// Datasets are bare value sequences, one value per field. Adjacent
/// datasets overlap, stack, or sit side by side depending on
/// [`Bar::stack`].
pub struct Bar {
    pub config: GraphConfig,
    pub orientation: Orientation,
    /// Category names along the field axis.
    pub fields: Vec<String>,
    pub stack: BarStack,
    /// Leave a gap between bars.
    pub bar_gap: bool,
    /// Explicit value-axis step; derived when unset.
    pub scale_divisions: Option<f64>,
    datasets: Vec<Dataset>,
    styles: Box<dyn StyleResolver>,
    hooks: Vec<(RenderStage, DrawHook)>,
    root_attrs: Option<RootAttributesFn>,
    stylesheet: Option<String>,
}

impl Bar {
    /// A vertical bar chart over the given fields.
    pub fn vertical(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(fields, Orientation::Vertical, GraphConfig::default())
    }

    /// A horizontal bar chart: rows instead of columns, value
    /// guidelines vertical.
    pub fn horizontal(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let config = GraphConfig {
            rotate_y_labels: true,
            show_x_guidelines: true,
            show_y_guidelines: false,
            ..Default::default()
        };
        Self::new(fields, Orientation::Horizontal, config)
    }

    fn new(
        fields: impl IntoIterator<Item = impl Into<String>>,
        orientation: Orientation,
        config: GraphConfig,
    ) -> Self {
        Bar {
            config,
            orientation,
            fields: fields.into_iter().map(Into::into).collect(),
            stack: BarStack::default(),
            bar_gap: true,
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
                "bar charts take bare value sequences, dataset '{}' has (x, y) pairs",
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

    /// Replace the style resolver.
    pub fn set_styles(&mut self, styles: Box<dyn StyleResolver>) {
        self.styles = styles;
    }

    /// Register a draw hook at a pipeline stage.
    pub fn add_hook(&mut self, stage: RenderStage, hook: DrawHook) {
        self.hooks.push((stage, hook));
    }

    /// Override the root element attribute set.
    pub fn set_root_attributes(&mut self, f: RootAttributesFn) {
        self.root_attrs = Some(f);
    }

    /// Replace the bundled stylesheet with custom CSS text.
    pub fn set_stylesheet(&mut self, css: impl Into<String>) {
        self.stylesheet = Some(css.into());
    }

    fn key_titles(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.title.clone()).collect()
    }

    fn render_vertical(&self) -> ChartResult<String> {
        let config = &self.config;
        let format = TickFormat::number(config.scale_integers);
        let opts = RangeOptions {
            fixed_min: config.min_scale_value,
            step: self.scale_divisions,
            integers: config.scale_integers,
            target_ticks: config.target_ticks,
            stacked: self.stack == BarStack::Top,
            include_zero: true,
            ..Default::default()
        };
        let value_range = range::resolve(&self.datasets, crate::data::Axis::Y, &opts)?;
        let value_labels = ticks::labels(&value_range, &format);
        let key_titles = self.key_titles();

        let input = LayoutInput {
            x_labels: &self.fields,
            y_labels: &value_labels,
            key_titles: &key_titles,
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

        let sizing = FieldSizing {
            top_font: true,
            top_align: true,
            ..Default::default()
        };
        let field_width = frame.field_width(self.fields.len(), sizing);
        let field_height = frame.field_height(value_labels.len(), sizing);

        frame.run_hooks(RenderStage::BeforeAxes);
        frame.draw_x_labels(&self.fields, field_width, field_width / 2.0);
        frame.draw_y_labels(&value_labels, field_height, 0.0);
        frame.draw_x_guidelines(field_width, self.fields.len());
        frame.draw_y_guidelines(field_height, value_labels.len());
        frame.run_hooks(RenderStage::AfterAxes);

        let tick_end = tick_span_end(&value_range, value_labels.len());
        let usable = frame.plot.height - config.font_size * 2.0;
        let scale = ScaleTransform::with_domain((value_range.min, tick_end), (0.0, usable), false);

        frame.run_hooks(RenderStage::BeforeData);
        let fill = |d: usize, f: usize| self.styles.fill_key(d, f);
        let (shapes, labels) = geometry::vertical_bars(
            &self.datasets,
            self.fields.len(),
            field_width,
            frame.plot.height,
            &scale,
            self.stack,
            self.bar_gap,
            &fill,
        )?;
        for shape in &shapes {
            let el = primitive_element(self.styles.as_ref(), shape);
            frame.graph.append(el);
        }
        for label in &labels {
            frame.make_datapoint_text(label.x, label.y, &label.text);
        }
        frame.run_hooks(RenderStage::AfterData);

        frame.draw_titles();
        frame.draw_legend(&key_titles);
        Ok(frame.finish())
    }

    fn render_horizontal(&self) -> ChartResult<String> {
        let config = &self.config;
        let format = TickFormat::number(config.scale_integers);
        let opts = RangeOptions {
            fixed_min: config.min_scale_value,
            step: self.scale_divisions,
            integers: config.scale_integers,
            target_ticks: config.target_ticks,
            stacked: self.stack == BarStack::Top,
            include_zero: true,
            ..Default::default()
        };
        let value_range = range::resolve(&self.datasets, crate::data::Axis::Y, &opts)?;
        let value_labels = ticks::labels(&value_range, &format);
        let key_titles = self.key_titles();

        let input = LayoutInput {
            x_labels: &value_labels,
            y_labels: &self.fields,
            key_titles: &key_titles,
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

        let sizing = FieldSizing {
            right_font: true,
            right_align: true,
            ..Default::default()
        };
        let field_width = frame.field_width(value_labels.len(), sizing);
        let field_height = frame.field_height(self.fields.len(), sizing);

        frame.run_hooks(RenderStage::BeforeAxes);
        frame.draw_x_labels(&value_labels, field_width, 0.0);
        frame.draw_y_labels(&self.fields, field_height, -field_height / 2.0);
        frame.draw_x_guidelines(field_width, value_labels.len());
        frame.draw_y_guidelines(field_height, self.fields.len());
        frame.run_hooks(RenderStage::AfterAxes);

        let tick_end = tick_span_end(&value_range, value_labels.len());
        let usable = frame.plot.width - config.font_size * 2.0;
        let scale = ScaleTransform::with_domain((value_range.min, tick_end), (0.0, usable), false);

        frame.run_hooks(RenderStage::BeforeData);
        let fill = |d: usize, f: usize| self.styles.fill_key(d, f);
        let (shapes, labels) = geometry::horizontal_bars(
            &self.datasets,
            self.fields.len(),
            field_height,
            frame.plot.height,
            &scale,
            self.stack,
            self.bar_gap,
            config.font_size,
            &fill,
        )?;
        for shape in &shapes {
            let el = primitive_element(self.styles.as_ref(), shape);
            frame.graph.append(el);
        }
        for label in &labels {
            frame.make_datapoint_text_styled(
                label.x,
                label.y,
                &label.text,
                Some("text-anchor: start;"),
            );
        }
        frame.run_hooks(RenderStage::AfterData);

        frame.draw_titles();
        frame.draw_legend(&key_titles);
        Ok(frame.finish())
    }
}

impl Chart for Bar {
    fn render(&self) -> ChartResult<String> {
        if self.fields.is_empty() {
            return Err(ChartError::Config("bar chart has no fields".into()));
        }
        if self.datasets.is_empty() {
            return Err(ChartError::EmptyData);
        }
        match self.orientation {
            Orientation::Vertical => self.render_vertical(),
            Orientation::Horizontal => self.render_horizontal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<&'static str> {
        vec!["Jan", "Feb", "Mar"]
    }

    #[test]
    fn render_without_data_is_empty_data() {
        let chart = Bar::vertical(fields());
        assert!(matches!(chart.render(), Err(ChartError::EmptyData)));
    }

    #[test]
    fn paired_dataset_is_rejected() {
        let mut chart = Bar::vertical(fields());
        let result = chart.add_data(Dataset::from_pairs("pairs", [(1.0, 2.0)]));
        assert!(matches!(result, Err(ChartError::DataShape(_))));
    }

    #[test]
    fn short_dataset_is_rejected() {
        let mut chart = Bar::vertical(fields());
        let result = chart.add_data(Dataset::from_values("short", [1.0, 2.0]));
        assert!(matches!(result, Err(ChartError::DataShape(_))));
    }

    #[test]
    fn renders_one_rect_per_field() {
        let mut chart = Bar::vertical(fields());
        chart.config.show_data_values = false;
        chart.add_data(Dataset::from_values("Sales", [12.0, 45.0, 21.0]))
            .unwrap();
        let svg = chart.render().unwrap();
        // graph background plus three bars
        assert_eq!(svg.matches("<rect").count(), 2 + 3 + 1); // svg bg, graph bg, bars, key box
        assert!(svg.contains("class=\"fill1\""));
        assert!(svg.contains("Sales"));
        assert!(!svg.contains("<?xml"));
    }

    #[test]
    fn horizontal_renders_and_rotates_y_labels() {
        let mut chart = Bar::horizontal(fields());
        chart.add_data(Dataset::from_values("Sales", [12.0, 45.0, 21.0]))
            .unwrap();
        let svg = chart.render().unwrap();
        assert!(svg.contains("class=\"yAxisLabels\""));
        assert!(svg.contains("rotate(90"));
    }

    #[test]
    fn stacked_and_side_modes_render() {
        for stack in [BarStack::Top, BarStack::Side] {
            let mut chart = Bar::vertical(fields());
            chart.stack = stack;
            chart.add_data(Dataset::from_values("a", [1.0, 2.0, 3.0])).unwrap();
            chart.add_data(Dataset::from_values("b", [3.0, 2.0, 1.0])).unwrap();
            let svg = chart.render().unwrap();
            assert!(svg.contains("class=\"fill2\""));
        }
    }

    #[test]
    fn hooks_run_in_their_stage() {
        let mut chart = Bar::vertical(fields());
        chart.add_data(Dataset::from_values("a", [1.0, 2.0, 3.0])).unwrap();
        chart.add_hook(
            RenderStage::AfterData,
            Box::new(|graph| {
                graph.append(crate::markup::Element::new("circle").attr("id", "hooked"));
            }),
        );
        let svg = chart.render().unwrap();
        assert!(svg.contains("id=\"hooked\""));
    }

    #[test]
    fn root_attribute_override_drops_dimensions() {
        let mut chart = Bar::vertical(fields());
        chart.add_data(Dataset::from_values("a", [1.0, 2.0, 3.0])).unwrap();
        chart.set_root_attributes(Box::new(|config| {
            vec![
                ("xmlns".into(), "http://www.w3.org/2000/svg".into()),
                (
                    "viewBox".into(),
                    format!("0 0 {} {}", config.width, config.height),
                ),
            ]
        }));
        let svg = chart.render().unwrap();
        // the root element carries only the overridden attributes
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 500 300\">"
        ));
    }
}
