//! Pie charts.

use crate::chart::{px, Chart, DrawHook, Frame, RenderStage, RootAttributesFn};
use crate::config::GraphConfig;
use crate::data::Dataset;
use crate::error::{ChartError, ChartResult};
use crate::geometry::{self, sector_point, GeometryPrimitive};
use crate::layout::LayoutInput;
use crate::style::{pie_stylesheet, DefaultStyles, StyleResolver};
use crate::ticks::{format_value, TickFormat};

/// A pie chart: one dataset of non-negative values, one wedge per
/// field, sectors in strict input order.
pub struct Pie {
    pub config: GraphConfig,
    /// Wedge labels, also shown in the key.
    pub fields: Vec<String>,
    /// Degrees clockwise from 12 o'clock where the first sector
    /// starts.
    pub zero_angle: f64,
    /// Label each wedge with its field name.
    pub show_data_labels: bool,
    /// Append the percentage share to wedge labels.
    pub show_percent: bool,
    /// Append the actual value to wedge labels.
    pub show_actual_values: bool,
    /// Pull the largest wedge out of the pie.
    pub expand_greatest: bool,
    /// Distance an expanded wedge moves, in pixels.
    pub expand_gap: f64,
    dataset: Option<Dataset>,
    styles: Box<dyn StyleResolver>,
    hooks: Vec<(RenderStage, DrawHook)>,
    root_attrs: Option<RootAttributesFn>,
    stylesheet: Option<String>,
}

impl Pie {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let config = GraphConfig {
            show_x_labels: false,
            show_y_labels: false,
            show_x_guidelines: false,
            show_y_guidelines: false,
            ..Default::default()
        };
        Pie {
            config,
            fields: fields.into_iter().map(Into::into).collect(),
            zero_angle: 0.0,
            show_data_labels: false,
            show_percent: true,
            show_actual_values: false,
            expand_greatest: false,
            expand_gap: 10.0,
            dataset: None,
            styles: Box::new(DefaultStyles),
            hooks: Vec::new(),
            root_attrs: None,
            stylesheet: None,
        }
    }

    /// Set the chart's dataset, one value per field. A second call
    /// replaces the first.
    pub fn add_data(&mut self, dataset: Dataset) -> ChartResult<()> {
        dataset.validate()?;
        if dataset.is_paired() {
            return Err(ChartError::DataShape(format!(
                "pie charts take bare value sequences, dataset '{}' has (x, y) pairs",
                dataset.title
            )));
        }
        if dataset.len() != self.fields.len() {
            return Err(ChartError::DataShape(format!(
                "dataset '{}' has {} values for {} fields",
                dataset.title,
                dataset.len(),
                self.fields.len()
            )));
        }
        self.dataset = Some(dataset);
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

    fn wedge_label(&self, field: &str, value: f64, total: f64) -> Option<String> {
        if !self.show_data_labels {
            return None;
        }
        let mut label = field.to_string();
        if self.show_actual_values {
            label.push_str(&format!(" [{}]", format_value(value)));
        }
        if self.show_percent {
            let percent = TickFormat::Percent.format((value / total * 100.0).round());
            label.push_str(&format!(" {}", percent));
        }
        Some(label)
    }
}

impl Chart for Pie {
    fn render(&self) -> ChartResult<String> {
        if self.fields.is_empty() {
            return Err(ChartError::Config("pie chart has no fields".into()));
        }
        let dataset = self.dataset.as_ref().ok_or(ChartError::EmptyData)?;
        let values: Vec<f64> = dataset.points.iter().map(|p| p.y).collect();
        let total: f64 = values.iter().sum();

        let key_titles = self.fields.clone();
        let empty: Vec<String> = Vec::new();
        let input = LayoutInput {
            x_labels: &empty,
            y_labels: &empty,
            key_titles: &key_titles,
            edge_x_overhang: false,
        };
        let stylesheet = self.stylesheet.as_deref().unwrap_or_else(|| pie_stylesheet());
        let mut frame = Frame::without_axes(
            &self.config,
            self.styles.as_ref(),
            stylesheet,
            self.root_attrs.as_ref(),
            &input,
            &self.hooks,
        );

        let radius = (frame.plot.width.min(frame.plot.height)) / 2.0 - 10.0;
        let cx = frame.plot.width / 2.0;
        let cy = frame.plot.height / 2.0;

        let fill = |d: usize, f: usize| self.styles.fill_key(d, f);
        let sectors =
            geometry::pie_sectors(&values, cx, cy, radius, self.zero_angle, &fill)?;

        let greatest = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);

        frame.run_hooks(RenderStage::BeforeData);
        for (i, sector) in sectors.iter().enumerate() {
            let mut el = crate::chart::primitive_element(self.styles.as_ref(), sector);
            let (start, sweep) = match sector {
                GeometryPrimitive::Sector {
                    start_deg,
                    sweep_deg,
                    ..
                } => (*start_deg, *sweep_deg),
                _ => (0.0, 0.0),
            };
            let mid = start + sweep / 2.0;
            if self.expand_greatest && Some(i) == greatest {
                let (dx, dy) = sector_point(0.0, 0.0, self.expand_gap, mid);
                el.set_attr("transform", format!("translate({} {})", px(dx), px(dy)));
            }
            frame.graph.append(el);

            if let Some(label) = self.wedge_label(&self.fields[i], values[i], total) {
                let (lx, ly) = sector_point(cx, cy, radius * 2.0 / 3.0, mid);
                frame.make_datapoint_text(lx, ly, &label);
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

    fn chart(values: &[f64]) -> Pie {
        let mut pie = Pie::new(["a", "b", "c"]);
        pie.add_data(Dataset::from_values("share", values.iter().copied()))
            .unwrap();
        pie
    }

    #[test]
    fn renders_one_wedge_per_field() {
        let svg = chart(&[1.0, 1.0, 2.0]).render().unwrap();
        assert!(svg.contains("class=\"fill1\""));
        assert!(svg.contains("class=\"fill2\""));
        assert!(svg.contains("class=\"fill3\""));
        // no axis skeleton on a pie
        assert!(!svg.contains("id=\"xAxis\""));
    }

    #[test]
    fn zero_total_fails() {
        let pie = chart(&[0.0, 0.0, 0.0]);
        assert!(matches!(pie.render(), Err(ChartError::Config(_))));
    }

    #[test]
    fn wedge_count_mismatch_is_rejected() {
        let mut pie = Pie::new(["a", "b"]);
        let result = pie.add_data(Dataset::from_values("share", [1.0]));
        assert!(matches!(result, Err(ChartError::DataShape(_))));
    }

    #[test]
    fn labels_carry_percent_and_value() {
        let mut pie = chart(&[1.0, 1.0, 2.0]);
        pie.show_data_labels = true;
        pie.show_actual_values = true;
        let svg = pie.render().unwrap();
        assert!(svg.contains("c [2] 50%"));
    }

    #[test]
    fn expanded_wedge_is_translated() {
        let mut pie = chart(&[1.0, 1.0, 2.0]);
        pie.expand_greatest = true;
        let svg = pie.render().unwrap();
        // the largest wedge (fill3) carries its own translate
        assert!(svg.contains("class=\"fill3\" transform=\"translate("));
    }

    #[test]
    fn render_without_data_is_empty_data() {
        let pie = Pie::new(["a"]);
        assert!(matches!(pie.render(), Err(ChartError::EmptyData)));
    }
}
