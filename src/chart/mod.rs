//! Chart renderers.
//!
//! Each chart kind owns its configuration and datasets, and exposes a
//! single [`Chart::render`] producing the finished SVG document. The
//! shared [`Frame`] carries the per-render pipeline state: plot-area
//! layout, the document skeleton, axis labels, guidelines, titles and
//! the legend. Chart modules only add their own geometry.

pub mod bar;
pub mod line;
pub mod pie;
pub mod plot;
pub mod schedule;
pub mod time_series;

pub use bar::{Bar, Orientation};
pub use line::Line;
pub use pie::Pie;
pub use plot::Plot;
pub use schedule::Schedule;
pub use time_series::TimeSeries;

use crate::config::{GraphConfig, KeyPosition, TitleDirection};
use crate::error::ChartResult;
use crate::layout::{self, LayoutInput, PlotArea, KEY_BOX_SIZE};
use crate::markup::Element;
use crate::style::StyleResolver;

/// A renderable chart.
pub trait Chart {
    /// Render to an SVG document string. Configuration and data are
    /// immutable during the render; on error no markup is produced.
    fn render(&self) -> ChartResult<String>;
}

/// Pipeline stages at which draw hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    BeforeAxes,
    AfterAxes,
    BeforeData,
    AfterData,
}

/// A draw hook: appends markup to the plot-area group at its stage.
pub type DrawHook = Box<dyn Fn(&mut Element) + Send + Sync>;

/// Strategy for the attributes placed on the root `<svg>` element.
/// Overriding lets a caller drop the explicit width/height for
/// responsive embedding.
pub type RootAttributesFn = Box<dyn Fn(&GraphConfig) -> Vec<(String, String)> + Send + Sync>;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// The built-in root attribute set.
pub fn default_root_attributes(config: &GraphConfig) -> Vec<(String, String)> {
    vec![
        ("xmlns".into(), SVG_NAMESPACE.into()),
        ("xmlns:xlink".into(), XLINK_NAMESPACE.into()),
        ("width".into(), px(config.width)),
        ("height".into(), px(config.height)),
        (
            "viewBox".into(),
            format!("0 0 {} {}", px(config.width), px(config.height)),
        ),
    ]
}

/// Format a pixel coordinate: two decimals, trailing zeros trimmed.
pub(crate) fn px(value: f64) -> String {
    let s = format!("{:.2}", value);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// How a chart divides the plot area into fields. The flags reserve a
/// font-height inset and drop the trailing field, matching each chart
/// kind's label alignment.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FieldSizing {
    pub right_font: bool,
    pub right_align: bool,
    pub top_font: bool,
    pub top_align: bool,
}

/// Per-render pipeline state shared by every chart kind.
pub(crate) struct Frame<'a> {
    pub config: &'a GraphConfig,
    pub styles: &'a dyn StyleResolver,
    pub plot: PlotArea,
    root: Element,
    /// The plot-area group; geometry and axis labels land here.
    pub graph: Element,
    /// Titles and legend, appended to the root after the graph.
    overlay: Vec<Element>,
    /// Data-point labels and popups, painted above everything else.
    pub foreground: Element,
    hooks: &'a [(RenderStage, DrawHook)],
}

impl<'a> Frame<'a> {
    pub fn new(
        config: &'a GraphConfig,
        styles: &'a dyn StyleResolver,
        stylesheet: &str,
        root_attrs: Option<&RootAttributesFn>,
        input: &LayoutInput<'_>,
        hooks: &'a [(RenderStage, DrawHook)],
    ) -> Self {
        Self::build(config, styles, stylesheet, root_attrs, input, hooks, true)
    }

    /// A frame without the axis skeleton; pie charts have no axes.
    pub fn without_axes(
        config: &'a GraphConfig,
        styles: &'a dyn StyleResolver,
        stylesheet: &str,
        root_attrs: Option<&RootAttributesFn>,
        input: &LayoutInput<'_>,
        hooks: &'a [(RenderStage, DrawHook)],
    ) -> Self {
        Self::build(config, styles, stylesheet, root_attrs, input, hooks, false)
    }

    fn build(
        config: &'a GraphConfig,
        styles: &'a dyn StyleResolver,
        stylesheet: &str,
        root_attrs: Option<&RootAttributesFn>,
        input: &LayoutInput<'_>,
        hooks: &'a [(RenderStage, DrawHook)],
        with_axes: bool,
    ) -> Self {
        let plot = layout::compute(config, input);

        let mut root = Element::new("svg");
        let attrs = match root_attrs {
            Some(f) => f(config),
            None => default_root_attributes(config),
        };
        for (name, value) in attrs {
            root.set_attr(name, value);
        }

        let mut defs = Element::new("defs");
        defs.append(Element::new("style").attr("type", "text/css").raw(stylesheet));
        root.append(defs);

        root.append(classed(
            styles,
            Element::new("rect")
                .attr("x", "0")
                .attr("y", "0")
                .attr("width", px(config.width))
                .attr("height", px(config.height)),
            "svgBackground",
        ));

        let mut graph = Element::new("g").attr(
            "transform",
            format!("translate({} {})", px(plot.x), px(plot.y)),
        );
        if with_axes {
            graph.append(classed(
                styles,
                Element::new("rect")
                    .attr("x", "0")
                    .attr("y", "0")
                    .attr("width", px(plot.width))
                    .attr("height", px(plot.height)),
                "graphBackground",
            ));
            graph.append(
                classed(
                    styles,
                    Element::new("path").attr("d", format!("M 0 0 v{}", px(plot.height))),
                    "axis",
                )
                .attr("id", "yAxis"),
            );
            graph.append(
                classed(
                    styles,
                    Element::new("path")
                        .attr("d", format!("M 0 {} h{}", px(plot.height), px(plot.width))),
                    "axis",
                )
                .attr("id", "xAxis"),
            );
        }

        Frame {
            config,
            styles,
            plot,
            root,
            graph,
            overlay: Vec::new(),
            foreground: Element::new("g"),
            hooks,
        }
    }

    /// Width of one field along x.
    pub fn field_width(&self, count: usize, sizing: FieldSizing) -> f64 {
        let inset = if sizing.right_font {
            self.config.font_size * 2.0
        } else {
            0.0
        };
        let divisor = (count as f64 - if sizing.right_align { 1.0 } else { 0.0 }).max(1.0);
        (self.plot.width - inset) / divisor
    }

    /// Height of one field along y.
    pub fn field_height(&self, count: usize, sizing: FieldSizing) -> f64 {
        let inset = if sizing.top_font {
            self.config.font_size * 2.0
        } else {
            0.0
        };
        let divisor = (count as f64 - if sizing.top_align { 1.0 } else { 0.0 }).max(1.0);
        (self.plot.height - inset) / divisor
    }

    /// Draw evenly spaced x labels. `offset` shifts each label within
    /// its field (bar charts center on the bar).
    pub fn draw_x_labels(&mut self, labels: &[String], spacing: f64, offset: f64) {
        if !self.config.show_x_labels {
            return;
        }
        let positions: Vec<(f64, &str)> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (i as f64 * spacing + offset, l.as_str()))
            .collect();
        self.draw_x_labels_at(&positions);
    }

    /// Draw x labels at explicit pixel positions (temporal axes space
    /// calendar ticks unevenly).
    pub fn draw_x_labels_at(&mut self, positions: &[(f64, &str)]) {
        if !self.config.show_x_labels {
            return;
        }
        let start = if self.config.step_include_first_x_label {
            0
        } else {
            1
        };
        let step = self.config.step_x_labels.max(1);
        for (index, (x, label)) in positions.iter().enumerate().skip(start).step_by(step) {
            self.draw_x_label(index, *x, label);
        }
    }

    fn draw_x_label(&mut self, index: usize, x: f64, label: &str) {
        let mut y = self.plot.height + self.config.x_label_font_size + 3.0;

        if self.config.stagger_x_labels && index % 2 == 1 {
            let stagger = self.config.x_label_font_size + 5.0;
            y += stagger;
            self.graph.append(classed(
                self.styles,
                Element::new("path").attr(
                    "d",
                    format!("M{} {} v{}", px(x), px(self.plot.height), px(stagger)),
                ),
                "staggerGuideLine",
            ));
        }

        let mut text = classed(self.styles, Element::new("text"), "xAxisLabels")
            .attr("x", px(x))
            .attr("y", px(y))
            .text(label);
        if self.config.rotate_x_labels {
            text.set_attr(
                "transform",
                format!(
                    "rotate(90 {} {}) translate(0 -{})",
                    px(x),
                    px(y - self.config.x_label_font_size),
                    px(self.config.x_label_font_size / 4.0)
                ),
            );
            text.set_attr("style", "text-anchor: start");
        }
        self.graph.append(text);
    }

    /// Draw evenly spaced y labels, bottom to top. `offset` shifts
    /// labels within their field (row charts center on the row).
    pub fn draw_y_labels(&mut self, labels: &[String], spacing: f64, offset: f64) {
        if !self.config.show_y_labels {
            return;
        }
        let mut base = self.plot.height + offset;
        if !self.config.rotate_y_labels {
            base += self.config.font_size / 1.2;
        }
        let start = if self.config.step_include_first_y_label {
            0
        } else {
            1
        };
        let step = self.config.step_y_labels.max(1);
        for (index, label) in labels.iter().enumerate().skip(start).step_by(step) {
            self.draw_y_label(index, base - spacing * index as f64, label);
        }
    }

    fn draw_y_label(&mut self, index: usize, y: f64, label: &str) {
        let mut x = if self.config.rotate_y_labels { 0.0 } else { -3.0 };

        if self.config.stagger_y_labels && index % 2 == 1 {
            let stagger = self.config.y_label_font_size + 5.0;
            x -= stagger;
            self.graph.append(classed(
                self.styles,
                Element::new("path")
                    .attr("d", format!("M{} {} h{}", px(x), px(y), px(stagger))),
                "staggerGuideLine",
            ));
        }

        let mut text = classed(self.styles, Element::new("text"), "yAxisLabels")
            .attr("x", px(x))
            .attr("y", px(y))
            .text(label);
        if self.config.rotate_y_labels {
            text.set_attr(
                "transform",
                format!(
                    "translate(-{} 0) rotate(90 {} {})",
                    px(self.config.font_size),
                    px(x),
                    px(y)
                ),
            );
            text.set_attr("style", "text-anchor: middle");
        } else {
            text.set_attr("y", px(y - self.config.y_label_font_size / 2.0));
        }
        self.graph.append(text);
    }

    /// Vertical guidelines at field boundaries (the first is the axis
    /// itself and is skipped).
    pub fn draw_x_guidelines(&mut self, spacing: f64, count: usize) {
        if !self.config.show_x_guidelines {
            return;
        }
        let positions: Vec<f64> = (1..count).map(|i| spacing * i as f64).collect();
        self.draw_x_guidelines_at(&positions);
    }

    /// Vertical guidelines at explicit pixel positions.
    pub fn draw_x_guidelines_at(&mut self, positions: &[f64]) {
        if !self.config.show_x_guidelines {
            return;
        }
        for x in positions {
            self.graph.append(classed(
                self.styles,
                Element::new("path")
                    .attr("d", format!("M {} 0 v{}", px(*x), px(self.plot.height))),
                "guideLines",
            ));
        }
    }

    /// Horizontal guidelines at field boundaries above the axis.
    pub fn draw_y_guidelines(&mut self, spacing: f64, count: usize) {
        if !self.config.show_y_guidelines {
            return;
        }
        for i in 1..count {
            self.graph.append(classed(
                self.styles,
                Element::new("path").attr(
                    "d",
                    format!(
                        "M 0 {} h{}",
                        px(self.plot.height - spacing * i as f64),
                        px(self.plot.width)
                    ),
                ),
                "guideLines",
            ));
        }
    }

    /// Graph title, subtitle and axis titles, as configured.
    pub fn draw_titles(&mut self) {
        if self.config.show_graph_title {
            self.overlay.push(
                classed(self.styles, Element::new("text"), "mainTitle")
                    .attr("x", px(self.config.width / 2.0))
                    .attr("y", px(self.config.title_font_size))
                    .text(&self.config.graph_title),
            );
        }
        if self.config.show_graph_subtitle {
            let y = if self.config.show_graph_title {
                self.config.title_font_size + 10.0
            } else {
                self.config.subtitle_font_size
            };
            self.overlay.push(
                classed(self.styles, Element::new("text"), "subTitle")
                    .attr("x", px(self.config.width / 2.0))
                    .attr("y", px(y))
                    .text(&self.config.graph_subtitle),
            );
        }
        if self.config.show_x_title {
            let mut y = self.plot.bottom() + self.config.x_title_font_size;
            if self.config.show_x_labels {
                let mut size = self.config.x_label_font_size + 5.0;
                if self.config.stagger_x_labels {
                    size *= 2.0;
                }
                y += size;
            }
            self.overlay.push(
                classed(self.styles, Element::new("text"), "xAxisTitle")
                    .attr("x", px(self.config.width / 2.0))
                    .attr("y", px(y))
                    .text(&self.config.x_title),
            );
        }
        if self.config.show_y_title {
            let (x, rotate) = match self.config.y_title_direction {
                TitleDirection::BottomUp => (self.config.y_title_font_size + 3.0, -90),
                TitleDirection::TopDown => (self.config.y_title_font_size - 3.0, 90),
            };
            let y = self.config.height / 2.0;
            self.overlay.push(
                classed(self.styles, Element::new("text"), "yAxisTitle")
                    .attr("x", px(x))
                    .attr("y", px(y))
                    .attr("transform", format!("rotate({}, {}, {})", rotate, px(x), px(y)))
                    .text(&self.config.y_title),
            );
        }
    }

    /// The legend: one color box and label per entry.
    pub fn draw_legend(&mut self, titles: &[String]) {
        if !self.config.key || titles.is_empty() {
            return;
        }
        let mut group = Element::new("g");
        for (i, title) in titles.iter().enumerate() {
            let y_offset = KEY_BOX_SIZE * i as f64 + i as f64 * 5.0;
            group.append(classed(
                self.styles,
                Element::new("rect")
                    .attr("x", "0")
                    .attr("y", px(y_offset))
                    .attr("width", px(KEY_BOX_SIZE))
                    .attr("height", px(KEY_BOX_SIZE)),
                &self.styles.key_key(i),
            ));
            group.append(
                classed(self.styles, Element::new("text"), "keyText")
                    .attr("x", px(KEY_BOX_SIZE + 5.0))
                    .attr("y", px(y_offset + KEY_BOX_SIZE))
                    .text(title),
            );
        }

        let (x_offset, y_offset) = match self.config.key_position {
            KeyPosition::Right => (self.plot.right() + 10.0, self.plot.y + 20.0),
            KeyPosition::Bottom => self.bottom_key_offsets(),
        };
        group.set_attr(
            "transform",
            format!("translate({} {})", px(x_offset), px(y_offset)),
        );
        self.overlay.push(group);
    }

    fn bottom_key_offsets(&self) -> (f64, f64) {
        let x_offset = self.plot.x + 20.0;
        let mut y_offset = self.plot.bottom() + 5.0;
        if self.config.show_x_labels {
            let mut label_height = self.config.x_label_font_size;
            if self.config.rotate_x_labels {
                // rotated labels hang down past the usual baseline
                label_height += self.config.x_label_font_size;
            }
            y_offset += label_height;
            if self.config.stagger_x_labels {
                y_offset += label_height + 5.0;
            }
        }
        if self.config.show_x_title {
            y_offset += self.config.x_title_font_size + 5.0;
        }
        (x_offset, y_offset)
    }

    /// Label a data point, honoring `show_data_values`. The text is
    /// laid down twice: a wide white stroke behind, then the label
    /// itself.
    pub fn make_datapoint_text(&mut self, x: f64, y: f64, text: &str) {
        self.make_datapoint_text_styled(x, y, text, None);
    }

    pub fn make_datapoint_text_styled(&mut self, x: f64, y: f64, text: &str, style: Option<&str>) {
        if !self.config.show_data_values {
            return;
        }
        let halo_style = format!("{} stroke: #fff; stroke-width: 2;", style.unwrap_or(""));
        self.foreground.append(
            classed(self.styles, Element::new("text"), "dataPointLabel")
                .attr("x", px(x))
                .attr("y", px(y))
                .attr("style", halo_style.trim_start())
                .text(text),
        );
        let mut label = classed(self.styles, Element::new("text"), "dataPointLabel")
            .attr("x", px(x))
            .attr("y", px(y))
            .text(text);
        if let Some(style) = style {
            label.set_attr("style", style);
        }
        self.foreground.append(label);
    }

    /// Hover popup: a hidden label plus a transparent hit circle that
    /// toggles it. The only place script text enters the document.
    pub fn add_popup(&mut self, x: f64, y: f64, label: &str) {
        let text_width = label.len() as f64 * self.config.font_size * 0.6 + 10.0;
        let overflows = x + text_width > self.config.width;
        let tx = if overflows { x - 5.0 } else { x + 5.0 };
        let anchor = if overflows { "end" } else { "start" };
        let id = format!("label-{}", w3c_name(label));

        self.foreground.append(
            Element::new("text")
                .attr("x", px(tx))
                .attr("y", px(y - self.config.font_size))
                .attr("visibility", "hidden")
                .attr("style", format!("fill: #000; text-anchor: {};", anchor))
                .attr("id", id.clone())
                .text(label),
        );

        let visibility = |value: &str| {
            format!(
                "document.getElementById('{}').setAttribute('visibility', '{}')",
                id, value
            )
        };
        self.foreground.append(
            Element::new("circle")
                .attr("cx", px(x))
                .attr("cy", px(y))
                .attr("r", "10")
                .attr("style", "opacity: 0;")
                .attr("onmouseover", visibility("visible"))
                .attr("onmouseout", visibility("hidden")),
        );
    }

    /// Run every hook registered for `stage` against the plot-area
    /// group.
    pub fn run_hooks(&mut self, stage: RenderStage) {
        for (hook_stage, hook) in self.hooks {
            if *hook_stage == stage {
                hook(&mut self.graph);
            }
        }
    }

    /// Assemble the document: graph, then titles and legend, then the
    /// foreground overlay.
    pub fn finish(mut self) -> String {
        let graph = std::mem::replace(&mut self.graph, Element::new("g"));
        self.root.append(graph);
        for el in self.overlay.drain(..) {
            self.root.append(el);
        }
        let foreground = std::mem::replace(&mut self.foreground, Element::new("g"));
        self.root.append(foreground);
        self.root.to_svg()
    }
}

/// Attach a resolved style class (and optional inline declarations).
pub(crate) fn classed(styles: &dyn StyleResolver, el: Element, key: &str) -> Element {
    let resolved = styles.resolve(key);
    let el = el.attr("class", resolved.class);
    match resolved.inline {
        Some(inline) => el.attr("style", inline),
        None => el,
    }
}

/// Value of the last tick. Value scales span to it so bar and line
/// geometry stays aligned with the tick grid; falls back to the range
/// maximum when only a single tick fits.
pub(crate) fn tick_span_end(range: &crate::range::AxisRange, tick_count: usize) -> f64 {
    if tick_count > 1 {
        range.min + (tick_count - 1) as f64 * range.step
    } else {
        range.max
    }
}

/// W3C-safe element id fragment.
fn w3c_name(name: &str) -> String {
    name.replace(':', "-").replace(' ', "_")
}

/// Render a geometry primitive to markup.
pub(crate) fn primitive_element(
    styles: &dyn StyleResolver,
    primitive: &crate::geometry::GeometryPrimitive,
) -> Element {
    use crate::geometry::{sector_point, GeometryPrimitive};
    match primitive {
        GeometryPrimitive::Rectangle {
            x,
            y,
            width,
            height,
            class,
        }
        | GeometryPrimitive::Segment {
            x,
            y,
            width,
            height,
            class,
        } => classed(
            styles,
            Element::new("rect")
                .attr("x", px(*x))
                .attr("y", px(*y))
                .attr("width", px(*width))
                .attr("height", px(*height)),
            class,
        ),
        GeometryPrimitive::Polyline {
            points,
            closed,
            class,
        } => {
            let mut d = String::new();
            for (i, (x, y)) in points.iter().enumerate() {
                let op = if i == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{}{} {} ", op, px(*x), px(*y)));
            }
            let mut d = d.trim_end().to_string();
            if *closed {
                d.push_str(" Z");
            }
            classed(styles, Element::new("path").attr("d", d), class)
        }
        GeometryPrimitive::Sector {
            cx,
            cy,
            radius,
            start_deg,
            sweep_deg,
            class,
        } => {
            if *sweep_deg >= 360.0 - 1e-9 {
                // a single full-circle wedge has no arc endpoints
                return classed(
                    styles,
                    Element::new("circle")
                        .attr("cx", px(*cx))
                        .attr("cy", px(*cy))
                        .attr("r", px(*radius)),
                    class,
                );
            }
            let (x1, y1) = sector_point(*cx, *cy, *radius, *start_deg);
            let (x2, y2) = sector_point(*cx, *cy, *radius, *start_deg + *sweep_deg);
            let large_arc = if *sweep_deg > 180.0 { 1 } else { 0 };
            let d = format!(
                "M{} {} L{} {} A{} {} 0 {} 1 {} {} Z",
                px(*cx),
                px(*cy),
                px(x1),
                px(y1),
                px(*radius),
                px(*radius),
                large_arc,
                px(x2),
                px(y2)
            );
            classed(styles, Element::new("path").attr("d", d), class)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryPrimitive;
    use crate::style::DefaultStyles;

    #[test]
    fn px_trims_trailing_zeros() {
        assert_eq!(px(100.0), "100");
        assert_eq!(px(33.333333), "33.33");
        assert_eq!(px(0.5), "0.5");
        assert_eq!(px(-0.0001), "0");
    }

    #[test]
    fn default_root_attributes_carry_dimensions() {
        let config = GraphConfig::default();
        let attrs = default_root_attributes(&config);
        assert!(attrs.contains(&("width".into(), "500".into())));
        assert!(attrs.contains(&("viewBox".into(), "0 0 500 300".into())));
    }

    #[test]
    fn sector_element_is_a_closed_path() {
        let styles = DefaultStyles;
        let sector = GeometryPrimitive::Sector {
            cx: 100.0,
            cy: 100.0,
            radius: 50.0,
            start_deg: 0.0,
            sweep_deg: 90.0,
            class: "fill1".into(),
        };
        let svg = primitive_element(&styles, &sector).to_svg();
        assert!(svg.starts_with("<path"));
        assert!(svg.contains("Z"));
        assert!(svg.contains("class=\"fill1\""));
    }

    #[test]
    fn full_circle_sector_renders_as_circle() {
        let styles = DefaultStyles;
        let sector = GeometryPrimitive::Sector {
            cx: 10.0,
            cy: 10.0,
            radius: 5.0,
            start_deg: 0.0,
            sweep_deg: 360.0,
            class: "fill1".into(),
        };
        let svg = primitive_element(&styles, &sector).to_svg();
        assert!(svg.starts_with("<circle"));
    }

    #[test]
    fn polyline_closes_with_z() {
        let styles = DefaultStyles;
        let area = GeometryPrimitive::Polyline {
            points: vec![(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)],
            closed: true,
            class: "fill2".into(),
        };
        let svg = primitive_element(&styles, &area).to_svg();
        assert!(svg.contains("M0 0 L10 5 L20 0 Z"));
    }
}
