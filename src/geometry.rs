//! Series geometry.
//!
//! Converts datasets into drawable primitives in plot-local pixel
//! coordinates (origin at the top-left of the plot area). The chart
//! renderers translate the enclosing group into place, so nothing here
//! knows about margins or titles.

use crate::data::{cumulative_rows, Dataset};
use crate::error::{ChartError, ChartResult};
use crate::scale::ScaleTransform;
use crate::ticks::format_value;

/// A drawable shape plus the style class it renders with.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPrimitive {
    /// A bar.
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        class: String,
    },
    /// A line series; `closed` turns it into an area polygon.
    Polyline {
        points: Vec<(f64, f64)>,
        closed: bool,
        class: String,
    },
    /// A pie wedge. Angles are degrees clockwise from the chart's zero
    /// angle at 12 o'clock.
    Sector {
        cx: f64,
        cy: f64,
        radius: f64,
        start_deg: f64,
        sweep_deg: f64,
        class: String,
    },
    /// A schedule bar.
    Segment {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        class: String,
    },
}

/// A value label anchored next to its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Style-class selection per (dataset index, field index).
pub type FillClassFn<'a> = &'a (dyn Fn(usize, usize) -> String + 'a);

/// How adjacent dataset series stack in bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStack {
    /// Bars overlap at the same offset (transparent fills expected).
    #[default]
    Overlap,
    /// Bars accumulate on a running baseline.
    Top,
    /// Bars sit side by side within the field.
    Side,
}

/// Gap between bars: 10px, halved field size for narrow fields,
/// zeroed when gaps are disabled.
pub fn bar_gap(field_size: f64, enabled: bool) -> f64 {
    if !enabled {
        return 0.0;
    }
    if field_size < 10.0 {
        field_size / 2.0
    } else {
        10.0
    }
}

fn label_text(set: &Dataset, index: usize, value: f64) -> String {
    set.points
        .get(index)
        .and_then(|p| p.text.clone())
        .unwrap_or_else(|| format_value(value))
}

/// Build vertical bars for every (field, dataset) cell.
///
/// `value_scale` maps the value domain onto `(0, usable_height)`,
/// un-inverted; bars grow upward from `plot_height`. Offsets along the
/// category axis are `field * field_width`, plus `dataset * bar_width`
/// when side-stacked.
pub fn vertical_bars(
    datasets: &[Dataset],
    field_count: usize,
    field_width: f64,
    plot_height: f64,
    value_scale: &ScaleTransform,
    stack: BarStack,
    gap_enabled: bool,
    fill_class: FillClassFn<'_>,
) -> ChartResult<(Vec<GeometryPrimitive>, Vec<PointLabel>)> {
    let gap = bar_gap(field_width, gap_enabled);
    let bar_width = match stack {
        BarStack::Side => (field_width - gap) / datasets.len() as f64,
        _ => field_width - gap,
    };
    let per = value_scale.pixels_per_unit();
    let (min, _) = value_scale.domain();
    let bottom = plot_height;
    let cumulative = cumulative_rows(datasets);

    let mut shapes = Vec::new();
    let mut labels = Vec::new();
    for field in 0..field_count {
        for (d, set) in datasets.iter().enumerate() {
            let value = bar_value(set, field, d)?;
            let mut left = field_width * field as f64;
            if stack == BarStack::Side {
                left += bar_width * d as f64;
            }
            let (top, height) = match stack {
                BarStack::Top => {
                    let cum = cumulative[d][field];
                    (bottom - (cum - min) * per, value * per)
                }
                _ => {
                    let length = (value.abs() - min.max(0.0)) * per;
                    (bottom - (value.max(0.0) - min) * per, length)
                }
            };
            shapes.push(GeometryPrimitive::Rectangle {
                x: left,
                y: top,
                width: bar_width,
                height,
                class: fill_class(d, field),
            });
            labels.push(PointLabel {
                x: left + bar_width / 2.0,
                y: top - 6.0,
                text: label_text(set, field, value),
            });
        }
    }
    Ok((shapes, labels))
}

/// Build horizontal bars; the mirror of [`vertical_bars`] with rows
/// along y and lengths along x. `value_scale` maps the value domain
/// onto `(0, usable_width)`.
pub fn horizontal_bars(
    datasets: &[Dataset],
    field_count: usize,
    field_height: f64,
    plot_height: f64,
    value_scale: &ScaleTransform,
    stack: BarStack,
    gap_enabled: bool,
    font_size: f64,
    fill_class: FillClassFn<'_>,
) -> ChartResult<(Vec<GeometryPrimitive>, Vec<PointLabel>)> {
    let gap = bar_gap(field_height, gap_enabled);
    let bar_height = match stack {
        BarStack::Side => (field_height - gap) / datasets.len() as f64,
        _ => field_height - gap,
    };
    let per = value_scale.pixels_per_unit();
    let (min, _) = value_scale.domain();
    let y_mod = bar_height / 2.0 + font_size / 2.0;
    let cumulative = cumulative_rows(datasets);

    let mut shapes = Vec::new();
    let mut labels = Vec::new();
    for field in 0..field_count {
        for (d, set) in datasets.iter().enumerate() {
            let value = bar_value(set, field, d)?;
            let mut top = plot_height - field_height * (field + 1) as f64;
            if stack == BarStack::Side {
                top += bar_height * d as f64;
            }
            let (left, length) = match stack {
                BarStack::Top => {
                    let cum = cumulative[d][field];
                    ((cum - value - min) * per, value * per)
                }
                _ => {
                    let length = (value.abs() - min.max(0.0)) * per;
                    ((min.abs() + value.min(0.0)) * per, length)
                }
            };
            shapes.push(GeometryPrimitive::Rectangle {
                x: left,
                y: top,
                width: length,
                height: bar_height,
                class: fill_class(d, field),
            });
            labels.push(PointLabel {
                x: left + length + 5.0,
                y: top + y_mod,
                text: label_text(set, field, value),
            });
        }
    }
    Ok((shapes, labels))
}

fn bar_value(set: &Dataset, field: usize, dataset_index: usize) -> ChartResult<f64> {
    set.points.get(field).map(|p| p.y).ok_or_else(|| {
        ChartError::DataShape(format!(
            "dataset {} ('{}') has no value for field index {}",
            dataset_index, set.title, field
        ))
    })
}

/// Geometry for one line series: the polyline, an optional area
/// polygon beneath it, and the vertices for decorations.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub dataset_index: usize,
    pub polyline: GeometryPrimitive,
    pub area: Option<GeometryPrimitive>,
    /// Vertex pixel positions with the value displayed at each.
    pub vertices: Vec<(f64, f64, String)>,
}

/// Build line geometry for categorical (unpaired) datasets.
///
/// Vertices sit at `field * field_width`; stacked mode adds each
/// series onto the running sum of the ones before it. Series are
/// returned last-dataset-first so earlier datasets paint on top, as
/// area fills otherwise hide one another.
pub fn line_series(
    datasets: &[Dataset],
    field_count: usize,
    field_width: f64,
    plot_height: f64,
    value_scale: &ScaleTransform,
    stacked: bool,
    area_fill: bool,
    fill_class: FillClassFn<'_>,
    line_class: FillClassFn<'_>,
) -> ChartResult<Vec<LineSeries>> {
    let per = value_scale.pixels_per_unit();
    let (min, _) = value_scale.domain();
    let y_of = |value: f64| plot_height - (value - min) * per;
    let cumulative = cumulative_rows(datasets);

    let mut series = Vec::new();
    for (d, set) in datasets.iter().enumerate().rev() {
        let mut points = Vec::with_capacity(field_count);
        let mut vertices = Vec::with_capacity(field_count);
        for field in 0..field_count {
            let value = bar_value(set, field, d)?;
            let plotted = if stacked { cumulative[d][field] } else { value };
            let x = field_width * field as f64;
            let y = y_of(plotted);
            points.push((x, y));
            vertices.push((x, y, label_text(set, field, plotted)));
        }

        let area = if area_fill {
            let mut outline = points.clone();
            if stacked && d > 0 {
                // Trace back along the series below.
                for field in (0..field_count).rev() {
                    outline.push((field_width * field as f64, y_of(cumulative[d - 1][field])));
                }
            } else {
                // Close down to the axis baseline.
                outline.push((field_width * (field_count - 1) as f64, plot_height));
                outline.push((0.0, plot_height));
            }
            Some(GeometryPrimitive::Polyline {
                points: outline,
                closed: true,
                class: fill_class(d, 0),
            })
        } else {
            None
        };

        series.push(LineSeries {
            dataset_index: d,
            polyline: GeometryPrimitive::Polyline {
                points,
                closed: false,
                class: line_class(d, 0),
            },
            area,
            vertices,
        });
    }
    Ok(series)
}

/// Build pie sectors: cumulative fractions of the total, strict input
/// order, clockwise from `zero_angle_deg` (0 is 12 o'clock).
pub fn pie_sectors(
    values: &[f64],
    cx: f64,
    cy: f64,
    radius: f64,
    zero_angle_deg: f64,
    fill_class: FillClassFn<'_>,
) -> ChartResult<Vec<GeometryPrimitive>> {
    if values.iter().any(|v| *v < 0.0) {
        return Err(ChartError::DataShape(
            "pie chart values must be non-negative".into(),
        ));
    }
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return Err(ChartError::Config(
            "pie chart dataset total is zero, sector fractions are undefined".into(),
        ));
    }

    let mut sectors = Vec::with_capacity(values.len());
    let mut start = zero_angle_deg;
    for (i, value) in values.iter().enumerate() {
        let sweep = value / total * 360.0;
        sectors.push(GeometryPrimitive::Sector {
            cx,
            cy,
            radius,
            start_deg: start,
            sweep_deg: sweep,
            class: fill_class(i, 0),
        });
        start += sweep;
    }
    Ok(sectors)
}

/// Point on a circle at `deg` degrees clockwise from 12 o'clock.
pub fn sector_point(cx: f64, cy: f64, radius: f64, deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (cx + radius * rad.sin(), cy - radius * rad.cos())
}

/// Build one horizontal segment per schedule task.
///
/// Tasks are `(start, end, row)` with start/end already in the x
/// domain (epoch seconds) and a caller-assigned row; overlapping rows
/// are rendered as given, never re-packed.
pub fn schedule_segments(
    tasks: &[(f64, f64, usize)],
    x_scale: &ScaleTransform,
    row_height: f64,
    plot_height: f64,
    gap_enabled: bool,
    fill_class: FillClassFn<'_>,
) -> ChartResult<Vec<GeometryPrimitive>> {
    let gap = bar_gap(row_height, gap_enabled);
    let bar_height = row_height - gap;
    let mut shapes = Vec::with_capacity(tasks.len());
    for (i, (start, end, row)) in tasks.iter().enumerate() {
        if end < start {
            return Err(ChartError::DataShape(format!(
                "schedule task {} ends before it starts",
                i
            )));
        }
        let x = x_scale.map(*start);
        let width = x_scale.map(*end) - x;
        let y = plot_height - row_height * (*row + 1) as f64;
        shapes.push(GeometryPrimitive::Segment {
            x,
            y,
            width,
            height: bar_height,
            class: fill_class(i, 0),
        });
    }
    Ok(shapes)
}
