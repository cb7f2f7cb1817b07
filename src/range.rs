//! Axis range resolution.
//!
//! Turns raw dataset values into a `(min, max, step)` triple, honoring
//! fixed overrides, stacked accumulation and the integer-scale
//! constraint.

use log::warn;

use crate::data::{cumulative_rows, Axis, Dataset};
use crate::error::{ChartError, ChartResult};

/// A resolved axis range. `min < max`, `step > 0`; `(max - min)` need
/// not be an exact multiple of `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        AxisRange { min, max, step }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Options controlling range resolution for one axis.
#[derive(Debug, Clone)]
pub struct RangeOptions {
    /// Fixed lower bound, used verbatim when set.
    pub fixed_min: Option<f64>,
    /// Fixed upper bound, used verbatim when set.
    pub fixed_max: Option<f64>,
    /// Explicit step (scale divisions); derived from the target tick
    /// count when unset.
    pub step: Option<f64>,
    /// Round the step so every tick lands on an integer.
    pub integers: bool,
    /// Tick count the derived step aims for.
    pub target_ticks: usize,
    /// Resolve against cumulative sums across datasets instead of
    /// single values (stacked bar/line).
    pub stacked: bool,
    /// Pull the minimum down to zero when the data sits above it
    /// (bar charts measure from the baseline).
    pub include_zero: bool,
}

impl Default for RangeOptions {
    fn default() -> Self {
        RangeOptions {
            fixed_min: None,
            fixed_max: None,
            step: None,
            integers: false,
            target_ticks: 10,
            stacked: false,
            include_zero: false,
        }
    }
}

/// Resolve the range for `axis` across all datasets.
pub fn resolve(datasets: &[Dataset], axis: Axis, opts: &RangeOptions) -> ChartResult<AxisRange> {
    if datasets.is_empty() {
        return Err(ChartError::EmptyData);
    }

    let values: Vec<f64> = if opts.stacked && axis == Axis::Y {
        cumulative_rows(datasets).into_iter().flatten().collect()
    } else {
        datasets.iter().flat_map(|d| d.axis_values(axis)).collect()
    };
    if values.is_empty() {
        return Err(ChartError::EmptyData);
    }

    let data_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut min = opts.fixed_min.unwrap_or(if opts.include_zero {
        data_min.min(0.0)
    } else {
        data_min
    });
    let mut max = opts.fixed_max.unwrap_or(data_max);

    if max < min {
        return Err(ChartError::Config(format!(
            "axis range is inverted: min {} exceeds max {}",
            min, max
        )));
    }

    if max == min {
        if opts.integers {
            return Err(ChartError::Config(format!(
                "integer scale requested but all values on the axis equal {}",
                min
            )));
        }
        // Same padding rule as a zero-width linear scale.
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        min -= pad;
        max += pad;
        warn!(
            "degenerate axis range at {}, expanded to [{}, {}]",
            opts.fixed_min.unwrap_or(data_min),
            min,
            max
        );
    }

    // Headroom above the maximum keeps the top of the data clear of
    // the top tick.
    let range = max - min;
    let scale_range = range + range / 20.0;

    let mut step = opts
        .step
        .unwrap_or(scale_range / opts.target_ticks.max(1) as f64);
    if opts.integers {
        step = step.round().max(1.0);
        min = min.floor();
        max = max.ceil();
    }
    if !(step > 0.0) {
        return Err(ChartError::Config(format!(
            "axis step must be positive, got {}",
            step
        )));
    }

    let resolved = AxisRange::new(min, max, step);
    if opts.integers && crate::ticks::count(&resolved) < 2 {
        return Err(ChartError::Config(
            "integer scale leaves fewer than two tick values on the axis".into(),
        ));
    }
    Ok(resolved)
}
