//! Time-series plots: XY plots with calendar dates along x.

use chrono::{NaiveDate, NaiveDateTime};

use crate::chart::{Chart, Plot};
use crate::data::Dataset;
use crate::error::{ChartError, ChartResult};
use crate::ticks::{epoch_to_datetime, format_value, TickFormat, TimeInterval};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse a date string in any of the supported formats.
pub fn parse_date(text: &str) -> ChartResult<NaiveDateTime> {
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    for format in DAY_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return Ok(parsed.and_time(chrono::NaiveTime::MIN));
        }
    }
    Err(ChartError::DataShape(format!(
        "'{}' is not a recognized date",
        text
    )))
}

/// An XY plot whose x values are dates.
///
/// Internally everything runs in epoch-offset seconds; dates only
/// reappear in tick labels and popups. All [`Plot`] options are
/// available through [`TimeSeries::plot`].
pub struct TimeSeries {
    pub plot: Plot,
    /// strftime-style format for x-axis labels.
    pub x_label_format: String,
    /// strftime-style format for hover popups.
    pub popup_format: String,
    /// Calendar tick spacing, e.g. `"2 weeks"`. Derived numerically
    /// when unset.
    pub timescale_divisions: Option<String>,
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeries {
    pub fn new() -> Self {
        TimeSeries {
            plot: Plot::new(),
            x_label_format: "%Y-%m-%d %H:%M:%S".into(),
            popup_format: "%Y-%m-%d %H:%M:%S".into(),
            timescale_divisions: None,
        }
    }

    /// Add a series of (date, value) points.
    pub fn add_data(
        &mut self,
        title: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDateTime, f64)>,
    ) -> ChartResult<()> {
        let pairs = points
            .into_iter()
            .map(|(date, y)| (date.and_utc().timestamp() as f64, y));
        self.plot.add_data(Dataset::from_pairs(title, pairs))
    }

    /// Add a series of (date string, value) points; dates may be in
    /// any supported format.
    pub fn add_data_strs(
        &mut self,
        title: impl Into<String>,
        points: &[(&str, f64)],
    ) -> ChartResult<()> {
        let mut parsed = Vec::with_capacity(points.len());
        for (text, y) in points {
            parsed.push((parse_date(text)?, *y));
        }
        self.add_data(title, parsed)
    }

    /// Fix the lower x bound to a date.
    pub fn set_min_x_date(&mut self, date: NaiveDateTime) {
        self.plot.min_x_value = Some(date.and_utc().timestamp() as f64);
    }

    /// Fix the upper x bound to a date.
    pub fn set_max_x_date(&mut self, date: NaiveDateTime) {
        self.plot.max_x_value = Some(date.and_utc().timestamp() as f64);
    }
}

impl Chart for TimeSeries {
    fn render(&self) -> ChartResult<String> {
        let x_format = TickFormat::DateTime {
            format: self.x_label_format.clone(),
        };
        let calendar = self
            .timescale_divisions
            .as_deref()
            .map(TimeInterval::parse)
            .transpose()?;
        let popup_format = self.popup_format.clone();
        let popup = move |x: f64, _y: f64| match epoch_to_datetime(x) {
            Ok(date) => date.format(&popup_format).to_string(),
            Err(_) => format_value(x),
        };
        self.plot.render_xy(&x_format, calendar.as_ref(), &popup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> NaiveDateTime {
        parse_date(text).unwrap()
    }

    #[test]
    fn parses_the_supported_formats() {
        assert_eq!(date("2004-06-17"), date("6/17/04"));
        assert_eq!(date("2004-06-17"), date("06/17/2004"));
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn labels_render_as_dates() {
        let mut ts = TimeSeries::new();
        ts.plot.config.show_data_values = false;
        ts.x_label_format = "%Y-%m".into();
        ts.add_data_strs(
            "events",
            &[("2004-01-15", 3.0), ("2004-03-20", 9.0), ("2004-06-01", 5.0)],
        )
        .unwrap();
        let svg = ts.render().unwrap();
        assert!(svg.contains(">2004-0"));
    }

    #[test]
    fn calendar_divisions_space_ticks_by_month() {
        let mut ts = TimeSeries::new();
        ts.plot.config.show_data_values = false;
        ts.x_label_format = "%b".into();
        ts.timescale_divisions = Some("2 months".into());
        ts.add_data_strs("events", &[("2004-01-01", 1.0), ("2004-07-01", 4.0)])
            .unwrap();
        let svg = ts.render().unwrap();
        assert!(svg.contains(">Jan<"));
        assert!(svg.contains(">Mar<"));
        assert!(!svg.contains(">Feb<"));
    }

    #[test]
    fn invalid_divisions_fail_the_render() {
        let mut ts = TimeSeries::new();
        ts.timescale_divisions = Some("every so often".into());
        ts.add_data_strs("events", &[("2004-01-01", 1.0), ("2004-07-01", 4.0)])
            .unwrap();
        assert!(matches!(ts.render(), Err(ChartError::Config(_))));
    }

    #[test]
    fn popup_uses_the_date_format() {
        let mut ts = TimeSeries::new();
        ts.popup_format = "%Y-%m-%d".into();
        ts.add_data_strs("events", &[("2004-01-01", 1.0), ("2004-07-01", 4.0)])
            .unwrap();
        let svg = ts.render().unwrap();
        assert!(svg.contains(">2004-01-01</text>"));
    }
}
