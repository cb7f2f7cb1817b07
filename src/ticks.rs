//! Tick generation and label formatting.

use chrono::{DateTime, Duration, Months, NaiveDateTime};

use crate::error::{ChartError, ChartResult};
use crate::range::AxisRange;
use crate::scale::ScaleTransform;

/// One labeled axis mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel coordinate along the axis.
    pub position: f64,
    pub label: String,
}

/// Label formatting policy, injected by the chart kind.
#[derive(Debug, Clone)]
pub enum TickFormat {
    /// Plain numbers; `integers` renders them without a fraction.
    Number { integers: bool },
    /// Numbers with a trailing percent sign.
    Percent,
    /// Epoch-offset seconds rendered as a calendar timestamp
    /// (strftime-style format string).
    DateTime { format: String },
}

impl TickFormat {
    pub fn number(integers: bool) -> Self {
        TickFormat::Number { integers }
    }

    /// Format a single tick value.
    pub fn format(&self, value: f64) -> String {
        match self {
            TickFormat::Number { integers: true } => format!("{}", value.round() as i64),
            TickFormat::Number { integers: false } => format_value(value),
            TickFormat::Percent => format!("{}%", format_value(value)),
            TickFormat::DateTime { format } => match DateTime::from_timestamp(value as i64, 0) {
                Some(ts) => ts.naive_utc().format(format).to_string(),
                None => format_value(value),
            },
        }
    }
}

/// Render a number with accumulated floating-point noise removed.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 1e9).round() / 1e9;
    format!("{}", rounded)
}

// Tolerance for the tick-count floor; keeps 0.1-sized steps from
// dropping the final tick to representation error.
const COUNT_EPSILON: f64 = 1e-9;

/// Number of ticks in a range: `floor((max - min) / step) + 1`.
///
/// The final tick may fall short of `max` and is never snapped to the
/// boundary; tick counts are part of the output contract.
pub fn count(range: &AxisRange) -> usize {
    (range.span() / range.step + COUNT_EPSILON).floor() as usize + 1
}

/// Label strings for a range, without pixel positions. The layout
/// engine needs these before any scale exists.
pub fn labels(range: &AxisRange, format: &TickFormat) -> Vec<String> {
    (0..count(range))
        .map(|i| format.format(range.min + i as f64 * range.step))
        .collect()
}

/// Generate ticks for a numeric axis, positioned through `scale`.
pub fn generate(range: &AxisRange, scale: &ScaleTransform, format: &TickFormat) -> Vec<Tick> {
    (0..count(range))
        .map(|i| {
            let value = range.min + i as f64 * range.step;
            Tick {
                value,
                position: scale.map(value),
                label: format.format(value),
            }
        })
        .collect()
}

/// Calendar units for temporal tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// Tick spacing on a temporal axis, e.g. "2 weeks".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub amount: u32,
    pub unit: CalendarUnit,
}

impl TimeInterval {
    pub fn new(amount: u32, unit: CalendarUnit) -> Self {
        TimeInterval { amount, unit }
    }

    /// Parse interval text of the form `"<n> <unit>"`, accepting the
    /// common unit spellings ("2 weeks", "1 month", "3600 seconds",
    /// "4 hrs").
    pub fn parse(text: &str) -> ChartResult<Self> {
        let text = text.trim();
        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        let amount: u32 = digits
            .parse()
            .map_err(|_| ChartError::Config(format!("invalid time interval '{}'", text)))?;
        if amount == 0 {
            return Err(ChartError::Config(format!(
                "time interval amount must be positive in '{}'",
                text
            )));
        }
        let unit_text = text[digits.len()..].trim().to_ascii_lowercase();
        let unit = match unit_text.as_str() {
            "" | "days" | "day" => CalendarUnit::Days,
            "weeks" | "week" | "wks" | "wk" => CalendarUnit::Weeks,
            "months" | "month" | "mo" => CalendarUnit::Months,
            "years" | "year" | "yrs" | "yr" => CalendarUnit::Years,
            "hours" | "hour" | "hrs" | "hr" | "h" => CalendarUnit::Hours,
            "minutes" | "minute" | "mins" | "min" | "m" => CalendarUnit::Minutes,
            "seconds" | "second" | "secs" | "sec" | "s" => CalendarUnit::Seconds,
            other => {
                return Err(ChartError::Config(format!(
                    "'{}' does not match any supported time unit",
                    other
                )))
            }
        };
        Ok(TimeInterval { amount, unit })
    }

    /// Step a timestamp forward by this interval using calendar
    /// arithmetic (months and years keep the day-of-month where
    /// possible).
    fn advance(&self, from: NaiveDateTime) -> ChartResult<NaiveDateTime> {
        let stepped = match self.unit {
            CalendarUnit::Seconds => from.checked_add_signed(Duration::seconds(self.amount as i64)),
            CalendarUnit::Minutes => from.checked_add_signed(Duration::minutes(self.amount as i64)),
            CalendarUnit::Hours => from.checked_add_signed(Duration::hours(self.amount as i64)),
            CalendarUnit::Days => from.checked_add_signed(Duration::days(self.amount as i64)),
            CalendarUnit::Weeks => {
                from.checked_add_signed(Duration::weeks(self.amount as i64))
            }
            CalendarUnit::Months => from.checked_add_months(Months::new(self.amount)),
            CalendarUnit::Years => from.checked_add_months(Months::new(self.amount * 12)),
        };
        stepped.ok_or_else(|| {
            ChartError::Config(format!(
                "time interval {} {:?} overflows the axis range",
                self.amount, self.unit
            ))
        })
    }
}

/// Generate ticks for a temporal axis by walking the calendar from the
/// range start until the maximum is passed. Spacing is a calendar
/// unit, so months and years produce unevenly spaced pixels.
pub fn generate_calendar(
    range: &AxisRange,
    interval: &TimeInterval,
    scale: &ScaleTransform,
    format: &TickFormat,
) -> ChartResult<Vec<Tick>> {
    let start = epoch_to_datetime(range.min)?;
    let stop = epoch_to_datetime(range.max)?;

    let mut ticks = Vec::new();
    let mut current = start;
    while current <= stop {
        let value = current.and_utc().timestamp() as f64;
        ticks.push(Tick {
            value,
            position: scale.map(value),
            label: format.format(value),
        });
        current = interval.advance(current)?;
    }
    Ok(ticks)
}

pub(crate) fn epoch_to_datetime(epoch: f64) -> ChartResult<NaiveDateTime> {
    DateTime::from_timestamp(epoch as i64, 0)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| ChartError::Config(format!("timestamp {} is out of range", epoch)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scale_for(range: &AxisRange) -> ScaleTransform {
        ScaleTransform::new(range, (0.0, 100.0), false)
    }

    #[test]
    fn count_is_floor_plus_one() {
        assert_eq!(count(&AxisRange::new(0.0, 3.0, 1.0)), 4);
        assert_eq!(count(&AxisRange::new(0.0, 10.0, 3.0)), 4);
        assert_eq!(count(&AxisRange::new(0.0, 1.0, 0.1)), 11);
    }

    #[test]
    fn final_tick_may_fall_short_of_max() {
        let range = AxisRange::new(0.0, 10.0, 3.0);
        let ticks = generate(&range, &scale_for(&range), &TickFormat::number(false));
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks.last().unwrap().value, 9.0);
    }

    #[test]
    fn ticks_are_strictly_increasing_in_pixels() {
        let range = AxisRange::new(-2.0, 7.0, 1.5);
        let ticks = generate(&range, &scale_for(&range), &TickFormat::number(false));
        for pair in ticks.windows(2) {
            assert!(pair[1].position > pair[0].position);
        }
    }

    #[test]
    fn count_is_axis_independent() {
        let range = AxisRange::new(0.0, 5.0, 1.0);
        let x = generate(&range, &scale_for(&range), &TickFormat::number(false));
        let y_scale = ScaleTransform::new(&range, (300.0, 0.0), true);
        let y = generate(&range, &y_scale, &TickFormat::number(false));
        assert_eq!(x.len(), y.len());
    }

    #[test]
    fn integer_labels_have_no_fraction() {
        let fmt = TickFormat::number(true);
        assert_eq!(fmt.format(2.0), "2");
        let fmt = TickFormat::number(false);
        assert_eq!(fmt.format(2.5), "2.5");
        assert_eq!(fmt.format(0.30000000000000004), "0.3");
    }

    #[test]
    fn percent_format_appends_sign() {
        assert_eq!(TickFormat::Percent.format(25.0), "25%");
    }

    #[test]
    fn parse_interval_accepts_aliases() {
        assert_eq!(
            TimeInterval::parse("2 weeks").unwrap(),
            TimeInterval::new(2, CalendarUnit::Weeks)
        );
        assert_eq!(
            TimeInterval::parse("3600 seconds").unwrap(),
            TimeInterval::new(3600, CalendarUnit::Seconds)
        );
        assert_eq!(
            TimeInterval::parse("4 hrs").unwrap(),
            TimeInterval::new(4, CalendarUnit::Hours)
        );
        assert!(TimeInterval::parse("fortnight").is_err());
        assert!(TimeInterval::parse("0 days").is_err());
    }

    #[test]
    fn calendar_ticks_walk_months() {
        let start = NaiveDate::from_ymd_opt(2004, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let stop = NaiveDate::from_ymd_opt(2004, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let range = AxisRange::new(
            start.and_utc().timestamp() as f64,
            stop.and_utc().timestamp() as f64,
            1.0,
        );
        let fmt = TickFormat::DateTime {
            format: "%Y-%m-%d".into(),
        };
        let interval = TimeInterval::new(1, CalendarUnit::Months);
        let ticks = generate_calendar(&range, &interval, &scale_for(&range), &fmt).unwrap();
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2004-01-15", "2004-02-15", "2004-03-15", "2004-04-15"]
        );
    }
}
