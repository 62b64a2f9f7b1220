//! Axis helpers for report charts
//!
//! Provides tick calculation for page-count axes, month ticks for date
//! axes, and the dual-axis projection that lets a 0-100 percent series
//! share a chart with a pages series.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Projection of percent values onto a pages axis
///
/// `scale_factor = max_pages / 100`, so 100% lands on the tallest bar.
/// Only constructible with a positive factor; a chart with no pages gets
/// no projection at all and must skip its percent layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualAxisScale {
    scale_factor: f64,
}

impl DualAxisScale {
    /// Scale for a pages axis whose maximum is `max_pages`
    pub fn from_max(max_pages: f64) -> Option<Self> {
        let scale_factor = max_pages / 100.0;
        (scale_factor.is_finite() && scale_factor > 0.0).then_some(Self { scale_factor })
    }

    /// Scale for the largest of `values`
    pub fn for_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let max = values
            .into_iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        Self::from_max(max)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Percent to pages-axis units
    pub fn project(&self, percent: f64) -> f64 {
        percent * self.scale_factor
    }

    /// Pages-axis units back to percent
    pub fn invert(&self, value: f64) -> f64 {
        value / self.scale_factor
    }
}

/// A labelled position on a numeric axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub value: f64,
    pub label: String,
}

/// A labelled position on a date axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTick {
    pub date: NaiveDate,
    pub label: String,
}

/// "Nice" ticks (steps of 1, 2, or 5 times a power of ten) covering `[min, max]`
pub fn nice_ticks(min: f64, max: f64, target_count: usize) -> Vec<TickMark> {
    let range = max - min;
    if !(range.is_finite() && range > 0.0) || target_count == 0 {
        return vec![];
    }

    let rough_step = range / target_count as f64;
    let magnitude = 10.0_f64.powf(rough_step.log10().floor());
    let residual = rough_step / magnitude;

    let nice_step = if residual <= 1.5 {
        magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let mut ticks = Vec::new();
    let mut value = (min / nice_step).ceil() * nice_step;
    while value <= max + nice_step * 0.001 {
        ticks.push(TickMark {
            value,
            label: format_tick(value),
        });
        value += nice_step;
    }
    ticks
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{}", (value * 1e6).round() / 1e6)
    }
}

/// First day of each month of `year`, labelled "Jan".."Dec"
pub fn month_start_ticks(year: i32) -> Vec<DateTick> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|date| DateTick {
            label: date.format("%b").to_string(),
            date,
        })
        .collect()
}

/// Date axis limits: one day of padding on each side of the data
pub fn padded_date_range(first: NaiveDate, last: NaiveDate) -> (NaiveDate, NaiveDate) {
    (first - Duration::days(1), last + Duration::days(1))
}
