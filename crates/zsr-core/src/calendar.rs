//! Calendar grid for the daily-pages heatmap
//!
//! A year is laid out as a weekday-by-week grid. Every day of the year gets
//! exactly one cell, whether or not anything was read that day.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ReportError, ReportResult};
use crate::records::DailyLogEntry;

/// One day of the heatmap grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// 1 = Monday .. 7 = Sunday
    pub weekday: u32,
    /// Monday-anchored week number within the year, see [`week_index`]
    pub week: u32,
    /// Pages read that day across all books
    pub daily_pages: f64,
}

/// Label position of a month on the heatmap x-axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWeekTick {
    pub month: u32,
    /// Abbreviated month name ("Jan")
    pub label: String,
    /// Week column holding the first day of the month
    pub week: u32,
}

/// Weekday number, Monday = 1 .. Sunday = 7
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Week column of a date: `floor((day_of_year - weekday + 10) / 7)`
///
/// Weeks start on Monday. Days before the first Monday-started week that
/// holds a Thursday land in week 0, and late-December days can reach 53,
/// so a year spans at most 54 columns.
pub fn week_index(date: NaiveDate) -> u32 {
    (date.ordinal() + 10 - weekday_index(date)) / 7
}

/// Every date of `year`, January 1 through December 31
pub fn year_days(year: i32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(move |start| start.iter_days().take_while(move |d| d.year() == year))
}

/// Log entries dated in `year`
pub fn year_slice(entries: &[DailyLogEntry], year: i32) -> Vec<&DailyLogEntry> {
    entries.iter().filter(|e| e.year() == year).collect()
}

/// Log entries dated in `year`, failing when there are none
pub fn require_year_slice(entries: &[DailyLogEntry], year: i32) -> ReportResult<Vec<&DailyLogEntry>> {
    let slice = year_slice(entries, year);
    if slice.is_empty() {
        return Err(ReportError::EmptyYearSlice { year });
    }
    Ok(slice)
}

/// Pages per date for the entries of `year`
pub fn daily_totals(entries: &[DailyLogEntry], year: i32) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.year() == year) {
        *totals.entry(entry.date).or_insert(0.0) += entry.daily_pages;
    }
    totals
}

/// Build the full-year grid
///
/// Always returns one cell per calendar day (365 or 366), in date order.
/// Days without sessions get zero pages.
pub fn build_calendar_grid(entries: &[DailyLogEntry], year: i32) -> Vec<CalendarCell> {
    let totals = daily_totals(entries, year);
    year_days(year)
        .map(|date| CalendarCell {
            date,
            weekday: weekday_index(date),
            week: week_index(date),
            daily_pages: totals.get(&date).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Week columns of each month's first day
pub fn month_week_ticks(year: i32) -> Vec<MonthWeekTick> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| MonthWeekTick {
            month: first.month(),
            label: first.format("%b").to_string(),
            week: week_index(first),
        })
        .collect()
}
