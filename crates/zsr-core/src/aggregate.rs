//! Aggregation and scaling over cleaned records
//!
//! Each function here is a pure derivation from records (or from
//! per-day totals) to the numbers one chart layer needs.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use zsr_stats::{mean, positive_quantile, round_to};

use crate::calendar::CalendarCell;
use crate::error::{ReportError, ReportResult};
use crate::records::{DailyLogEntry, LibraryRecord, ReadingStatus};

/// Most milestones one cumulative chart will carry
pub const MAX_MILESTONES: u64 = 10_000;

/// Color saturation bound for a year's daily totals
///
/// The `quantile` of the strictly positive totals; `None` when nothing was
/// read. Zero days are excluded so sparse years keep a useful scale.
pub fn color_bound(daily_totals: &[f64], quantile: f64) -> Option<f64> {
    positive_quantile(daily_totals, quantile)
}

/// Cells whose raw value is above `threshold`
pub fn annotated_cells(cells: &[CalendarCell], threshold: f64) -> Vec<&CalendarCell> {
    cells.iter().filter(|c| c.daily_pages > threshold).collect()
}

/// One day on the cumulative-progress line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub daily_pages: f64,
    pub cumulative: f64,
}

/// Running total of pages in date order
pub fn cumulative_progress(daily_totals: &BTreeMap<NaiveDate, f64>) -> Vec<CumulativePoint> {
    let mut running = 0.0;
    daily_totals
        .iter()
        .map(|(&date, &pages)| {
            running += pages;
            CumulativePoint {
                date,
                daily_pages: pages,
                cumulative: running,
            }
        })
        .collect()
}

/// A round-number cumulative threshold and the day it was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Milestone {
    pub pages: u64,
    pub date: NaiveDate,
    /// Running total at the end of that day
    pub cumulative: f64,
}

/// Every multiple of `step` up to the final total, credited to the first
/// day whose running total reaches it
///
/// A day that jumps past several milestones is credited with all of them.
/// Fails with `TooManyMilestones` when the total would cross more than
/// [`MAX_MILESTONES`] of them.
pub fn milestones(points: &[CumulativePoint], step: u32) -> ReportResult<Vec<Milestone>> {
    if step == 0 {
        return Ok(Vec::new());
    }

    let total = points.iter().map(|p| p.cumulative).fold(0.0, f64::max);
    let count = (total / f64::from(step)).floor();
    if count > MAX_MILESTONES as f64 {
        return Err(ReportError::TooManyMilestones {
            total,
            step,
            limit: MAX_MILESTONES,
        });
    }

    let step = u64::from(step);
    let mut next = step;
    let mut reached = Vec::with_capacity(count as usize);
    for point in points {
        while point.cumulative >= next as f64 {
            reached.push(Milestone {
                pages: next,
                date: point.date,
                cumulative: point.cumulative,
            });
            next += step;
        }
    }
    Ok(reached)
}

/// Pages-per-day for one finished book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPace {
    pub identifier: String,
    pub title: String,
    pub creators: String,
    pub pages: u32,
    pub days: u32,
    pub pages_per_day: f64,
    pub completed: Option<NaiveDate>,
}

/// Pace of every book with a known length and duration, fastest first
///
/// Books missing either value are left out.
pub fn reading_pace<'a>(records: impl IntoIterator<Item = &'a LibraryRecord>) -> Vec<BookPace> {
    let mut paces: Vec<BookPace> = records
        .into_iter()
        .filter_map(|r| {
            let pages_per_day = r.pace()?;
            Some(BookPace {
                identifier: r.identifier.clone(),
                title: r.title.clone(),
                creators: r.creators.clone(),
                pages: r.length?,
                days: r.duration?,
                pages_per_day,
                completed: r.completed,
            })
        })
        .collect();
    paces.sort_by(|a, b| {
        b.pages_per_day
            .total_cmp(&a.pages_per_day)
            .then_with(|| a.title.cmp(&b.title))
    });
    paces
}

/// Titles in order of first session, earliest first
pub fn titles_by_first_read(entries: &[&DailyLogEntry]) -> Vec<String> {
    let mut first_seen: HashMap<&str, NaiveDate> = HashMap::new();
    for entry in entries {
        first_seen
            .entry(entry.title.as_str())
            .and_modify(|d| *d = (*d).min(entry.date))
            .or_insert(entry.date);
    }
    let mut titles: Vec<(&str, NaiveDate)> = first_seen.into_iter().collect();
    titles.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    titles.into_iter().map(|(t, _)| t.to_string()).collect()
}

/// One book's share of a day's bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub title: String,
    pub pages: f64,
    /// Height of the segments stacked below this one
    pub offset: f64,
}

/// A day's stacked bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBar {
    pub date: NaiveDate,
    pub total: f64,
    pub segments: Vec<BarSegment>,
}

/// Pages per (date, title), stacked in `title_order`
pub fn stacked_pages(entries: &[&DailyLogEntry], title_order: &[String]) -> Vec<StackedBar> {
    let mut by_date: BTreeMap<NaiveDate, HashMap<&str, f64>> = BTreeMap::new();
    for entry in entries {
        *by_date
            .entry(entry.date)
            .or_default()
            .entry(entry.title.as_str())
            .or_insert(0.0) += entry.daily_pages;
    }

    by_date
        .into_iter()
        .map(|(date, per_title)| {
            let mut offset = 0.0;
            let segments: Vec<BarSegment> = title_order
                .iter()
                .filter_map(|title| {
                    let pages = *per_title.get(title.as_str())?;
                    let segment = BarSegment {
                        title: title.clone(),
                        pages,
                        offset,
                    };
                    offset += pages;
                    Some(segment)
                })
                .collect();
            StackedBar {
                date,
                total: offset,
                segments,
            }
        })
        .collect()
}

/// A percent-complete reading for one book on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub percent: Option<f64>,
    pub pages: f64,
}

/// Sessions of each title in date order, keyed by title
///
/// Sessions with neither a percent nor any pages carry no progress and
/// are left out.
pub fn progress_by_title(entries: &[&DailyLogEntry]) -> HashMap<String, Vec<ProgressPoint>> {
    let mut series: HashMap<String, Vec<ProgressPoint>> = HashMap::new();
    for entry in entries {
        series.entry(entry.title.clone()).or_default().push(ProgressPoint {
            date: entry.date,
            percent: entry.percent_complete,
            pages: entry.daily_pages,
        });
    }
    for points in series.values_mut() {
        points.sort_by_key(|p| p.date);
        points.retain(|p| p.percent.is_some() || p.pages > 0.0);
    }
    series
}

/// Pages of each individual session with something read
pub fn session_pages(entries: &[&DailyLogEntry]) -> Vec<f64> {
    entries
        .iter()
        .map(|e| e.daily_pages)
        .filter(|p| *p > 0.0)
        .collect()
}

/// Totals for the books finished in one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearAggregate {
    pub year: i32,
    pub books: usize,
    pub total_pages: u64,
    pub avg_length: f64,
    pub avg_duration: Option<f64>,
    pub pages_per_month: f64,
    pub pages_per_week: f64,
    pub pages_per_day: f64,
}

/// Completed books grouped by year of completion, oldest year first
///
/// Averages are rounded to two decimals. Unknown lengths count as zero
/// pages; unknown durations are left out of the duration average.
pub fn yearly_aggregates(records: &[LibraryRecord]) -> Vec<YearAggregate> {
    let mut by_year: BTreeMap<i32, Vec<&LibraryRecord>> = BTreeMap::new();
    for record in records {
        if record.status != ReadingStatus::Completed {
            continue;
        }
        if let Some(completed) = record.completed {
            by_year.entry(completed.year()).or_default().push(record);
        }
    }

    by_year
        .into_iter()
        .map(|(year, books)| {
            let lengths: Vec<f64> = books
                .iter()
                .map(|b| f64::from(b.length.unwrap_or(0)))
                .collect();
            let durations: Vec<f64> = books
                .iter()
                .filter_map(|b| b.duration.map(f64::from))
                .collect();
            let total: f64 = lengths.iter().sum();

            YearAggregate {
                year,
                books: books.len(),
                total_pages: total as u64,
                avg_length: round_to(mean(&lengths).unwrap_or(0.0), 2),
                avg_duration: mean(&durations).map(|d| round_to(d, 2)),
                pages_per_month: round_to(total / 12.0, 2),
                pages_per_week: round_to(total / 52.0, 2),
                pages_per_day: round_to(total / 365.0, 2),
            }
        })
        .collect()
}
