//! Loading and cleaning of the source tables
//!
//! Cleaning is best effort: unparseable cells become `None`, and rows that
//! cannot be used at all are dropped. Drops are never errors, but every one
//! is recorded in a `CleanReport` so callers can count them.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};
use zsr_io::{
    clean_text, columns, load_table, normalize_identifier, parse_date, parse_number,
    parse_positive_count, RawTable, TableSchema,
};

use crate::config::LibrarySource;
use crate::error::{ReportError, ReportResult};
use crate::records::{DailyLogEntry, LibraryRecord, ReadingStatus};

/// Most pages a single session may claim before the row is rejected
pub const MAX_SESSION_PAGES: f64 = 5_000.0;

const DAILY_LOG: &str = "daily log";

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Title empty after trimming
    MissingTitle,
    /// Session date missing or unparseable
    InvalidDate,
    /// Negative page count in a session
    NegativePages,
    /// More pages in one session than [`MAX_SESSION_PAGES`]
    ImplausiblePages,
}

/// A dropped row, its source, and its 1-based data line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub source: String,
    pub line: usize,
    pub reason: DropReason,
}

/// Outcome of cleaning one or more sources
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Data rows read from the sources
    pub rows_read: usize,
    pub dropped: Vec<DroppedRow>,
}

impl CleanReport {
    fn new(rows_read: usize) -> Self {
        Self {
            rows_read,
            dropped: Vec::new(),
        }
    }

    /// Fold another source's report into this one
    pub fn absorb(&mut self, other: CleanReport) {
        self.rows_read += other.rows_read;
        self.dropped.extend(other.dropped);
    }

    /// Rows that survived cleaning
    pub fn kept(&self) -> usize {
        self.rows_read - self.dropped.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Number of rows dropped for a given reason
    pub fn count(&self, reason: DropReason) -> usize {
        self.dropped.iter().filter(|d| d.reason == reason).count()
    }

    fn drop_row(&mut self, source: &str, line: usize, reason: DropReason) {
        debug!("Dropping {} row {}: {:?}", source, line, reason);
        self.dropped.push(DroppedRow {
            source: source.to_string(),
            line,
            reason,
        });
    }

    fn log_summary(&self, source: &str) {
        if self.dropped.is_empty() {
            info!("Loaded {} rows from {}", self.rows_read, source);
        } else {
            warn!(
                "Loaded {} of {} rows from {} ({} dropped)",
                self.kept(),
                self.rows_read,
                source,
                self.dropped_count()
            );
        }
    }
}

/// Cleaned records plus the cleaning report
#[derive(Debug, Clone)]
pub struct Cleaned<T> {
    pub records: Vec<T>,
    pub report: CleanReport,
}

/// Load, clean, and concatenate every catalog export, in order
///
/// Any export failing to load fails the whole catalog.
pub fn load_library(
    sources: &[LibrarySource],
    length_overrides: &BTreeMap<String, u32>,
) -> ReportResult<Cleaned<LibraryRecord>> {
    let mut combined = Cleaned {
        records: Vec::new(),
        report: CleanReport::default(),
    };
    for source in sources {
        let cleaned = load_library_source(source, length_overrides)?;
        combined.records.extend(cleaned.records);
        combined.report.absorb(cleaned.report);
    }

    let missing = books_missing_length(&combined.records);
    if !missing.is_empty() {
        warn!(
            "{} books have no page length: {}",
            missing.len(),
            missing.join("; ")
        );
    }
    Ok(combined)
}

/// Load and clean one catalog export, tagging its books with the source name
pub fn load_library_source(
    source: &LibrarySource,
    length_overrides: &BTreeMap<String, u32>,
) -> ReportResult<Cleaned<LibraryRecord>> {
    let table = load_table(&source.path, &TableSchema::library()).map_err(|error| {
        ReportError::Load {
            source_name: format!("library '{}'", source.name),
            error,
        }
    })?;
    let cleaned = clean_library(&table, &source.name, length_overrides);
    cleaned
        .report
        .log_summary(&format!("library '{}'", source.name));
    Ok(cleaned)
}

/// Load and clean the daily reading log
pub fn load_daily_log(path: impl AsRef<Path>) -> ReportResult<Cleaned<DailyLogEntry>> {
    let table = load_table(path.as_ref(), &TableSchema::daily_log()).map_err(|error| {
        ReportError::Load {
            source_name: DAILY_LOG.to_string(),
            error,
        }
    })?;
    let cleaned = clean_daily_log(&table);
    cleaned.report.log_summary(DAILY_LOG);
    Ok(cleaned)
}

/// Clean raw catalog rows from the export named `library`
///
/// `length_overrides` maps exact titles to page counts and wins over the
/// catalog value. A missing duration is derived from the began and
/// completed dates, counting both days.
pub fn clean_library(
    table: &RawTable,
    library: &str,
    length_overrides: &BTreeMap<String, u32>,
) -> Cleaned<LibraryRecord> {
    let mut report = CleanReport::new(table.len());
    let mut records = Vec::with_capacity(table.len());

    for row in table.rows() {
        let title = clean_text(table.cell(row, columns::TITLE));
        if title.is_empty() {
            report.drop_row(library, row.line, DropReason::MissingTitle);
            continue;
        }

        let began = parse_date(table.cell(row, columns::BEGAN));
        let completed = parse_date(table.cell(row, columns::COMPLETED));
        let length = length_overrides
            .get(&title)
            .copied()
            .or_else(|| parse_positive_count(table.cell(row, columns::LENGTH)));
        let duration = parse_positive_count(table.cell(row, columns::DURATION))
            .or_else(|| inclusive_days(began, completed));

        records.push(LibraryRecord {
            identifier: normalize_identifier(table.cell(row, columns::IDENTIFIER).unwrap_or("")),
            creators: clean_text(table.cell(row, columns::CREATORS)),
            status: ReadingStatus::parse(table.cell(row, columns::STATUS).unwrap_or("")),
            added: parse_date(table.cell(row, columns::ADDED)),
            title,
            length,
            began,
            completed,
            duration,
            library: library.to_string(),
        });
    }

    Cleaned { records, report }
}

/// Clean raw reading-log rows
///
/// Sessions claiming more than [`MAX_SESSION_PAGES`] are treated as typos
/// and dropped.
pub fn clean_daily_log(table: &RawTable) -> Cleaned<DailyLogEntry> {
    let mut report = CleanReport::new(table.len());
    let mut records = Vec::with_capacity(table.len());

    for row in table.rows() {
        let Some(date) = parse_date(table.cell(row, columns::DATE)) else {
            report.drop_row(DAILY_LOG, row.line, DropReason::InvalidDate);
            continue;
        };

        let title = clean_text(table.cell(row, columns::TITLE));
        if title.is_empty() {
            report.drop_row(DAILY_LOG, row.line, DropReason::MissingTitle);
            continue;
        }

        let daily_pages = parse_number(table.cell(row, columns::DAILY_PAGES)).unwrap_or(0.0);
        if daily_pages < 0.0 {
            report.drop_row(DAILY_LOG, row.line, DropReason::NegativePages);
            continue;
        }
        if daily_pages > MAX_SESSION_PAGES {
            report.drop_row(DAILY_LOG, row.line, DropReason::ImplausiblePages);
            continue;
        }

        records.push(DailyLogEntry {
            date,
            identifier: normalize_identifier(table.cell(row, columns::IDENTIFIER).unwrap_or("")),
            title,
            daily_pages,
            percent_complete: parse_number(table.cell(row, columns::PERCENT_COMPLETE)),
        });
    }

    Cleaned { records, report }
}

/// Titles of books whose page length is still unknown
pub fn books_missing_length(records: &[LibraryRecord]) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.length.is_none())
        .map(|r| r.title.as_str())
        .collect()
}

fn inclusive_days(began: Option<NaiveDate>, completed: Option<NaiveDate>) -> Option<u32> {
    let days = (completed? - began?).num_days() + 1;
    u32::try_from(days).ok().filter(|d| *d > 0)
}
