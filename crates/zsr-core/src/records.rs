//! Cleaned record types for the two sources

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reading status of a catalogued book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    Completed,
    InProgress,
    /// Any other catalog status ("Not begun", "Abandoned", empty, ...)
    Other(String),
}

impl ReadingStatus {
    /// Parse a catalog status cell (case- and separator-insensitive)
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "completed" => ReadingStatus::Completed,
            "inprogress" => ReadingStatus::InProgress,
            _ => ReadingStatus::Other(raw.trim().to_string()),
        }
    }

    /// Completed or in progress
    pub fn is_reading_or_read(&self) -> bool {
        matches!(self, ReadingStatus::Completed | ReadingStatus::InProgress)
    }
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::Other(String::new())
    }
}

/// One catalogued book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryRecord {
    /// ISBN with any float-formatting artifact removed
    pub identifier: String,
    /// Trimmed, never empty
    pub title: String,
    pub creators: String,
    /// Page count; `None` when unknown
    pub length: Option<u32>,
    pub status: ReadingStatus,
    pub began: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
    pub added: Option<NaiveDate>,
    /// Days from start to finish; `None` when unknown
    pub duration: Option<u32>,
    /// Name of the catalog export the book came from
    pub library: String,
}

impl LibraryRecord {
    /// Create a record with only identity fields set
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Pages per day, when both length and duration are known
    pub fn pace(&self) -> Option<f64> {
        match (self.length, self.duration) {
            (Some(length), Some(days)) if length > 0 && days > 0 => {
                Some(length as f64 / days as f64)
            }
            _ => None,
        }
    }

    /// Calendar year the book was finished in
    pub fn completed_year(&self) -> Option<i32> {
        self.completed.map(|d| d.year())
    }
}

/// One reading session: pages read from one book on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub date: NaiveDate,
    pub identifier: String,
    /// Trimmed, never empty
    pub title: String,
    /// Pages read that day, never negative
    pub daily_pages: f64,
    /// Progress through the book after this session, 0-100
    pub percent_complete: Option<f64>,
}

impl DailyLogEntry {
    pub fn new(
        date: NaiveDate,
        identifier: impl Into<String>,
        title: impl Into<String>,
        daily_pages: f64,
        percent_complete: Option<f64>,
    ) -> Self {
        Self {
            date,
            identifier: identifier.into(),
            title: title.into(),
            daily_pages,
            percent_complete,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
