//! Per-book snapshot rows for the summary table

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::calendar::year_slice;
use crate::config::TableConfig;
use crate::records::{DailyLogEntry, LibraryRecord, ReadingStatus};

/// Suffix appended to truncated text; counted inside the length budget
pub const ELLIPSIS: &str = "...";

/// Shown in place of an unknown date or duration
const PLACEHOLDER: &str = "-";

/// Shorten `text` to at most `max_len` characters
///
/// Cuts at the last space that leaves room for the ellipsis; without such a
/// space the text is cut mid-word. Text already within the budget is
/// returned unchanged.
pub fn smart_truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if max_len <= ellipsis_len {
        return text.chars().take(max_len).collect();
    }

    let prefix: String = text.chars().take(max_len - ellipsis_len).collect();
    let kept = match prefix.rfind(' ') {
        Some(idx) if !prefix[..idx].trim_end().is_empty() => prefix[..idx].trim_end(),
        _ => prefix.as_str(),
    };
    format!("{kept}{ELLIPSIS}")
}

/// Latest recorded percent complete per identifier on or before `cutoff`
///
/// Sessions without a percent are skipped, so a trailing session with no
/// reading does not erase an earlier value.
pub fn percent_complete_as_of(entries: &[DailyLogEntry], cutoff: NaiveDate) -> HashMap<String, f64> {
    let mut dated: Vec<&DailyLogEntry> = entries.iter().filter(|e| e.date <= cutoff).collect();
    dated.sort_by_key(|e| e.date);

    let mut snapshot = HashMap::new();
    for entry in dated {
        if let Some(percent) = entry.percent_complete {
            snapshot.insert(entry.identifier.clone(), percent);
        }
    }
    snapshot
}

/// One row of the summary table, ready to display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSnapshot {
    pub identifier: String,
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub began: String,
    pub completed: String,
    pub duration: String,
    /// Whole percent, truncated; 0 when never recorded
    pub percent_complete: u32,
}

/// Books read during `year`, most recently started first
///
/// Only books with a session in the year and a status of completed or in
/// progress are listed. Books without a start date sort last, and ties
/// fall back to title order. Percent complete is taken as of December 31.
pub fn prepare_book_table(
    library: &[LibraryRecord],
    dailies: &[DailyLogEntry],
    year: i32,
    config: &TableConfig,
) -> Vec<BookSnapshot> {
    let titles_read: HashSet<&str> = year_slice(dailies, year)
        .into_iter()
        .map(|e| e.title.as_str())
        .collect();

    let mut books: Vec<&LibraryRecord> = library
        .iter()
        .filter(|r| r.status.is_reading_or_read() && titles_read.contains(r.title.as_str()))
        .collect();
    books.sort_by(|a, b| began_descending(a.began, b.began).then_with(|| a.title.cmp(&b.title)));

    let snapshot = match NaiveDate::from_ymd_opt(year, 12, 31) {
        Some(cutoff) => percent_complete_as_of(dailies, cutoff),
        None => HashMap::new(),
    };

    books
        .into_iter()
        .map(|book| BookSnapshot {
            identifier: book.identifier.clone(),
            title: smart_truncate(&book.title, config.title_truncate_length),
            author: smart_truncate(&book.creators, config.author_truncate_length),
            pages: book.length,
            began: display_date(book.began),
            completed: display_date(book.completed),
            duration: display_duration(book.duration),
            percent_complete: snapshot
                .get(&book.identifier)
                .map_or(0, |p| p.clamp(0.0, u32::MAX as f64) as u32),
        })
        .collect()
}

/// One finished book in the completed-in-year table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedBook {
    pub identifier: String,
    pub title: String,
    pub creators: String,
    /// Catalog export the book came from
    pub library: String,
    pub began: String,
    pub completed: String,
    pub duration: String,
    pub length: Option<u32>,
}

/// Books marked completed whose completion date falls in `year`
///
/// Most recently finished first, ties in title order. Unlike the snapshot
/// table this does not look at the reading log at all.
pub fn prepare_completed_table(
    library: &[LibraryRecord],
    year: i32,
    config: &TableConfig,
) -> Vec<CompletedBook> {
    let mut books: Vec<&LibraryRecord> = library
        .iter()
        .filter(|r| r.status == ReadingStatus::Completed && r.completed_year() == Some(year))
        .collect();
    books.sort_by(|a, b| b.completed.cmp(&a.completed).then_with(|| a.title.cmp(&b.title)));

    books
        .into_iter()
        .map(|book| CompletedBook {
            identifier: book.identifier.clone(),
            title: smart_truncate(&book.title, config.title_truncate_length),
            creators: smart_truncate(&book.creators, config.author_truncate_length),
            library: book.library.clone(),
            began: display_date(book.began),
            completed: display_date(book.completed),
            duration: display_duration(book.duration),
            length: book.length,
        })
        .collect()
}

fn began_descending(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| PLACEHOLDER.to_string(), |d| d.format("%Y-%b-%d").to_string())
}

fn display_duration(days: Option<u32>) -> String {
    days.map_or_else(|| PLACEHOLDER.to_string(), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(id: &str, title: &str, status: ReadingStatus, began: Option<NaiveDate>) -> LibraryRecord {
        let mut record = LibraryRecord::new(id, title);
        record.status = status;
        record.began = began;
        record
    }

    #[rstest]
    #[case("The Lord of the Rings: Fellowship", 20, "The Lord of the...")]
    #[case("Dune", 20, "Dune")]
    #[case("Exactly twenty chars", 20, "Exactly twenty chars")]
    #[case("Supercalifragilisticexpialidocious", 10, "Superca...")]
    #[case("Cien años de soledad", 13, "Cien años...")]
    #[case("Cien años de soledad", 12, "Cien...")]
    #[case("abcdef", 3, "abc")]
    fn test_smart_truncate(#[case] text: &str, #[case] max_len: usize, #[case] expected: &str) {
        let truncated = smart_truncate(text, max_len);
        assert_eq!(truncated, expected);
        assert!(truncated.chars().count() <= max_len);
    }

    #[test]
    fn test_percent_snapshot_uses_latest_before_cutoff() {
        let entries = vec![
            DailyLogEntry::new(date(2024, 1, 5), "X", "Dune", 30.0, Some(30.0)),
            DailyLogEntry::new(date(2025, 1, 3), "X", "Dune", 30.0, Some(100.0)),
            DailyLogEntry::new(date(2024, 12, 20), "X", "Dune", 40.0, Some(70.0)),
            DailyLogEntry::new(date(2024, 12, 21), "X", "Dune", 0.0, None),
        ];
        let snapshot = percent_complete_as_of(&entries, date(2024, 12, 31));
        assert_eq!(snapshot.get("X"), Some(&70.0));

        let snapshot = percent_complete_as_of(&entries, date(2025, 12, 31));
        assert_eq!(snapshot.get("X"), Some(&100.0));
    }

    #[rstest]
    #[case(date(2024, 2, 1), Some(30.0))]
    #[case(date(2024, 3, 10), Some(70.0))]
    #[case(date(2024, 4, 1), Some(100.0))]
    #[case(date(2024, 1, 4), None)]
    fn test_percent_snapshot_at_cutoff(#[case] cutoff: NaiveDate, #[case] expected: Option<f64>) {
        let entries = vec![
            DailyLogEntry::new(date(2024, 4, 1), "X", "Dune", 40.0, Some(100.0)),
            DailyLogEntry::new(date(2024, 1, 5), "X", "Dune", 40.0, Some(30.0)),
            DailyLogEntry::new(date(2024, 3, 10), "X", "Dune", 40.0, Some(70.0)),
        ];
        let snapshot = percent_complete_as_of(&entries, cutoff);
        assert_eq!(snapshot.get("X").copied(), expected);
    }

    #[test]
    fn test_book_table_percent_recorded_after_year_end_is_zero() {
        let library = vec![book("1", "Dune", ReadingStatus::InProgress, Some(date(2024, 12, 30)))];
        let dailies = vec![
            DailyLogEntry::new(date(2024, 12, 30), "1", "Dune", 20.0, None),
            DailyLogEntry::new(date(2025, 1, 3), "1", "Dune", 30.0, Some(50.0)),
        ];

        let rows = prepare_book_table(&library, &dailies, 2024, &TableConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percent_complete, 0);

        let rows = prepare_book_table(&library, &dailies, 2025, &TableConfig::default());
        assert_eq!(rows[0].percent_complete, 50);
    }

    #[test]
    fn test_completed_table_filters_and_orders() {
        let mut first = book("1", "Dune", ReadingStatus::Completed, Some(date(2024, 1, 1)));
        first.completed = Some(date(2024, 2, 1));
        first.library = "kindle".to_string();
        first.duration = Some(32);
        let mut last = book("2", "Snow", ReadingStatus::Completed, None);
        last.completed = Some(date(2024, 11, 5));
        last.library = "borrowed".to_string();
        let mut tie = book("3", "Alpha", ReadingStatus::Completed, None);
        tie.completed = Some(date(2024, 11, 5));
        let mut other_year = book("4", "Old", ReadingStatus::Completed, None);
        other_year.completed = Some(date(2023, 6, 1));
        let mut abandoned = book("5", "Quit", ReadingStatus::Other("Abandoned".into()), None);
        abandoned.completed = Some(date(2024, 6, 1));

        let rows = prepare_completed_table(
            &[first, last, tie, other_year, abandoned],
            2024,
            &TableConfig::default(),
        );
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Snow", "Dune"]);

        assert_eq!(rows[1].library, "borrowed");
        assert_eq!(rows[2].library, "kindle");
        assert_eq!(rows[2].completed, "2024-Feb-01");
        assert_eq!(rows[2].duration, "32");
        assert_eq!(rows[1].began, "-");
    }

    #[test]
    fn test_book_table_filters_and_orders() {
        let library = vec![
            book("1", "Alpha", ReadingStatus::Completed, Some(date(2024, 2, 1))),
            book("2", "Beta", ReadingStatus::InProgress, Some(date(2024, 6, 1))),
            book("3", "Gamma", ReadingStatus::Completed, None),
            book("4", "Delta", ReadingStatus::Other("Abandoned".into()), Some(date(2024, 3, 1))),
            book("5", "Epsilon", ReadingStatus::Completed, Some(date(2023, 1, 1))),
            book("6", "Aardvark", ReadingStatus::Completed, None),
        ];
        let dailies: Vec<DailyLogEntry> = ["Alpha", "Beta", "Gamma", "Delta", "Aardvark"]
            .iter()
            .map(|t| DailyLogEntry::new(date(2024, 7, 1), "", *t, 10.0, None))
            .chain(std::iter::once(DailyLogEntry::new(
                date(2023, 7, 1),
                "5",
                "Epsilon",
                10.0,
                None,
            )))
            .collect();

        let rows = prepare_book_table(&library, &dailies, 2024, &TableConfig::default());
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Alpha", "Aardvark", "Gamma"]);
    }

    #[test]
    fn test_book_table_snapshot_and_display() {
        let mut dune = book("9780441013593", "Dune", ReadingStatus::Completed, Some(date(2024, 1, 5)));
        dune.creators = "Frank Herbert".to_string();
        dune.length = Some(600);
        dune.duration = Some(360);
        let library = vec![dune];
        let dailies = vec![
            DailyLogEntry::new(date(2024, 1, 5), "9780441013593", "Dune", 30.0, Some(30.0)),
            DailyLogEntry::new(date(2024, 12, 20), "9780441013593", "Dune", 40.0, Some(70.5)),
            DailyLogEntry::new(date(2025, 1, 3), "9780441013593", "Dune", 30.0, Some(100.0)),
        ];

        let rows = prepare_book_table(&library, &dailies, 2024, &TableConfig::default());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.percent_complete, 70);
        assert_eq!(row.began, "2024-Jan-05");
        assert_eq!(row.completed, "-");
        assert_eq!(row.duration, "360");
        assert_eq!(row.author, "Frank Herbert");
        assert_eq!(row.pages, Some(600));
    }

    #[test]
    fn test_book_table_missing_snapshot_defaults_to_zero() {
        let library = vec![book("1", "Dune", ReadingStatus::InProgress, None)];
        let dailies = vec![DailyLogEntry::new(date(2024, 3, 1), "1", "Dune", 12.0, None)];

        let rows = prepare_book_table(&library, &dailies, 2024, &TableConfig::default());
        assert_eq!(rows[0].percent_complete, 0);
        assert_eq!(rows[0].began, "-");
        assert_eq!(rows[0].duration, "-");
    }
}
