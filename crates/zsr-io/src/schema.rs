//! Column contracts and raw table representation

use crate::reader::{IoError, IoResult};
use serde::Serialize;
use std::collections::HashMap;

/// Canonical column names shared by both sources
pub mod columns {
    pub const IDENTIFIER: &str = "ean_isbn13";
    pub const TITLE: &str = "title";
    pub const CREATORS: &str = "creators";
    pub const LENGTH: &str = "length";
    pub const STATUS: &str = "status";
    pub const BEGAN: &str = "began";
    pub const COMPLETED: &str = "completed";
    pub const ADDED: &str = "added";
    pub const DURATION: &str = "duration";
    pub const DATE: &str = "date";
    pub const DAILY_PAGES: &str = "daily_pages";
    pub const PERCENT_COMPLETE: &str = "percent_complete";
}

/// Descriptor for an expected column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    /// Canonical column name
    pub name: &'static str,

    /// Alternative header spellings accepted for this column
    pub aliases: Vec<&'static str>,

    /// Whether the header must be present
    pub required: bool,
}

impl ColumnSpec {
    /// A column the source must provide
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            required: true,
        }
    }

    /// A column that reads as empty when absent
    pub fn optional(name: &'static str) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            required: false,
        }
    }

    /// Accept additional header spellings
    pub fn with_aliases(mut self, aliases: &[&'static str]) -> Self {
        self.aliases.extend_from_slice(aliases);
        self
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name)
            || self.aliases.iter().any(|a| header.eq_ignore_ascii_case(a))
    }
}

/// The column contract of one source
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    /// Human-readable source name used in diagnostics
    pub name: String,

    /// Expected columns
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Column contract of the library catalog
    pub fn library() -> Self {
        use columns::*;
        Self::new(
            "library",
            vec![
                ColumnSpec::required(IDENTIFIER)
                    .with_aliases(&["identifier", "isbn"]),
                ColumnSpec::required(TITLE),
                ColumnSpec::optional(CREATORS),
                ColumnSpec::optional(LENGTH),
                ColumnSpec::optional(STATUS),
                ColumnSpec::optional(BEGAN),
                ColumnSpec::optional(COMPLETED),
                ColumnSpec::optional(ADDED),
                ColumnSpec::optional(DURATION),
            ],
        )
    }

    /// Column contract of the daily reading log
    pub fn daily_log() -> Self {
        use columns::*;
        Self::new(
            "daily log",
            vec![
                ColumnSpec::required(DATE),
                ColumnSpec::required(IDENTIFIER)
                    .with_aliases(&["identifier", "isbn"]),
                ColumnSpec::required(TITLE),
                ColumnSpec::required(DAILY_PAGES),
                ColumnSpec::optional(PERCENT_COMPLETE),
            ],
        )
    }

    /// Resolve the header row against this contract
    pub fn resolve(&self, headers: &[String]) -> IoResult<ColumnMap> {
        let mut indexes = HashMap::new();
        for spec in &self.columns {
            match headers.iter().position(|h| spec.matches(h)) {
                Some(idx) => {
                    indexes.insert(spec.name, idx);
                }
                None if spec.required => {
                    return Err(IoError::ColumnNotFound {
                        column: spec.name.to_string(),
                        source_name: self.name.clone(),
                    });
                }
                None => {}
            }
        }
        Ok(ColumnMap { indexes })
    }
}

/// Canonical column name to header position
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indexes: HashMap<&'static str, usize>,
}

impl ColumnMap {
    /// Position of a column, if the source has it
    pub fn index(&self, name: &str) -> Option<usize> {
        self.indexes.get(name).copied()
    }
}

/// One data record with its position in the source
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based data line (the header is line 0)
    pub line: usize,
    fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

/// A fully loaded source: resolved columns plus string cells
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Header row as read
    pub headers: Vec<String>,
    columns: ColumnMap,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from already-resolved parts
    pub fn new(headers: Vec<String>, columns: ColumnMap, rows: Vec<RawRow>) -> Self {
        Self {
            headers,
            columns,
            rows,
        }
    }

    /// Number of data records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the records
    pub fn rows(&self) -> impl Iterator<Item = &RawRow> {
        self.rows.iter()
    }

    /// Cell value of a canonical column; `None` when the column is absent
    pub fn cell<'a>(&self, row: &'a RawRow, name: &str) -> Option<&'a str> {
        let idx = self.columns.index(name)?;
        row.fields.get(idx).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_library_headers() {
        let schema = TableSchema::library();
        let map = schema
            .resolve(&headers(&["title", "creators", "ean_isbn13", "length"]))
            .unwrap();
        assert_eq!(map.index(columns::TITLE), Some(0));
        assert_eq!(map.index(columns::IDENTIFIER), Some(2));
        assert_eq!(map.index(columns::DURATION), None);
    }

    #[test]
    fn test_resolve_accepts_alias() {
        let schema = TableSchema::daily_log();
        let map = schema
            .resolve(&headers(&["date", "ISBN", "title", "daily_pages"]))
            .unwrap();
        assert_eq!(map.index(columns::IDENTIFIER), Some(1));
        assert_eq!(map.index(columns::PERCENT_COMPLETE), None);
    }

    #[test]
    fn test_resolve_missing_required() {
        let schema = TableSchema::daily_log();
        let err = schema
            .resolve(&headers(&["date", "ean_isbn13", "daily_pages"]))
            .unwrap_err();
        match err {
            IoError::ColumnNotFound { column, .. } => assert_eq!(column, "title"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_lookup() {
        let schema = TableSchema::daily_log();
        let hdrs = headers(&["date", "ean_isbn13", "title", "daily_pages"]);
        let map = schema.resolve(&hdrs).unwrap();
        let row = RawRow::new(
            1,
            vec!["2024-01-05".into(), "978".into(), "Dune".into(), "40".into()],
        );
        let table = RawTable::new(hdrs, map, vec![row]);
        let row = table.rows().next().unwrap();
        assert_eq!(table.cell(row, columns::TITLE), Some("Dune"));
        assert_eq!(table.cell(row, columns::PERCENT_COMPLETE), None);
    }
}
