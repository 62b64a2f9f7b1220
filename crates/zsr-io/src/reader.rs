//! Table reader trait and common types
//!
//! The `TableReader` trait provides a uniform interface for loading a
//! whole tabular source into memory.

use crate::schema::{RawTable, TableSchema};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {column} (in {source_name})")]
    ColumnNotFound { column: String, source_name: String },
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for loading a tabular source
///
/// Implementations read the complete source or nothing: a malformed
/// record anywhere fails the whole read.
pub trait TableReader: Send + Sync {
    /// Read every record, checking the headers against `schema`
    fn read_table(&self, schema: &TableSchema) -> IoResult<RawTable>;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn TableReader>;

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension; anything that is
/// not `.tsv` is read as comma-separated.
pub fn open_table(path: impl AsRef<Path>) -> IoResult<BoxedReader> {
    use crate::csv_reader::CsvReader;

    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "tsv" | "tab" => Ok(Box::new(CsvReader::open_with_delimiter(path, b'\t')?)),
        _ => Ok(Box::new(CsvReader::open(path)?)),
    }
}

/// Load a source in one call
pub fn load_table(path: impl AsRef<Path>, schema: &TableSchema) -> IoResult<RawTable> {
    open_table(path)?.read_table(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = open_table("/definitely/not/here/library.csv").err();
        assert!(matches!(err, Some(IoError::FileNotFound(_))));
    }

    #[test]
    fn test_column_not_found_display() {
        let err = IoError::ColumnNotFound {
            column: "title".to_string(),
            source_name: "dailies.csv".to_string(),
        };
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("dailies.csv"));
    }
}
