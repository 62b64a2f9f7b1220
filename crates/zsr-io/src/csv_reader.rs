//! CSV file reader

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::{RawRow, RawTable, TableSchema};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// CSV file reader
pub struct CsvReader {
    path: PathBuf,
    display_path: String,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file
    pub fn open_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> IoResult<Self> {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        if !path.exists() {
            return Err(IoError::FileNotFound(display_path));
        }
        if !path.is_file() {
            return Err(IoError::OpenFailed(format!("{} is not a file", display_path)));
        }

        Ok(Self {
            path: path.to_path_buf(),
            display_path,
            delimiter,
        })
    }

    fn reader(&self) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(BufReader::new(file)))
    }
}

impl TableReader for CsvReader {
    fn read_table(&self, schema: &TableSchema) -> IoResult<RawTable> {
        let mut reader = self.reader()?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(format!("{}: {}", self.display_path, e)))?
            .iter()
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
            .collect();

        let columns = schema.resolve(&headers).map_err(|e| match e {
            IoError::ColumnNotFound { column, .. } => IoError::ColumnNotFound {
                column,
                source_name: self.display_path.clone(),
            },
            other => other,
        })?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            // Any unreadable record fails the whole source
            let record = result
                .map_err(|e| IoError::InvalidFormat(format!("{}: {}", self.display_path, e)))?;
            rows.push(RawRow::new(
                i + 1,
                record.iter().map(|s| s.to_string()).collect(),
            ));
        }

        Ok(RawTable::new(headers, columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::columns;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_daily_log() {
        let file = write_temp(
            "date,ean_isbn13,title,daily_pages,percent_complete\n\
             2024-01-05,9780143127741.0,Dune,40,10\n\
             2024-01-06,9780143127741.0,Dune,35,19\n",
        );
        let reader = CsvReader::open(file.path()).unwrap();
        let table = reader.read_table(&TableSchema::daily_log()).unwrap();

        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].line, 1);
        assert_eq!(table.cell(rows[1], columns::DAILY_PAGES), Some("35"));
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let file = write_temp(
            "ean_isbn13,title,creators\n\
             1,\"Reading, Writing\",\"Doe, Jane\"\n",
        );
        let table = CsvReader::open(file.path())
            .unwrap()
            .read_table(&TableSchema::library())
            .unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(table.cell(row, columns::TITLE), Some("Reading, Writing"));
        assert_eq!(table.cell(row, columns::CREATORS), Some("Doe, Jane"));
    }

    #[test]
    fn test_ragged_record_fails_whole_source() {
        let file = write_temp(
            "date,ean_isbn13,title,daily_pages\n\
             2024-01-05,1,Dune,40\n\
             2024-01-06,1,Dune\n",
        );
        let err = CsvReader::open(file.path())
            .unwrap()
            .read_table(&TableSchema::daily_log())
            .unwrap_err();
        assert!(matches!(err, IoError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_required_column_names_file() {
        let file = write_temp("date,title,daily_pages\n2024-01-05,Dune,40\n");
        let err = CsvReader::open(file.path())
            .unwrap()
            .read_table(&TableSchema::daily_log())
            .unwrap_err();
        match err {
            IoError::ColumnNotFound {
                column,
                source_name,
            } => {
                assert_eq!(column, columns::IDENTIFIER);
                assert!(source_name.ends_with(".csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CsvReader::open(dir.path()),
            Err(IoError::OpenFailed(_))
        ));
    }
}
