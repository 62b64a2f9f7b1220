//! Chart document export
//!
//! Documents are written as pretty-printed JSON. Each file is written to a
//! temporary sibling first and renamed into place, so a failed export
//! never leaves a partial file behind.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ExportError, ExportResult};

/// Output format extension
pub const JSON_EXTENSION: &str = "json";

const TEMP_SUFFIX: &str = "tmp";

/// Writes chart documents into one output directory
#[derive(Debug, Clone)]
pub struct ChartWriter {
    dir: PathBuf,
}

impl ChartWriter {
    /// Create a writer, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(ExportError::InvalidPath { path: dir });
        }
        fs::create_dir_all(&dir).map_err(|source| ExportError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of the document named `stem`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{JSON_EXTENSION}"))
    }

    /// Serialize `value` to `<dir>/<stem>.json`
    pub fn write_json<T: Serialize>(&self, stem: &str, value: &T) -> ExportResult<PathBuf> {
        let path = self.path_for(stem);
        let json = serde_json::to_string_pretty(value).map_err(|e| ExportError::Serialize {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let temp = path.with_extension(format!("{JSON_EXTENSION}.{TEMP_SUFFIX}"));
        if let Err(source) = write_then_rename(&temp, &path, json.as_bytes()) {
            let _ = fs::remove_file(&temp);
            return Err(ExportError::Write { path, source });
        }

        info!("Wrote {}", path.display());
        Ok(path)
    }
}

fn write_then_rename(temp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp)?;
    file.write_all(bytes)?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_creates_dir_and_file() {
        let tmp = TempDir::new().unwrap();
        let writer = ChartWriter::new(tmp.path().join("figures/nested")).unwrap();

        let path = writer
            .write_json("daily-pages-2024", &json!({ "year": 2024 }))
            .unwrap();
        assert_eq!(path, writer.dir().join("daily-pages-2024.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["year"], 2024);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let writer = ChartWriter::new(tmp.path()).unwrap();
        writer.write_json("a", &vec![1, 2, 3]).unwrap();
        writer.write_json("a", &vec![4]).unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json".to_string()]);
        assert_eq!(fs::read_to_string(writer.path_for("a")).unwrap().trim(), "[\n  4\n]");
    }

    #[test]
    fn test_failed_write_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let writer = ChartWriter::new(tmp.path()).unwrap();
        // A directory where the output file should go makes the rename fail
        fs::create_dir(writer.path_for("blocked")).unwrap();
        fs::write(writer.path_for("blocked").join("keep"), "x").unwrap();

        let err = writer.write_json("blocked", &json!({})).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(!tmp.path().join("blocked.json.tmp").exists());
    }

    #[test]
    fn test_output_path_must_be_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            ChartWriter::new(&file),
            Err(ExportError::InvalidPath { .. })
        ));
    }
}
