//! Error types for zsr-core
//!
//! Provides error handling for:
//! - Source loading (missing or unreadable tables)
//! - Per-chart failures (a year with no data, an implausible running total)
//! - Export failures
//! - Configuration problems

use std::path::PathBuf;
use thiserror::Error;
use zsr_io::IoError;

use crate::config::ConfigError;

/// Main error type for report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// A source table could not be loaded; nothing can be reported
    #[error("Failed to load {source_name}: {error}")]
    Load {
        source_name: String,
        #[source]
        error: IoError,
    },

    /// Filtering to the requested year left no reading sessions
    #[error("No reading data for {year}")]
    EmptyYearSlice { year: i32 },

    /// The year's running total crosses more milestones than a chart can show
    #[error("{total} pages cross more than {limit} milestones of {step} pages")]
    TooManyMilestones { total: f64, step: u32, limit: u64 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl ReportError {
    /// Whether the error means a source file does not exist
    pub fn is_missing_source(&self) -> bool {
        matches!(
            self,
            ReportError::Load {
                error: IoError::FileNotFound(_),
                ..
            }
        )
    }
}

/// Errors related to export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output directory could not be created or is not a directory
    #[error("Invalid output directory: {}", .path.display())]
    InvalidPath { path: PathBuf },

    /// Chart document could not be serialized
    #[error("Failed to serialize {}: {message}", .path.display())]
    Serialize { path: PathBuf, message: String },

    /// Writing or renaming the output failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
