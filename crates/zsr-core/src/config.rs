//! Configuration for report generation
//!
//! Every option a derivation reads lives in one typed, immutable
//! `ReportConfig`, passed by reference. Configs load from TOML, or from
//! JSON when the file name ends in `.json`; missing keys take defaults.
//!
//! ```toml
//! milestone_step = 1000
//!
//! [input]
//! dailies = "data/dailies.csv"
//!
//! [[input.libraries]]
//! name = "zsreglau"
//! path = "data/library_zsreglau.csv"
//!
//! [[input.libraries]]
//! name = "kindle"
//! path = "data/library_kindle.csv"
//!
//! [heatmap]
//! vmax_quantile = 0.95
//! annotation_threshold = 0.0
//!
//! [table]
//! title_truncate_length = 30
//! author_truncate_length = 30
//!
//! [length_overrides]
//! "The Hobbit" = 317
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::table::ELLIPSIS;

/// File name looked for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "zsr.toml";

/// Report-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Granularity of cumulative-page milestones
    pub milestone_step: u32,
    /// Source tables
    pub input: InputPaths,
    /// Where chart documents are written
    pub output: OutputPaths,
    /// Calendar heatmap settings
    pub heatmap: HeatmapConfig,
    /// Book table settings
    pub table: TableConfig,
    /// Known page counts by exact title, applied over the catalog value
    pub length_overrides: BTreeMap<String, u32>,
}

/// Source table locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub dailies: PathBuf,
    /// Catalog exports, concatenated in order
    pub libraries: Vec<LibrarySource>,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            dailies: PathBuf::from("data/dailies.csv"),
            libraries: vec![LibrarySource::new("library", "data/library.csv")],
        }
    }
}

/// One named catalog export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySource {
    /// Tag carried by every book from this export
    pub name: String,
    pub path: PathBuf,
}

impl LibrarySource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name a source after its file: `library_kindle.csv` becomes `kindle`
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match stem.strip_prefix("library_") {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => stem,
        };
        Self { name, path }
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub figures: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            figures: PathBuf::from("figures"),
        }
    }
}

/// Calendar heatmap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Quantile of the positive daily totals used as color saturation point
    pub vmax_quantile: f64,
    /// Days with more pages than this get a value label
    pub annotation_threshold: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            vmax_quantile: 0.95,
            annotation_threshold: 0.0,
        }
    }
}

/// Book table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Maximum title length in characters, ellipsis included
    pub title_truncate_length: usize,
    /// Maximum author length in characters, ellipsis included
    pub author_truncate_length: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title_truncate_length: 30,
            author_truncate_length: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: InputPaths::default(),
            output: OutputPaths::default(),
            heatmap: HeatmapConfig::default(),
            table: TableConfig::default(),
            milestone_step: 1000,
            length_overrides: BTreeMap::new(),
        }
    }
}

impl ReportConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&contents)?
        } else {
            Self::from_toml(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Find and load the config
    ///
    /// Order: the explicit path, `./zsr.toml`, then `zsr/config.toml` in the
    /// user config directory. Falls back to defaults when none exists.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::user_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// `zsr/config.toml` under the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zsr").join("config.toml"))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.heatmap.vmax_quantile;
        if !(0.0..=1.0).contains(&q) {
            return Err(ConfigError::OutOfRange(format!(
                "heatmap.vmax_quantile must be between 0.0 and 1.0, got {}",
                q
            )));
        }

        if !self.heatmap.annotation_threshold.is_finite() {
            return Err(ConfigError::OutOfRange(
                "heatmap.annotation_threshold must be a finite number".to_string(),
            ));
        }

        let min_len = ELLIPSIS.chars().count();
        for (name, value) in [
            ("table.title_truncate_length", self.table.title_truncate_length),
            ("table.author_truncate_length", self.table.author_truncate_length),
        ] {
            if value <= min_len {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be greater than {}, got {}",
                    name, min_len, value
                )));
            }
        }

        if self.input.libraries.is_empty() {
            return Err(ConfigError::OutOfRange(
                "input.libraries must name at least one catalog".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for source in &self.input.libraries {
            if source.name.trim().is_empty() {
                return Err(ConfigError::OutOfRange(format!(
                    "library {} has an empty name",
                    source.path.display()
                )));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::OutOfRange(format!(
                    "library name {:?} is used twice",
                    source.name
                )));
            }
        }

        if self.milestone_step == 0 {
            return Err(ConfigError::OutOfRange(
                "milestone_step must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Config file is not valid TOML/JSON for this schema
    #[error("Config parse error: {0}")]
    Parse(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
