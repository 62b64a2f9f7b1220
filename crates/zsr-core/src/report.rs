//! The per-year report loop
//!
//! Every (chart, year) pair is built and written independently. A failure
//! in one is recorded in the [`RunReport`] and the loop moves on.

use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::aggregate::yearly_aggregates;
use crate::charts::{build_chart, ChartKind};
use crate::clean::{load_daily_log, load_library, CleanReport};
use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::export::ChartWriter;
use crate::records::{DailyLogEntry, LibraryRecord};

/// Stem of the cross-year aggregates document
pub const AGGREGATES_STEM: &str = "yearly-aggregates";

/// Cleaned sources plus the configuration they were loaded with
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub library: Vec<LibraryRecord>,
    pub dailies: Vec<DailyLogEntry>,
    pub config: ReportConfig,
}

impl ReportContext {
    pub fn new(library: Vec<LibraryRecord>, dailies: Vec<DailyLogEntry>, config: ReportConfig) -> Self {
        Self {
            library,
            dailies,
            config,
        }
    }

    /// Load every catalog export and the reading log named in `config`
    ///
    /// Any source failing to load fails the whole run.
    pub fn load(config: ReportConfig) -> ReportResult<(Self, LoadSummary)> {
        config.validate()?;
        let library = load_library(&config.input.libraries, &config.length_overrides)?;
        let dailies = load_daily_log(&config.input.dailies)?;

        let summary = LoadSummary {
            library: library.report,
            dailies: dailies.report,
        };
        Ok((Self::new(library.records, dailies.records, config), summary))
    }

    /// Distinct years present in the reading log, ascending
    pub fn years_in_log(&self) -> Vec<i32> {
        self.dailies
            .iter()
            .map(DailyLogEntry::year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Cleaning outcome of both sources
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub library: CleanReport,
    pub dailies: CleanReport,
}

/// Result of building and writing one chart
#[derive(Debug)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub year: i32,
    pub result: ReportResult<PathBuf>,
}

/// All chart outcomes for one year
#[derive(Debug)]
pub struct YearReport {
    pub year: i32,
    pub charts: Vec<ChartOutcome>,
}

impl YearReport {
    pub fn successes(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.charts.iter().filter(|c| c.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.charts.iter().filter(|c| c.result.is_err())
    }
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct RunReport {
    pub years: Vec<YearReport>,
    /// Path of the aggregates document, or why it could not be written
    pub aggregates: ReportResult<PathBuf>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.years.iter().map(|y| y.successes().count()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.years.iter().flat_map(YearReport::failures)
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none() && self.aggregates.is_ok()
    }
}

/// Build and write every chart for `year`
pub fn generate_year(ctx: &ReportContext, writer: &ChartWriter, year: i32) -> YearReport {
    let charts = ChartKind::ALL
        .iter()
        .map(|&kind| {
            let result = build_chart(kind, ctx, year).and_then(|doc| {
                writer
                    .write_json(&kind.file_stem(year), &doc)
                    .map_err(ReportError::from)
            });
            if let Err(e) = &result {
                warn!("Skipping {}: {}", kind.file_stem(year), e);
            }
            ChartOutcome { kind, year, result }
        })
        .collect();

    YearReport { year, charts }
}

/// Build the report for `years`, or for every year in the log when empty
///
/// Also writes the cross-year aggregates document.
pub fn generate_report(ctx: &ReportContext, years: &[i32]) -> ReportResult<RunReport> {
    let writer = ChartWriter::new(&ctx.config.output.figures)?;
    let years = if years.is_empty() {
        ctx.years_in_log()
    } else {
        years.to_vec()
    };
    info!("Generating report for {} year(s)", years.len());

    #[cfg(feature = "parallel")]
    let mut reports: Vec<YearReport> = years
        .par_iter()
        .map(|&year| generate_year(ctx, &writer, year))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut reports: Vec<YearReport> = years
        .iter()
        .map(|&year| generate_year(ctx, &writer, year))
        .collect();

    reports.sort_by_key(|r| r.year);

    let aggregates = writer
        .write_json(AGGREGATES_STEM, &yearly_aggregates(&ctx.library))
        .map_err(ReportError::from);
    if let Err(e) = &aggregates {
        warn!("Skipping {}: {}", AGGREGATES_STEM, e);
    }

    Ok(RunReport {
        years: reports,
        aggregates,
    })
}
