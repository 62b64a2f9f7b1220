//! zsr-core - Report engine for a personal reading log
//!
//! This crate turns a library catalog and a daily reading log into the
//! data behind a yearly set of reading charts.
//!
//! # Key Components
//!
//! - **Clean**: load both sources, coerce cells, count dropped rows
//! - **Calendar**: full-year weekday-by-week grid for the heatmap
//! - **Aggregate**: color bounds, running totals, milestones, pace, stacking
//! - **Table**: per-book snapshots as of year end, books completed per year
//! - **Charts**: one serializable document per chart and year
//! - **Report**: the per-year loop with isolated per-chart failures
//!
//! # Charts
//!
//! Every year gets eight documents: a calendar heatmap, a stacked-bar
//! overlay with percent lines, per-book progress facets, a summary table,
//! a session-size violin, a pace dot plot, a cumulative line with
//! milestones, and a table of the books completed that year. A cross-year
//! aggregates table is written alongside.

pub mod aggregate;
pub mod axis;
pub mod calendar;
pub mod charts;
pub mod clean;
pub mod colormap;
pub mod config;
pub mod error;
pub mod export;
pub mod records;
pub mod report;
pub mod table;

pub use aggregate::*;
pub use axis::*;
pub use calendar::*;
pub use charts::{build_chart, ChartData, ChartDocument, ChartKind};
pub use clean::*;
pub use colormap::{Color, Colormap, SequentialScale};
pub use config::{ConfigError, LibrarySource, ReportConfig};
pub use error::*;
pub use export::ChartWriter;
pub use records::*;
pub use report::*;
pub use table::*;
