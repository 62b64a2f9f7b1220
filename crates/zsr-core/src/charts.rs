//! Chart documents
//!
//! Each chart of the yearly report is materialised as a serializable
//! document holding exactly the numbers, labels, and colors a plotting
//! frontend needs to draw it. Building a chart never touches the
//! filesystem; see [`crate::export`] for writing documents out.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use zsr_stats::{DensityPoint, KernelDensity, SummaryStats, DEFAULT_CUT};

use crate::aggregate::{
    annotated_cells, color_bound, cumulative_progress, milestones, progress_by_title,
    reading_pace, session_pages, stacked_pages, titles_by_first_read, BookPace, CumulativePoint,
    Milestone, ProgressPoint, StackedBar,
};
use crate::axis::{month_start_ticks, nice_ticks, padded_date_range, DateTick, DualAxisScale, TickMark};
use crate::calendar::{
    build_calendar_grid, daily_totals, month_week_ticks, require_year_slice, MonthWeekTick,
};
use crate::colormap::{greens, viridis, Color, SequentialScale};
use crate::error::ReportResult;
use crate::records::DailyLogEntry;
use crate::report::ReportContext;
use crate::table::{prepare_book_table, prepare_completed_table, BookSnapshot, CompletedBook};

/// Points sampled along the violin outline
const DENSITY_POINTS: usize = 100;

/// Target tick count on page-count axes
const VALUE_TICKS: usize = 5;

/// The charts of a yearly report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Calendar heatmap of pages per day
    DailyPages,
    /// Stacked daily bars with percent-complete lines
    Overlay,
    /// One small panel of progress per book
    ProgressFacets,
    /// Per-book snapshot table
    BooksTable,
    /// Distribution of pages per session
    SessionViolin,
    /// Pages-per-day dot plot for finished books
    ReadingPace,
    /// Running total with milestones
    CumulativePages,
    /// Books finished in the year, by catalog
    CompletedBooks,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::DailyPages,
        ChartKind::Overlay,
        ChartKind::ProgressFacets,
        ChartKind::BooksTable,
        ChartKind::SessionViolin,
        ChartKind::ReadingPace,
        ChartKind::CumulativePages,
        ChartKind::CompletedBooks,
    ];

    /// Output file stem prefix
    pub fn stem(&self) -> &'static str {
        match self {
            ChartKind::DailyPages => "daily-pages",
            ChartKind::Overlay => "overlay-chart",
            ChartKind::ProgressFacets => "progress-facets",
            ChartKind::BooksTable => "books-table",
            ChartKind::SessionViolin => "session-violin",
            ChartKind::ReadingPace => "reading-pace",
            ChartKind::CumulativePages => "cumulative-pages",
            ChartKind::CompletedBooks => "completed-books",
        }
    }

    /// Output file stem for one year, e.g. `daily-pages-2024`
    pub fn file_stem(&self, year: i32) -> String {
        format!("{}-{}", self.stem(), year)
    }

    /// Human-readable chart title
    pub fn title(&self, year: i32) -> String {
        match self {
            ChartKind::DailyPages => format!("Pages read per day, {year}"),
            ChartKind::Overlay => format!("Reading progress, {year}"),
            ChartKind::ProgressFacets => format!("Progress by book, {year}"),
            ChartKind::BooksTable => format!("Books read in {year}"),
            ChartKind::SessionViolin => format!("Pages per session, {year}"),
            ChartKind::ReadingPace => format!("Reading pace, {year}"),
            ChartKind::CumulativePages => format!("Cumulative pages, {year}"),
            ChartKind::CompletedBooks => format!("Books completed in {year}"),
        }
    }
}

/// A built chart: what it is, which year, and its data
#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    pub kind: ChartKind,
    pub year: i32,
    pub title: String,
    pub data: ChartData,
}

/// Chart payloads
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Heatmap(HeatmapChart),
    Overlay(OverlayChart),
    Facets(FacetChart),
    Table(BookTableChart),
    Violin(ViolinChart),
    Pace(PaceChart),
    Cumulative(CumulativeChart),
    Completed(CompletedBooksChart),
}

/// A heatmap cell with its fill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub weekday: u32,
    pub week: u32,
    pub pages: f64,
    pub color: String,
    /// Whether the raw page count is printed in the cell
    pub annotate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapChart {
    pub cells: Vec<HeatmapCell>,
    /// Quantile bound over positive days; `None` when nothing was read
    pub color_bound: Option<f64>,
    /// Bound actually used for the color scale
    pub vmax: f64,
    pub weekday_labels: Vec<&'static str>,
    pub month_ticks: Vec<MonthWeekTick>,
}

/// One book's line on the overlay chart, in pages-axis units
#[derive(Debug, Clone, Serialize)]
pub struct OverlaySeries {
    pub title: String,
    pub color: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayChart {
    pub bars: Vec<StackedBar>,
    pub colors: Vec<(String, String)>,
    /// Percent lines projected onto the pages axis; empty when no pages were read
    pub lines: Vec<OverlaySeries>,
    pub scale: Option<DualAxisScale>,
    pub x_range: (NaiveDate, NaiveDate),
    pub x_ticks: Vec<DateTick>,
    pub y_ticks: Vec<TickMark>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetPanel {
    pub title: String,
    pub color: String,
    pub points: Vec<ProgressPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetChart {
    pub panels: Vec<FacetPanel>,
    pub x_range: (NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, Serialize)]
pub struct BookTableChart {
    pub columns: Vec<&'static str>,
    pub rows: Vec<BookSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedBooksChart {
    pub columns: Vec<&'static str>,
    pub rows: Vec<CompletedBook>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViolinChart {
    /// `None` when no session in the year had pages
    pub summary: Option<SummaryStats>,
    /// Inner box whisker ends (Tukey fences)
    pub whiskers: Option<(f64, f64)>,
    pub bandwidth: Option<f64>,
    pub outline: Vec<DensityPoint>,
    pub sessions: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaceChart {
    pub books: Vec<BookPace>,
    pub x_ticks: Vec<TickMark>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CumulativeChart {
    pub points: Vec<CumulativePoint>,
    pub milestones: Vec<Milestone>,
    pub total: f64,
    pub y_ticks: Vec<TickMark>,
}

/// Build one chart for one year
///
/// Fails with `EmptyYearSlice` when the log has nothing for `year`.
pub fn build_chart(kind: ChartKind, ctx: &ReportContext, year: i32) -> ReportResult<ChartDocument> {
    let slice = require_year_slice(&ctx.dailies, year)?;

    let data = match kind {
        ChartKind::DailyPages => ChartData::Heatmap(heatmap_chart(ctx, year)),
        ChartKind::Overlay => ChartData::Overlay(overlay_chart(&slice, year)),
        ChartKind::ProgressFacets => ChartData::Facets(facet_chart(&slice)),
        ChartKind::BooksTable => ChartData::Table(BookTableChart {
            columns: vec![
                "title",
                "author",
                "pages",
                "began",
                "completed",
                "percent_complete",
                "duration",
            ],
            rows: prepare_book_table(&ctx.library, &ctx.dailies, year, &ctx.config.table),
        }),
        ChartKind::SessionViolin => ChartData::Violin(violin_chart(&slice)),
        ChartKind::ReadingPace => ChartData::Pace(pace_chart(ctx, year)),
        ChartKind::CumulativePages => ChartData::Cumulative(cumulative_chart(ctx, year)?),
        ChartKind::CompletedBooks => ChartData::Completed(CompletedBooksChart {
            columns: vec![
                "title",
                "creators",
                "library",
                "began",
                "completed",
                "duration",
                "length",
            ],
            rows: prepare_completed_table(&ctx.library, year, &ctx.config.table),
        }),
    };

    Ok(ChartDocument {
        kind,
        year,
        title: kind.title(year),
        data,
    })
}

fn heatmap_chart(ctx: &ReportContext, year: i32) -> HeatmapChart {
    let heatmap = &ctx.config.heatmap;
    let grid = build_calendar_grid(&ctx.dailies, year);
    let totals: Vec<f64> = grid.iter().map(|c| c.daily_pages).collect();

    let bound = color_bound(&totals, heatmap.vmax_quantile);
    let scale = SequentialScale::new(greens(), bound.unwrap_or(1.0));
    let annotated: Vec<NaiveDate> = annotated_cells(&grid, heatmap.annotation_threshold)
        .into_iter()
        .map(|c| c.date)
        .collect();

    let cells = grid
        .iter()
        .map(|c| HeatmapCell {
            date: c.date,
            weekday: c.weekday,
            week: c.week,
            pages: c.daily_pages,
            color: scale.color(c.daily_pages).to_hex(),
            annotate: annotated.binary_search(&c.date).is_ok(),
        })
        .collect();

    HeatmapChart {
        cells,
        color_bound: bound,
        vmax: scale.vmax(),
        weekday_labels: vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        month_ticks: month_week_ticks(year),
    }
}

fn title_colors(titles: &[String]) -> Vec<Color> {
    viridis().palette(titles.len())
}

fn date_range(slice: &[&DailyLogEntry]) -> Option<(NaiveDate, NaiveDate)> {
    let first = slice.iter().map(|e| e.date).min()?;
    let last = slice.iter().map(|e| e.date).max()?;
    Some(padded_date_range(first, last))
}

fn overlay_chart(slice: &[&DailyLogEntry], year: i32) -> OverlayChart {
    let titles = titles_by_first_read(slice);
    let colors = title_colors(&titles);
    let bars = stacked_pages(slice, &titles);

    let totals: Vec<f64> = bars.iter().map(|b| b.total).collect();
    let scale = DualAxisScale::for_values(&totals);

    let lines = match scale {
        Some(scale) => {
            let progress = progress_by_title(slice);
            titles
                .iter()
                .zip(&colors)
                .map(|(title, color)| OverlaySeries {
                    title: title.clone(),
                    color: color.to_hex(),
                    points: progress
                        .get(title)
                        .map(|points| {
                            points
                                .iter()
                                .filter_map(|p| Some((p.date, scale.project(p.percent?))))
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        }
        None => {
            debug!("No pages read in {}, skipping percent lines", year);
            Vec::new()
        }
    };

    let max_total = totals.iter().copied().fold(0.0, f64::max);

    OverlayChart {
        colors: titles
            .iter()
            .cloned()
            .zip(colors.iter().map(Color::to_hex))
            .collect(),
        bars,
        lines,
        scale,
        x_range: date_range(slice).unwrap_or_default(),
        x_ticks: month_start_ticks(year),
        y_ticks: nice_ticks(0.0, max_total, VALUE_TICKS),
    }
}

fn facet_chart(slice: &[&DailyLogEntry]) -> FacetChart {
    let titles = titles_by_first_read(slice);
    let colors = title_colors(&titles);
    let mut progress = progress_by_title(slice);

    let panels = titles
        .iter()
        .zip(&colors)
        .map(|(title, color)| FacetPanel {
            title: title.clone(),
            color: color.to_hex(),
            points: progress.remove(title).unwrap_or_default(),
        })
        .collect();

    FacetChart {
        panels,
        x_range: date_range(slice).unwrap_or_default(),
    }
}

fn violin_chart(slice: &[&DailyLogEntry]) -> ViolinChart {
    let sessions = session_pages(slice);
    let density = KernelDensity::fit(&sessions);
    let summary = SummaryStats::from_data(&sessions);

    ViolinChart {
        whiskers: summary.map(|s| (s.lower_whisker(&sessions), s.upper_whisker(&sessions))),
        summary,
        bandwidth: density.as_ref().map(KernelDensity::bandwidth),
        outline: density
            .map(|kde| kde.curve(DENSITY_POINTS, DEFAULT_CUT))
            .unwrap_or_default(),
        sessions,
    }
}

fn pace_chart(ctx: &ReportContext, year: i32) -> PaceChart {
    let books = reading_pace(
        ctx.library
            .iter()
            .filter(|r| r.completed_year() == Some(year)),
    );
    let fastest = books.first().map_or(0.0, |b| b.pages_per_day);

    PaceChart {
        x_ticks: nice_ticks(0.0, fastest, VALUE_TICKS),
        books,
    }
}

fn cumulative_chart(ctx: &ReportContext, year: i32) -> ReportResult<CumulativeChart> {
    let points = cumulative_progress(&daily_totals(&ctx.dailies, year));
    let total = points.last().map_or(0.0, |p| p.cumulative);

    Ok(CumulativeChart {
        milestones: milestones(&points, ctx.config.milestone_step)?,
        y_ticks: nice_ticks(0.0, total, VALUE_TICKS),
        points,
        total,
    })
}
