//! zsr - Reading-log report generator
//!
//! Builds the yearly chart documents from a library catalog and a daily
//! reading log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zsr_core::{generate_report, LibrarySource, LoadSummary, ReportConfig, ReportContext};

/// Command-line arguments for zsr
#[derive(Parser, Debug)]
#[command(name = "zsr")]
#[command(about = "Generate reading charts from a library catalog and daily log")]
#[command(version)]
struct Args {
    /// Year to report on; every year in the log when omitted
    #[arg(value_parser = clap::value_parser!(i32).range(1..=9999))]
    year: Option<i32>,

    /// Config file (TOML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Library catalog CSV as PATH or NAME=PATH; repeat for several catalogs
    #[arg(long = "library", value_name = "[NAME=]PATH", value_parser = parse_library)]
    libraries: Vec<LibrarySource>,

    /// Daily reading log CSV
    #[arg(long)]
    dailies: Option<PathBuf>,

    /// Directory for chart documents
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Command-line paths win over the config file
    fn apply_overrides(&self, config: &mut ReportConfig) {
        if !self.libraries.is_empty() {
            config.input.libraries = self.libraries.clone();
        }
        if let Some(dailies) = &self.dailies {
            config.input.dailies = dailies.clone();
        }
        if let Some(output) = &self.output {
            config.output.figures = output.clone();
        }
    }

    fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "zsr=info",
            1 => "zsr=debug",
            _ => "zsr=trace",
        }
    }
}

/// `NAME=PATH`, or a bare path named after its file
fn parse_library(raw: &str) -> Result<LibrarySource, String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok(LibrarySource::new(name.trim(), path))
        }
        Some(_) => Err(format!("expected NAME=PATH, got {raw:?}")),
        None if raw.is_empty() => Err("library path is empty".to_string()),
        None => Ok(LibrarySource::from_path(raw)),
    }
}

/// One line of drop counts, or nothing when every row was kept
fn dropped_line(summary: &LoadSummary) -> Option<String> {
    let library = summary.library.dropped_count();
    let dailies = summary.dailies.dropped_count();
    if library == 0 && dailies == 0 {
        return None;
    }
    Some(format!("Dropped {library} library row(s) and {dailies} log row(s)"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (mut config, config_path) = match ReportConfig::discover(args.config.as_deref()) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    match &config_path {
        Some(path) => info!("Using config {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    args.apply_overrides(&mut config);

    let (ctx, summary) = match ReportContext::load(config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let years: Vec<i32> = args.year.into_iter().collect();
    let report = match generate_report(&ctx, &years) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for failure in report.failures() {
        if let Err(e) = &failure.result {
            println!("Skipped {}: {}", failure.kind.file_stem(failure.year), e);
        }
    }
    if let Err(e) = &report.aggregates {
        println!("Skipped yearly aggregates: {e}");
    }
    if let Some(line) = dropped_line(&summary) {
        println!("{line}");
    }
    println!(
        "Wrote {} chart(s) to {}",
        report.written(),
        ctx.config.output.figures.display()
    );

    ExitCode::SUCCESS
}
