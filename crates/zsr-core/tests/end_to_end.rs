//! Whole-pipeline tests: CSV fixtures in, chart documents out

use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;
use zsr_core::{
    generate_report, ChartKind, LibrarySource, ReportConfig, ReportContext, ReportError,
};

const LIBRARY_CSV: &str = "\
title,creators,ean_isbn13,length,status,began,completed,added,duration
Dune,Frank Herbert,9780441013593.0,600,Completed,2024-01-05,2024-01-07,2023-12-01,
Snow,Orhan Pamuk,9780375706868,,In progress,2024-01-06,,,
The Lord of the Rings: The Fellowship of the Ring,J.R.R. Tolkien,9780547928210,,Completed,2023-12-30,2024-01-02,,
Unread,Nobody,1111111111111,200,Not begun,,,,
,Missing Title,2222222222222,100,Completed,,,,
";

const DAILIES_CSV: &str = "\
date,ean_isbn13,title,daily_pages,percent_complete
2023-12-30,9780547928210,The Lord of the Rings: The Fellowship of the Ring,200,40
2024-01-02,9780547928210,The Lord of the Rings: The Fellowship of the Ring,300,100
2024-01-05,9780441013593.0,Dune,200,33
2024-01-06,9780441013593.0,Dune,200,66
2024-01-06,9780375706868,Snow,100,25
2024-01-07,9780441013593.0,Dune,200,100
2024-01-08,9780375706868,Snow,-5,30
garbage,9780375706868,Snow,10,31
";

fn write_fixtures(dir: &Path) -> ReportConfig {
    let library = dir.join("library.csv");
    let dailies = dir.join("dailies.csv");
    fs::write(&library, LIBRARY_CSV).unwrap();
    fs::write(&dailies, DAILIES_CSV).unwrap();

    let mut config = ReportConfig::default();
    config.input.libraries = vec![LibrarySource::new("zsreglau", library)];
    config.input.dailies = dailies;
    config.output.figures = dir.join("figures");
    config.length_overrides.insert("Snow".to_string(), 463);
    config.table.title_truncate_length = 20;
    config
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_report_for_every_year() {
    let tmp = TempDir::new().unwrap();
    let config = write_fixtures(tmp.path());

    let (ctx, summary) = ReportContext::load(config).unwrap();
    assert_eq!(summary.library.dropped_count(), 1);
    assert_eq!(summary.dailies.rows_read, 8);
    assert_eq!(summary.dailies.dropped_count(), 2);
    assert_eq!(ctx.years_in_log(), vec![2023, 2024]);

    let report = generate_report(&ctx, &[]).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.written(), 2 * ChartKind::ALL.len());

    let figures = tmp.path().join("figures");
    for year in [2023, 2024] {
        for kind in ChartKind::ALL {
            let path = figures.join(format!("{}.json", kind.file_stem(year)));
            assert!(path.exists(), "missing {}", path.display());
        }
    }
    let leftovers = fs::read_dir(&figures)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_heatmap_document_contents() {
    let tmp = TempDir::new().unwrap();
    let (ctx, _) = ReportContext::load(write_fixtures(tmp.path())).unwrap();
    generate_report(&ctx, &[2024]).unwrap();

    let doc = read_json(&tmp.path().join("figures/daily-pages-2024.json"));
    assert_eq!(doc["kind"], "daily_pages");
    assert_eq!(doc["data"]["type"], "heatmap");

    let cells = doc["data"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 366);
    let total: f64 = cells.iter().map(|c| c["pages"].as_f64().unwrap()).sum();
    assert_eq!(total, 1000.0);
    assert_eq!(cells.iter().filter(|c| c["annotate"] == true).count(), 4);
    assert_eq!(doc["data"]["month_ticks"].as_array().unwrap().len(), 12);
}

#[test]
fn test_books_table_snapshot() {
    let tmp = TempDir::new().unwrap();
    let (ctx, _) = ReportContext::load(write_fixtures(tmp.path())).unwrap();
    generate_report(&ctx, &[2024]).unwrap();

    let doc = read_json(&tmp.path().join("figures/books-table-2024.json"));
    let rows = doc["data"]["rows"].as_array().unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Snow", "Dune", "The Lord of the..."]);

    assert_eq!(rows[0]["pages"], 463);
    assert_eq!(rows[0]["percent_complete"], 25);
    assert_eq!(rows[1]["identifier"], "9780441013593");
    assert_eq!(rows[1]["percent_complete"], 100);
    assert_eq!(rows[1]["began"], "2024-Jan-05");
    assert_eq!(rows[1]["duration"], "3");
    assert_eq!(rows[2]["duration"], "4");
}

#[test]
fn test_pace_and_aggregates() {
    let tmp = TempDir::new().unwrap();
    let (ctx, _) = ReportContext::load(write_fixtures(tmp.path())).unwrap();
    generate_report(&ctx, &[2024]).unwrap();

    // The Fellowship has no length, so only Dune has a pace
    let pace = read_json(&tmp.path().join("figures/reading-pace-2024.json"));
    let books = pace["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["pages_per_day"], 200.0);

    let aggregates = read_json(&tmp.path().join("figures/yearly-aggregates.json"));
    let rows = aggregates.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["year"], 2024);
    assert_eq!(rows[0]["books"], 2);
    assert_eq!(rows[0]["total_pages"], 600);
}

const KINDLE_CSV: &str = "\
title,creators,ean_isbn13,length,status,began,completed,added,duration
Snow Crash,Neal Stephenson,9780553380958,480,Completed,2024-01-03,2024-01-09,,
";

#[test]
fn test_two_catalogs_feed_completed_books() {
    let tmp = TempDir::new().unwrap();
    let mut config = write_fixtures(tmp.path());
    let kindle = tmp.path().join("library_kindle.csv");
    fs::write(&kindle, KINDLE_CSV).unwrap();
    config.input.libraries.push(LibrarySource::from_path(kindle));

    let (ctx, summary) = ReportContext::load(config).unwrap();
    assert_eq!(summary.library.rows_read, 6);
    assert_eq!(ctx.library.len(), 5);
    generate_report(&ctx, &[2024]).unwrap();

    let doc = read_json(&tmp.path().join("figures/completed-books-2024.json"));
    assert_eq!(doc["data"]["type"], "completed");
    let rows = doc["data"]["rows"].as_array().unwrap();
    let tagged: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r["title"].as_str().unwrap(), r["library"].as_str().unwrap()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("Snow Crash", "kindle"),
            ("Dune", "zsreglau"),
            ("The Lord of the...", "zsreglau"),
        ]
    );
    assert_eq!(rows[0]["duration"], "7");

    let aggregates = read_json(&tmp.path().join("figures/yearly-aggregates.json"));
    assert_eq!(aggregates[0]["books"], 3);
}

#[test]
fn test_requested_year_without_data() {
    let tmp = TempDir::new().unwrap();
    let (ctx, _) = ReportContext::load(write_fixtures(tmp.path())).unwrap();

    let report = generate_report(&ctx, &[2019, 2024]).unwrap();
    assert_eq!(report.failures().count(), ChartKind::ALL.len());
    assert_eq!(report.years[1].successes().count(), ChartKind::ALL.len());
    assert!(!tmp.path().join("figures/daily-pages-2019.json").exists());
    assert!(tmp.path().join("figures/daily-pages-2024.json").exists());
}

#[test]
fn test_missing_source_fails_run() {
    let tmp = TempDir::new().unwrap();
    let mut config = write_fixtures(tmp.path());
    config.input.dailies = tmp.path().join("nope.csv");

    let err = ReportContext::load(config).unwrap_err();
    assert!(err.is_missing_source());
}

#[test]
fn test_invalid_config_fails_run() {
    let tmp = TempDir::new().unwrap();
    let mut config = write_fixtures(tmp.path());
    config.heatmap.vmax_quantile = 1.5;

    assert!(matches!(
        ReportContext::load(config),
        Err(ReportError::InvalidConfig(_))
    ));
}
