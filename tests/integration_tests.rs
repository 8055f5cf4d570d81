use cinestat::{
    analysis::{
        correlation::Classification,
        pipeline::{default_comparisons, run_analysis, AnalysisRun},
    },
    config::CinestatConfig,
    data::store::{MemoryStore, SqliteStore},
    report::{plot::plot_run, summary_csv::write_summaries_file, text::write_report_file},
    util::test_util::{sample_store, setup_test_tracing, write_fixture_database},
};
use tempfile::{tempdir, NamedTempFile};
use tracing::info;

fn run_sample(store: &MemoryStore) -> AnalysisRun {
    let config = CinestatConfig::default();
    run_analysis(store, &config, &default_comparisons()).unwrap()
}

#[test]
fn test_sample_study_end_to_end() {
    let _guards = setup_test_tracing("sample_study_end_to_end");
    let run = run_sample(&sample_store());

    assert_eq!(run.outcomes.len(), 7);
    for outcome in &run.outcomes {
        assert!(
            outcome.result.is_ok(),
            "{} failed: {:?}",
            outcome.comparison.relationship,
            outcome.result
        );
    }

    // The blockbuster is fenced out of the per-film comparisons.
    let rating_box = run.outcomes[1].result.as_ref().unwrap();
    assert_eq!(rating_box.removed, 1);
    assert_eq!(rating_box.points.len(), 8);
    assert!(rating_box.points.iter().all(|p| p.y < 1000.0));
    assert_eq!(
        rating_box.summary.classification.to_string(),
        "Very strong, Positive"
    );

    let runtime_box = run.outcomes[2].result.as_ref().unwrap();
    assert_eq!(runtime_box.removed, 1);

    // Unfiltered comparisons keep every aligned year.
    let stock_box = run.outcomes[0].result.as_ref().unwrap();
    assert_eq!(stock_box.removed, 0);
    assert_eq!(stock_box.points.len(), 3);
    assert_eq!(stock_box.points.xs(), vec![100.0, 85.0, 100.0]);

    assert_eq!(run.skipped_records, 4);
    info!("Sample study finished");
}

#[test]
fn test_yearly_rows() {
    let run = run_sample(&sample_store());
    let rows = run.report_rows();

    assert_eq!(rows.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2001, 2002, 2003, 2004]);
    assert_eq!(rows[0].box_office, 105.0);
    assert_eq!(rows[0].rating, Some(6.25));
    assert_eq!(rows[0].runtime, Some(102.5));
    assert_eq!(rows[0].stock, Some(100.0));
    assert_eq!(rows[3].rating, Some(9.0));
    assert_eq!(rows[3].box_office, 161.25);
    assert_eq!(rows[3].stock, None);
}

#[test]
fn test_sqlite_store_matches_memory_store() {
    let _guards = setup_test_tracing("sqlite_store_matches_memory_store");
    let fixture = sample_store();
    let file = NamedTempFile::new().unwrap();
    write_fixture_database(file.path(), &fixture).unwrap();
    let store = SqliteStore::open(file.path()).unwrap();

    let config = CinestatConfig::default();
    let from_sqlite = run_analysis(&store, &config, &default_comparisons()).unwrap();
    let from_memory = run_sample(&fixture);

    let sqlite_summaries: Vec<_> = from_sqlite.summaries().cloned().collect();
    let memory_summaries: Vec<_> = from_memory.summaries().cloned().collect();
    assert_eq!(sqlite_summaries.len(), 7);
    assert_eq!(sqlite_summaries, memory_summaries);
    assert_eq!(from_sqlite.report_rows(), from_memory.report_rows());
}

#[test]
fn test_custom_stock_range() {
    let config = CinestatConfig {
        stock_years: cinestat::config::YearRange {
            start_year: 2002,
            end_year: 2002,
        },
        ..Default::default()
    };
    let run = run_analysis(&sample_store(), &config, &default_comparisons()).unwrap();
    assert_eq!(run.yearly.stocks.len(), 1);
    // A single stock year cannot be fitted, the other comparisons still are.
    assert!(run.outcomes[0].result.is_err());
    assert!(run.outcomes[1].result.is_ok());
    assert_eq!(run.summaries().count(), 4);
}

#[test]
fn test_outputs_are_written() {
    let _guards = setup_test_tracing("outputs_are_written");
    let run = run_sample(&sample_store());
    let dir = tempdir().unwrap();

    let report_path = dir.path().join("data_analysis.txt");
    write_report_file(&report_path, &run).unwrap();
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(report.matches("Relationship: ").count(), 7);
    assert!(report.contains("Year: 2004"));

    let csv_path = dir.path().join("correlations.csv");
    write_summaries_file(&csv_path, run.summaries()).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(reader.records().count(), 7);

    let plots = plot_run(dir.path().join("plots"), &run).unwrap();
    assert_eq!(plots.len(), 7);
    assert!(plots.iter().all(|p| p.exists()));
}

#[test]
fn test_uncorrelated_yearly_series() {
    // Stock averages 2, 1, 1, 2 around a flat rating trend give r == 0.
    let store = MemoryStore::default()
        .with_movie(1, 2001, 1.0, "100 min", 10i64)
        .with_movie(2, 2002, 2.0, "100 min", 10i64)
        .with_movie(3, 2003, 3.0, "100 min", 10i64)
        .with_movie(4, 2004, 4.0, "100 min", 10i64)
        .with_stock("2001", 2.0)
        .with_stock("2002", 1.0)
        .with_stock("2003", 1.0)
        .with_stock("2004", 2.0);
    let run = run_analysis(&store, &CinestatConfig::default(), &default_comparisons()).unwrap();
    // Stock (x) vs rating (y)
    let analysis = run.outcomes[3].result.as_ref().unwrap();
    assert_eq!(analysis.summary.r, 0.0);
    assert_eq!(analysis.summary.classification, Classification::Uncorrelated);
}
