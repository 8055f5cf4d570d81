use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{info, subscriber::set_default};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;

use crate::{data::store::MemoryStore, error::CinestatError};

pub struct TracingGuards {
    _subscriber_guard: tracing::subscriber::DefaultGuard,
    _worker_guard: WorkerGuard,
}

pub fn setup_test_tracing(test_name: &str) -> TracingGuards {
    let log_dir = Path::new("tests/logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).unwrap();
    }

    let log_file = format!("tests/logs/{}.log", test_name);
    let file_appender = tracing_appender::rolling::never("", &log_file);
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = fmt::Subscriber::builder()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    // Default for this thread only
    let subscriber_guard = set_default(subscriber);

    info!("-----------------");
    info!("Test: {}", test_name);
    info!("-----------------");

    TracingGuards {
        _subscriber_guard: subscriber_guard,
        _worker_guard: worker_guard,
    }
}

/// Creates the collector schema at `path` and fills it with the rows of `store`.
pub fn write_fixture_database(path: &Path, store: &MemoryStore) -> Result<(), CinestatError> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS BoxInfo (id INTEGER PRIMARY KEY, year INTEGER, box INTEGER);
         CREATE TABLE IF NOT EXISTS Movies (id INTEGER PRIMARY KEY, Rating NUMERIC, Year NUMERIC);
         CREATE TABLE IF NOT EXISTS Runtimes (id INTEGER PRIMARY KEY, Runtimes NUMERIC, Year NUMERIC);
         CREATE TABLE IF NOT EXISTS Stock (Date NUMERIC, Price NUMERIC);",
    )?;

    let tx = conn.transaction()?;
    for row in &store.box_office {
        tx.execute(
            "INSERT INTO BoxInfo (id, year, box) VALUES (?1, ?2, ?3)",
            params![row.id, row.year, row.gross],
        )?;
    }
    for row in &store.ratings {
        tx.execute(
            "INSERT INTO Movies (id, Rating, Year) VALUES (?1, ?2, ?3)",
            params![row.id, row.rating, row.year],
        )?;
    }
    for row in &store.runtimes {
        tx.execute(
            "INSERT INTO Runtimes (id, Runtimes, Year) VALUES (?1, ?2, ?3)",
            params![row.id, row.runtime, row.year],
        )?;
    }
    for row in &store.stocks {
        tx.execute(
            "INSERT INTO Stock (Date, Price) VALUES (?1, ?2)",
            params![row.date, row.price],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// A small study: ten films from 2001 to 2004 (one blockbuster, one unrated) and
/// monthly index closes for 2001 to 2003.
pub fn sample_store() -> MemoryStore {
    MemoryStore::default()
        .with_movie(1, 2001, 6.0, "101 min", 100i64)
        .with_movie(2, 2001, 6.5, "104 min", 110i64)
        .with_movie(3, 2002, 7.0, "109 min", 120i64)
        .with_movie(4, 2002, 7.5, "112 min", 130i64)
        .with_movie(5, 2003, 7.2, "121 min", 100_000i64)
        .with_movie(6, 2003, 8.0, "117 min", 140i64)
        .with_movie(7, 2004, 8.5, "124 min", 150i64)
        .with_movie(8, 2004, 9.0, "126 min", 160i64)
        .with_movie(9, 2004, 9.5, "133 min", 170i64)
        .with_movie(10, 2004, "N/A", "N/A", 165i64)
        .with_stock("2001-01-31", 105.0)
        .with_stock("2001-06-30", 95.0)
        .with_stock("2002-01-31", 90.0)
        .with_stock("2002-06-30", 80.0)
        .with_stock("2003-01-31", 95.0)
        .with_stock("2003-06-30", 105.0)
}
