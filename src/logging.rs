use chrono::Local;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::CinestatError;

/// Sets up tracing with INFO+ to console and DEBUG+ from this crate to a file.
pub fn setup_tracing(log_dir: Option<&str>) -> Result<(NonBlocking, WorkerGuard), CinestatError> {
    let log_dir_str = log_dir.unwrap_or("logs");
    let log_dir = Path::new(log_dir_str);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();

    let file_appender = tracing_appender::rolling::never(log_dir_str, format!("{}.log", timestamp));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(EnvFilter::from_default_env().add_directive(parse_directive("INFO")?));

    // File layer: DEBUG and above only for this crate
    let file_layer = fmt::layer()
        .with_writer(non_blocking.clone())
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_filter(EnvFilter::from_default_env().add_directive(parse_directive("cinestat=DEBUG")?));

    let subscriber = Registry::default().with(console_layer).with(file_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        CinestatError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e))
    })?;

    info!("Tracing initialized. Logs will be written to console and file.");

    Ok((non_blocking, guard))
}

fn parse_directive(
    directive: &str,
) -> Result<tracing_subscriber::filter::Directive, CinestatError> {
    directive.parse().map_err(|e| {
        CinestatError::InvalidConfig(format!("Invalid log directive {}: {}", directive, e))
    })
}
