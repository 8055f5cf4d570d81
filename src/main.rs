use std::error::Error;

use cinestat::{
    analysis::pipeline::{default_comparisons, run_analysis},
    args::Args,
    config::CinestatConfig,
    data::store::SqliteStore,
    logging::setup_tracing,
    report::{plot::plot_run, summary_csv::write_summaries_file, text::write_report_file},
};
use clap::Parser;
use tracing::{error, info};

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (_, _guard) = setup_tracing(Some(args.log_dir.as_str()))?;

    let mut config = CinestatConfig::read_config(Some(&args.config))?;
    if let Some(database) = args.database {
        config.database = database;
    }
    info!(database = %config.database.display(), "Loaded configuration");

    let store = SqliteStore::open(&config.database)?;
    let run = run_analysis(&store, &config, &default_comparisons())?;

    let failed = run.outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        "Computed {} of {} correlations",
        run.outcomes.len() - failed,
        run.outcomes.len()
    );

    write_report_file(&config.report_path, &run)?;
    if let Some(csv_path) = &config.summary_csv {
        write_summaries_file(csv_path, run.summaries())?;
    }
    if !args.no_plots {
        if let Some(plot_dir) = &config.plot_dir {
            if let Err(e) = plot_run(plot_dir, &run) {
                error!("Failed to render plots: {}", e);
            }
        }
    }
    Ok(())
}
