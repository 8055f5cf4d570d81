use std::path::PathBuf;

use clap::Parser;

/// Correlate box office gross with ratings, runtimes and stock index prices.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    // Path to the YAML configuration, created with defaults when missing
    #[arg(short, long, default_value = "config.yml", env = "CINESTAT_CONFIG")]
    pub config: PathBuf,
    // Overrides the database path from the configuration
    #[arg(short, long, env = "CINESTAT_DATABASE")]
    pub database: Option<PathBuf>,
    // Directory for log files
    #[arg(short, long, default_value = "logs")]
    pub log_dir: String,
    // Skip rendering scatter plots
    #[arg(long, default_value_t = false)]
    pub no_plots: bool,
}
