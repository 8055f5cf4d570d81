use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::{info, instrument};

use crate::{
    analysis::pipeline::{AnalysisRun, YearlyReportRow},
    error::CinestatError,
};

const HEADER: &str = "Analysis on Academy-Award Winning films box office gross, ratings, runtime, and US stock market performance for the 2000s";

fn or_unavailable(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

fn dollars(value: Option<f64>) -> String {
    value
        .map(|v| format!("${}", v))
        .unwrap_or_else(|| "unavailable".to_string())
}

fn write_year<W: Write>(writer: &mut W, row: &YearlyReportRow) -> std::io::Result<()> {
    writeln!(writer, "Year: {}", row.year)?;
    writeln!(writer, "Average box office gross: ${}", row.box_office)?;
    writeln!(
        writer,
        "Average movie rating out of 10: {} on IMDB",
        or_unavailable(row.rating)
    )?;
    writeln!(
        writer,
        "Average movie runtime: {} minutes",
        or_unavailable(row.runtime)
    )?;
    writeln!(
        writer,
        "Average stock market price: {}\n",
        dollars(row.stock)
    )
}

/// Writes the yearly averages followed by every correlation of the run.
pub fn write_report<W: Write>(writer: &mut W, run: &AnalysisRun) -> Result<(), CinestatError> {
    writeln!(writer, "{}\n", HEADER)?;

    writeln!(
        writer,
        "Average box office gross, movie rating, runtime, and stock market price per year:"
    )?;
    for row in run.report_rows() {
        write_year(writer, &row)?;
    }

    writeln!(writer, "Correlation data:")?;
    for outcome in &run.outcomes {
        match &outcome.result {
            Ok(analysis) => {
                let summary = &analysis.summary;
                writeln!(writer, "Relationship: {}", summary.relationship)?;
                writeln!(writer, "Line of best fit: {}", summary.line_of_best_fit())?;
                writeln!(writer, "r value: {}", summary.r)?;
                writeln!(writer, "r^2 value: {}", summary.r_squared)?;
                writeln!(writer, "Correlation: {}\n", summary.classification)?;
            }
            Err(e) => {
                writeln!(writer, "Relationship: {}", outcome.comparison.relationship)?;
                writeln!(writer, "Not computed: {}\n", e)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[instrument(skip(run, path), fields(path = %path.as_ref().display()))]
pub fn write_report_file(path: impl AsRef<Path>, run: &AnalysisRun) -> Result<(), CinestatError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_report(&mut writer, run)?;
    info!("Report written");
    Ok(())
}
