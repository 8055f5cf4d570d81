use std::{io::Write, path::Path};

use serde::Serialize;
use tracing::{info, instrument};

use crate::{analysis::correlation::CorrelationSummary, error::CinestatError};

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    relationship: &'a str,
    intercept: f64,
    slope: f64,
    r: f64,
    r_squared: f64,
    correlation: String,
}

impl<'a> From<&'a CorrelationSummary> for SummaryRecord<'a> {
    fn from(summary: &'a CorrelationSummary) -> Self {
        Self {
            relationship: &summary.relationship,
            intercept: summary.intercept,
            slope: summary.slope,
            r: summary.r,
            r_squared: summary.r_squared,
            correlation: summary.classification.to_string(),
        }
    }
}

/// Writes one CSV row per summary, with a header row.
pub fn write_summaries<'a, W, I>(writer: W, summaries: I) -> Result<(), CinestatError>
where
    W: Write,
    I: IntoIterator<Item = &'a CorrelationSummary>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(SummaryRecord::from(summary))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[instrument(skip(summaries, path), fields(path = %path.as_ref().display()))]
pub fn write_summaries_file<'a, I>(path: impl AsRef<Path>, summaries: I) -> Result<(), CinestatError>
where
    I: IntoIterator<Item = &'a CorrelationSummary>,
{
    let file = std::fs::File::create(path.as_ref())?;
    write_summaries(file, summaries)?;
    info!("Correlation summaries exported");
    Ok(())
}
