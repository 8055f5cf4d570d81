use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use plotters::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    analysis::{
        correlation::CorrelationSummary,
        pipeline::AnalysisRun,
        series::PointSeries,
    },
    error::CinestatError,
};

const PLOT_SIZE: (u32, u32) = (1280, 720);

fn plot_error<E: Display>(e: E) -> CinestatError {
    CinestatError::PlotError(e.to_string())
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Widens an extent by 5% on each side, or by a fixed margin when it is a single value.
fn padded((min, max): (f64, f64)) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.1).max(1.0)
    };
    (min - pad, max + pad)
}

/// File name for a comparison plot, e.g. `02-individual-movie-ratings.svg`.
pub fn plot_file_name(index: usize, relationship: &str) -> String {
    let mut slug = String::new();
    for c in relationship.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
        if slug.len() >= 60 {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    format!("{:02}-{}.svg", index + 1, slug)
}

/**
Render a scatter plot of `points` with the fitted line of best fit as an SVG file.

## Arguments
* `path` - Output file.
* `points` - The points the summary was fitted on.
* `summary` - Supplies the line of best fit.
* `x_label` / `y_label` - Axis descriptions.
 */
#[instrument(skip(points, summary), fields(points = points.len()))]
pub fn plot_scatter(
    path: &Path,
    points: &PointSeries,
    summary: &CorrelationSummary,
    x_label: &str,
    y_label: &str,
) -> Result<(), CinestatError> {
    let no_points = || CinestatError::InsufficientData {
        got: points.len(),
        required: 1,
        context: format!("Nothing to plot for \"{}\"", summary.relationship),
    };
    let (x_low, x_high) = extent(&points.xs()).ok_or_else(no_points)?;
    let fit_ends = [x_low, x_high].map(|x| (x, summary.predict(x)));

    let mut ys = points.ys();
    ys.extend(fit_ends.iter().map(|(_, y)| *y));
    let (x_min, x_max) = padded((x_low, x_high));
    let (y_min, y_max) = padded(extent(&ys).ok_or_else(no_points)?);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let series_name = format!("{} vs {}", x_label, y_label);
    let mut chart = ChartBuilder::on(&root)
        .caption(&series_name, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .axis_desc_style(("sans-serif", 15).into_font())
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.x, p.y), 4, BLUE.filled())),
        )
        .map_err(plot_error)?
        .label(series_name.as_str())
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(fit_ends, &RED))
        .map_err(plot_error)?
        .label("line of best fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    debug!(path = %path.display(), "Plot rendered");
    Ok(())
}

/// Writes one plot per fitted comparison into `dir` and returns the written paths.
#[instrument(skip(run, dir), fields(dir = %dir.as_ref().display()))]
pub fn plot_run(dir: impl AsRef<Path>, run: &AnalysisRun) -> Result<Vec<PathBuf>, CinestatError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (index, outcome) in run.outcomes.iter().enumerate() {
        let Ok(analysis) = &outcome.result else {
            continue;
        };
        let path = dir.join(plot_file_name(index, &outcome.comparison.relationship));
        plot_scatter(
            &path,
            &analysis.points,
            &analysis.summary,
            &outcome.comparison.x_label,
            &outcome.comparison.y_label,
        )?;
        written.push(path);
    }
    info!("Rendered {} plots", written.len());
    Ok(written)
}
