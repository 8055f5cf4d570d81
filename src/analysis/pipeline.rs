use std::fmt;

use tracing::{info, instrument, warn};

use crate::{
    config::CinestatConfig,
    data::{
        extractor::{
            rating_box_points, runtime_box_points, yearly_box_office, yearly_ratings,
            yearly_runtimes, yearly_stock_prices,
        },
        store::MovieStore,
    },
    error::CinestatError,
};

use super::{
    align::zip_by_year,
    correlation::CorrelationSummary,
    outlier::filter_outliers,
    series::{PointSeries, TimedValue},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearlyMetric {
    BoxOffice,
    Rating,
    Runtime,
    Stock,
}

impl fmt::Display for YearlyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearlyMetric::BoxOffice => write!(f, "box office"),
            YearlyMetric::Rating => write!(f, "rating"),
            YearlyMetric::Runtime => write!(f, "runtime"),
            YearlyMetric::Stock => write!(f, "stock"),
        }
    }
}

/// Where the points of a comparison come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    /// Per-film rating against box office gross.
    RatingBox,
    /// Per-film runtime against box office gross.
    RuntimeBox,
    /// Two yearly averages aligned on year.
    Yearly { x: YearlyMetric, y: YearlyMetric },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub source: PointSource,
    pub filter_outliers: bool,
    pub relationship: String,
    pub x_label: String,
    pub y_label: String,
}

impl Comparison {
    pub fn new(
        source: PointSource,
        filter_outliers: bool,
        relationship: &str,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        Self {
            source,
            filter_outliers,
            relationship: relationship.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

const DJIA: &str = "Dow Jones Industrial Average by year (dollars)";

/// The seven comparisons of the box office study, in report order.
pub fn default_comparisons() -> Vec<Comparison> {
    use YearlyMetric::*;
    vec![
        Comparison::new(
            PointSource::Yearly { x: Stock, y: BoxOffice },
            false,
            "Dow Jones Industrial Average by year (dollars) vs. average box office gross by year (dollars)",
            DJIA,
            "Average box office returns of movies by year (dollars)",
        ),
        Comparison::new(
            PointSource::RatingBox,
            true,
            "Individual movie ratings (out of 10) vs. box office gross per individual movie (dollars)",
            "Individual Movie ratings (out of 10)",
            "Individual movie box office returns (dollars)",
        ),
        Comparison::new(
            PointSource::RuntimeBox,
            true,
            "Individual movie runtime (minutes) vs. box office gross per individual movie (dollars)",
            "Individual movie runtime (minutes)",
            "Individual box office returns of movies (dollars)",
        ),
        Comparison::new(
            PointSource::Yearly { x: Stock, y: Rating },
            false,
            "Dow Jones Industrial Average by year (dollars) vs. Average yearly movie ratings (out of 10)",
            DJIA,
            "Average movie ratings by year (out of 10)",
        ),
        Comparison::new(
            PointSource::Yearly { x: Stock, y: Runtime },
            false,
            "Dow Jones Industrial Average by year (dollars) vs. Average movie runtime by year (minutes)",
            DJIA,
            "Average movie runtime by year (minutes)",
        ),
        Comparison::new(
            PointSource::Yearly { x: BoxOffice, y: Rating },
            true,
            "Average box office gross by year (dollars) vs. Average Movie ratings (out of 10)",
            "Average box office returns of movies by year (dollars)",
            "Average movie ratings by year (out of 10)",
        ),
        Comparison::new(
            PointSource::Yearly { x: Runtime, y: BoxOffice },
            true,
            "Average movie runtime by year (minutes) vs. Average box office gross by year (dollars)",
            "Average movie runtime by year (minutes)",
            "Average box office gross by year (dollars)",
        ),
    ]
}

/// The four yearly aggregate series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlySeries {
    pub box_office: Vec<TimedValue>,
    pub ratings: Vec<TimedValue>,
    pub runtimes: Vec<TimedValue>,
    pub stocks: Vec<TimedValue>,
}

impl YearlySeries {
    pub fn get(&self, metric: YearlyMetric) -> &[TimedValue] {
        match metric {
            YearlyMetric::BoxOffice => &self.box_office,
            YearlyMetric::Rating => &self.ratings,
            YearlyMetric::Runtime => &self.runtimes,
            YearlyMetric::Stock => &self.stocks,
        }
    }

    /// One row per box office year, other averages joined on year.
    pub fn report_rows(&self) -> Vec<YearlyReportRow> {
        let lookup = |series: &[TimedValue], year: i32| {
            series.iter().find(|tv| tv.year == year).map(|tv| tv.value)
        };
        self.box_office
            .iter()
            .map(|tv| YearlyReportRow {
                year: tv.year,
                box_office: tv.value,
                rating: lookup(&self.ratings, tv.year),
                runtime: lookup(&self.runtimes, tv.year),
                stock: lookup(&self.stocks, tv.year),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlyReportRow {
    pub year: i32,
    pub box_office: f64,
    pub rating: Option<f64>,
    pub runtime: Option<f64>,
    pub stock: Option<f64>,
}

/// A finished correlation and the points it was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub points: PointSeries,
    pub removed: usize,
    pub summary: CorrelationSummary,
}

#[derive(Debug)]
pub struct ComparisonOutcome {
    pub comparison: Comparison,
    pub result: Result<Analysis, CinestatError>,
}

#[derive(Debug)]
pub struct AnalysisRun {
    pub yearly: YearlySeries,
    pub outcomes: Vec<ComparisonOutcome>,
    pub skipped_records: usize,
}

impl AnalysisRun {
    pub fn report_rows(&self) -> Vec<YearlyReportRow> {
        self.yearly.report_rows()
    }

    pub fn summaries(&self) -> impl Iterator<Item = &CorrelationSummary> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(|analysis| &analysis.summary)
    }
}

/**
Filter (when the comparison asks for it) and fit one point series.

## Arguments
* `points` - The raw points of the comparison.
* `comparison` - What is compared and whether outliers are removed.
* `config` - Supplies the outlier fence.

## Returns
The `Analysis`, or the structural error that made the correlation undefined.
 */
pub fn analyze(
    points: PointSeries,
    comparison: &Comparison,
    config: &CinestatConfig,
) -> Result<Analysis, CinestatError> {
    let (points, removed) = if comparison.filter_outliers {
        let filtered = filter_outliers(&points, &config.outlier_fence, config.verbose_outliers)?;
        (filtered.retained, filtered.removed)
    } else {
        (points, 0)
    };
    let summary = CorrelationSummary::compute(&points, &comparison.relationship)?;
    Ok(Analysis {
        points,
        removed,
        summary,
    })
}

/// Runs every comparison against the store. A comparison that cannot be fitted is
/// recorded with its error and the remaining comparisons still run; store errors abort.
#[instrument(skip_all, fields(comparisons = comparisons.len()))]
pub fn run_analysis(
    store: &dyn MovieStore,
    config: &CinestatConfig,
    comparisons: &[Comparison],
) -> Result<AnalysisRun, CinestatError> {
    let box_office = yearly_box_office(store)?;
    let ratings = yearly_ratings(store, config.min_movie_year)?;
    let runtimes = yearly_runtimes(store, config.min_movie_year)?;
    let stocks = yearly_stock_prices(store, config.stock_years)?;
    let rating_box = rating_box_points(store)?;
    let runtime_box = runtime_box_points(store)?;

    let skipped_records = box_office.skipped
        + ratings.skipped
        + runtimes.skipped
        + stocks.skipped
        + rating_box.skipped
        + runtime_box.skipped;
    if skipped_records > 0 {
        info!("Skipped {} records with missing fields", skipped_records);
    }

    let yearly = YearlySeries {
        box_office: box_office.values,
        ratings: ratings.values,
        runtimes: runtimes.values,
        stocks: stocks.values,
    };

    let outcomes = comparisons
        .iter()
        .map(|comparison| {
            let points = match comparison.source {
                PointSource::RatingBox => rating_box.values.clone(),
                PointSource::RuntimeBox => runtime_box.values.clone(),
                PointSource::Yearly { x, y } => zip_by_year(yearly.get(x), yearly.get(y)),
            };
            let result = analyze(points, comparison, config);
            match &result {
                Ok(analysis) => info!("{}", analysis.summary),
                Err(e) => warn!(
                    relationship = %comparison.relationship,
                    "Correlation skipped: {}", e
                ),
            }
            ComparisonOutcome {
                comparison: comparison.clone(),
                result,
            }
        })
        .collect();

    Ok(AnalysisRun {
        yearly,
        outcomes,
        skipped_records,
    })
}
