use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::{
    analysis::{
        aggregate::yearly_averages,
        series::{Point, PointSeries, TimedValue},
    },
    config::YearRange,
    error::CinestatError,
};

use super::{
    records::{BoxOfficeRow, FieldValue},
    store::MovieStore,
};

/// Values pulled from the store plus the number of records skipped for a missing or
/// unparseable field.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub values: T,
    pub skipped: usize,
}

impl<T> Extracted<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        Extracted {
            values: f(self.values),
            skipped: self.skipped,
        }
    }
}

/// Pair each box-office row with a measurement of the same film, in box-office order.
fn pair_with_box<F>(
    box_rows: &[BoxOfficeRow],
    measurements: &HashMap<i64, FieldValue>,
    parse: F,
) -> Extracted<PointSeries>
where
    F: Fn(&FieldValue) -> Option<f64>,
{
    let mut skipped = 0;
    let mut points = Vec::new();
    for row in box_rows {
        let Some(measurement) = measurements.get(&row.id) else {
            continue;
        };
        match (parse(measurement), row.gross.as_number()) {
            (Some(x), Some(y)) => points.push(Point::new(x, y)),
            _ => skipped += 1,
        }
    }
    Extracted {
        values: PointSeries::new(points),
        skipped,
    }
}

/// Per-film (rating, box office) points.
#[instrument(skip(store))]
pub fn rating_box_points(store: &dyn MovieStore) -> Result<Extracted<PointSeries>, CinestatError> {
    let ratings: HashMap<i64, FieldValue> = store
        .rating_rows()?
        .into_iter()
        .map(|row| (row.id, row.rating))
        .collect();
    let extracted = pair_with_box(&store.box_office_rows()?, &ratings, FieldValue::as_number);
    debug!(
        points = extracted.values.len(),
        skipped = extracted.skipped,
        "Extracted rating/box points"
    );
    Ok(extracted)
}

/// Per-film (runtime minutes, box office) points.
#[instrument(skip(store))]
pub fn runtime_box_points(store: &dyn MovieStore) -> Result<Extracted<PointSeries>, CinestatError> {
    let runtimes: HashMap<i64, FieldValue> = store
        .runtime_rows()?
        .into_iter()
        .map(|row| (row.id, row.runtime))
        .collect();
    let extracted = pair_with_box(
        &store.box_office_rows()?,
        &runtimes,
        FieldValue::as_leading_number,
    );
    debug!(
        points = extracted.values.len(),
        skipped = extracted.skipped,
        "Extracted runtime/box points"
    );
    Ok(extracted)
}

fn collect_observations<I>(rows: I) -> Extracted<Vec<(i32, f64)>>
where
    I: IntoIterator<Item = Option<(i32, f64)>>,
{
    let mut skipped = 0;
    let mut observations = Vec::new();
    for row in rows {
        match row {
            Some(observation) => observations.push(observation),
            None => skipped += 1,
        }
    }
    Extracted {
        values: observations,
        skipped,
    }
}

/// Average box office gross per release year.
#[instrument(skip(store))]
pub fn yearly_box_office(store: &dyn MovieStore) -> Result<Extracted<Vec<TimedValue>>, CinestatError> {
    let rows = store.box_office_rows()?;
    let observations = collect_observations(
        rows.iter()
            .map(|row| Some((row.year.as_year()?, row.gross.as_number()?))),
    );
    debug!(skipped = observations.skipped, "Collected box office observations");
    Ok(observations.map(yearly_averages))
}

/// Average rating per release year, for films released in `min_year` or later.
#[instrument(skip(store))]
pub fn yearly_ratings(
    store: &dyn MovieStore,
    min_year: i32,
) -> Result<Extracted<Vec<TimedValue>>, CinestatError> {
    let rows = store.rating_rows()?;
    let observations = collect_observations(
        rows.iter()
            .filter(|row| row.year.as_year().is_some_and(|year| year >= min_year))
            .map(|row| Some((row.year.as_year()?, row.rating.as_number()?))),
    );
    debug!(skipped = observations.skipped, "Collected rating observations");
    Ok(observations.map(yearly_averages))
}

/// Average runtime in minutes per release year, for films released in `min_year` or later.
#[instrument(skip(store))]
pub fn yearly_runtimes(
    store: &dyn MovieStore,
    min_year: i32,
) -> Result<Extracted<Vec<TimedValue>>, CinestatError> {
    let rows = store.runtime_rows()?;
    let observations = collect_observations(
        rows.iter()
            .filter(|row| row.year.as_year().is_some_and(|year| year >= min_year))
            .map(|row| Some((row.year.as_year()?, row.runtime.as_leading_number()?))),
    );
    debug!(skipped = observations.skipped, "Collected runtime observations");
    Ok(observations.map(yearly_averages))
}

/// Average stock price for each year of `range`, latest year first. Years without a
/// price are left out; rows outside the range are ignored.
#[instrument(skip(store))]
pub fn yearly_stock_prices(
    store: &dyn MovieStore,
    range: YearRange,
) -> Result<Extracted<Vec<TimedValue>>, CinestatError> {
    let rows = store.stock_rows()?;
    let observations = collect_observations(
        rows.iter()
            .filter(|row| row.date.as_year().is_some_and(|year| range.contains(year)))
            .map(|row| Some((row.date.as_year()?, row.price.as_number()?))),
    );
    debug!(skipped = observations.skipped, "Collected stock observations");

    Ok(observations.map(|observations| {
        let averages = yearly_averages(observations);
        range
            .descending()
            .filter_map(|year| averages.iter().find(|avg| avg.year == year).copied())
            .collect()
    }))
}
