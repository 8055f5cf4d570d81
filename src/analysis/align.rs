use tracing::debug;

use super::series::{Point, PointSeries, TimedValue};

/// Pair two yearly series on matching years; `xs` supplies x and `ys` supplies y.
///
/// Every matching pair is emitted, so a year repeated within one input yields the
/// cross product of its entries. Years present in only one input are dropped. The
/// output follows the order of `xs`, with the matches from `ys` nested in their order.
pub fn zip_by_year(xs: &[TimedValue], ys: &[TimedValue]) -> PointSeries {
    let series: PointSeries = xs
        .iter()
        .flat_map(|x| {
            ys.iter()
                .filter(move |y| y.year == x.year)
                .map(move |y| Point::new(x.value, y.value))
        })
        .collect();
    if series.is_empty() && !xs.is_empty() && !ys.is_empty() {
        debug!("No overlapping years between series");
    }
    series
}
