use tracing::{debug, info, instrument};

use crate::{config::OutlierFence, error::CinestatError, util::math_utils::quantile};

use super::series::PointSeries;

/// Acceptance interval for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub lower: f64,
    pub upper: f64,
}

impl AxisBounds {
    /**
    Computes the fence `[Q_low - k * IQR, Q_high + k * IQR]` for one axis.

    ## Arguments
    * `values` - The axis values.
    * `fence` - Quantile pair and multiplier `k`.

    ## Returns
    The bounds, or `InsufficientData` if there are no values.
    */
    pub fn from_values(values: &[f64], fence: &OutlierFence) -> Result<Self, CinestatError> {
        let insufficient = || CinestatError::InsufficientData {
            got: values.len(),
            required: 1,
            context: "Cannot compute an outlier fence without finite values".to_string(),
        };
        let low = quantile(values, fence.lower_quantile).ok_or_else(insufficient)?;
        let high = quantile(values, fence.upper_quantile).ok_or_else(insufficient)?;
        let iqr = high - low;
        Ok(Self {
            lower: low - iqr * fence.multiplier,
            upper: high + iqr * fence.multiplier,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries {
    pub retained: PointSeries,
    pub removed: usize,
}

/// Drops every point whose x or y falls outside that axis' fence. Retained points keep
/// their order.
#[instrument(level = "debug", skip(series, fence), fields(points = series.len()))]
pub fn filter_outliers(
    series: &PointSeries,
    fence: &OutlierFence,
    verbose: bool,
) -> Result<FilteredSeries, CinestatError> {
    if series.is_empty() {
        return Err(CinestatError::InsufficientData {
            got: 0,
            required: 1,
            context: "Outlier filter received an empty series".to_string(),
        });
    }

    let x_bounds = AxisBounds::from_values(&series.xs(), fence)?;
    let y_bounds = AxisBounds::from_values(&series.ys(), fence)?;
    debug!(?x_bounds, ?y_bounds, "Computed outlier fences");

    let retained: PointSeries = series
        .iter()
        .filter(|p| x_bounds.contains(p.x) && y_bounds.contains(p.y))
        .copied()
        .collect();
    let removed = series.len() - retained.len();

    if verbose {
        info!("Removed {} points.", removed);
    }

    Ok(FilteredSeries { retained, removed })
}
