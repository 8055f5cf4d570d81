use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{error::CinestatError, util::math_utils::mean};

use super::series::PointSeries;

pub const MIN_REGRESSION_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "Positive"),
            Direction::Negative => write!(f, "Negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
    AlmostNonexistent,
}

impl Strength {
    /// Tiers on |r|, lower bound inclusive, checked from the top.
    pub fn from_abs_r(abs_r: f64) -> Self {
        match abs_r {
            r if r >= 0.80 => Strength::VeryStrong,
            r if r >= 0.65 => Strength::Strong,
            r if r >= 0.50 => Strength::Moderate,
            r if r >= 0.35 => Strength::Weak,
            r if r >= 0.20 => Strength::VeryWeak,
            _ => Strength::AlmostNonexistent,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::VeryStrong => "Very strong",
            Strength::Strong => "Strong",
            Strength::Moderate => "Moderate",
            Strength::Weak => "Weak",
            Strength::VeryWeak => "Very weak",
            Strength::AlmostNonexistent => "Almost nonexistent",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Uncorrelated,
    Correlated {
        strength: Strength,
        direction: Direction,
    },
}

impl Classification {
    pub fn from_r(r: f64) -> Self {
        if r == 0.0 {
            return Classification::Uncorrelated;
        }
        let direction = if r > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Classification::Correlated {
            strength: Strength::from_abs_r(r.abs()),
            direction,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Uncorrelated => write!(f, "No correlation"),
            Classification::Correlated {
                strength,
                direction,
            } => write!(f, "{}, {}", strength, direction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSummary {
    pub relationship: String,
    pub intercept: f64,
    pub slope: f64,
    pub r: f64,
    pub r_squared: f64,
    pub classification: Classification,
}

impl CorrelationSummary {
    /**
    Fit `y = intercept + slope * x` by ordinary least squares and derive Pearson's r.

    ## Arguments
    * `series` - At least two points whose x-values are not all identical.
    * `relationship` - Description of what the points compare.

    ## Returns
    The summary, `InsufficientData` for fewer than two points, or `DegenerateInput` when
    the x-values have no variance. A series with constant y has r = 0.
    */
    #[instrument(level = "debug", skip(series), fields(points = series.len()))]
    pub fn compute(series: &PointSeries, relationship: &str) -> Result<Self, CinestatError> {
        if series.len() < MIN_REGRESSION_POINTS {
            return Err(CinestatError::InsufficientData {
                got: series.len(),
                required: MIN_REGRESSION_POINTS,
                context: format!("Regression for \"{}\"", relationship),
            });
        }

        let xs = series.xs();
        let ys = series.ys();
        let (x_mean, y_mean) = match (mean(&xs), mean(&ys)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(CinestatError::InsufficientData {
                    got: 0,
                    required: MIN_REGRESSION_POINTS,
                    context: format!("Regression for \"{}\"", relationship),
                })
            }
        };

        let (mut ss_xx, mut ss_yy, mut ss_xy) = (0.0, 0.0, 0.0);
        for point in series.iter() {
            let dx = point.x - x_mean;
            let dy = point.y - y_mean;
            ss_xx += dx * dx;
            ss_yy += dy * dy;
            ss_xy += dx * dy;
        }

        if ss_xx == 0.0 || !ss_xx.is_finite() {
            return Err(CinestatError::DegenerateInput(format!(
                "All x-values are identical for \"{}\"",
                relationship
            )));
        }

        let slope = ss_xy / ss_xx;
        let intercept = y_mean - slope * x_mean;
        let r = if ss_yy == 0.0 {
            0.0
        } else {
            (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
        };
        debug!(slope, intercept, r, "Fitted line of best fit");

        Ok(Self {
            relationship: relationship.to_string(),
            intercept,
            slope,
            r,
            r_squared: r * r,
            classification: Classification::from_r(r),
        })
    }

    pub fn line_of_best_fit(&self) -> String {
        format!("{} + {}x", self.intercept, self.slope)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

impl fmt::Display for CorrelationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | y = {} | r: {:.4} | r^2: {:.4} | {}",
            self.relationship,
            self.line_of_best_fit(),
            self.r,
            self.r_squared,
            self.classification
        )
    }
}
