use std::fmt;

use serde::Serialize;

/// One yearly aggregate (box office, rating, runtime or stock price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimedValue {
    pub year: i32,
    pub value: f64,
}

impl TimedValue {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// An unlabeled paired observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered points. Order carries no statistical meaning but is kept for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointSeries {
    points: Vec<Point>,
}

impl PointSeries {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// The same pairs with coordinates swapped.
    pub fn transposed(&self) -> Self {
        self.points.iter().map(|p| Point::new(p.y, p.x)).collect()
    }
}

impl FromIterator<Point> for PointSeries {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<(f64, f64)>> for PointSeries {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        pairs.into_iter().map(Point::from).collect()
    }
}

impl IntoIterator for PointSeries {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
