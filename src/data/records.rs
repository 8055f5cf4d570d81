use std::fmt;

/// A loosely typed cell as stored under SQLite `NUMERIC` affinity.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// Marker the collectors store when a value was not available upstream.
pub const NOT_AVAILABLE: &str = "N/A";

impl FieldValue {
    /// The cell as a finite number. Text is trimmed and parsed; `N/A`, empty and
    /// unparseable text are missing.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Null => return None,
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Real(r) => *r,
            FieldValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text == NOT_AVAILABLE {
                    return None;
                }
                text.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }

    /// The leading whitespace-separated token as a number (`"142 min"` -> 142).
    pub fn as_leading_number(&self) -> Option<f64> {
        match self {
            FieldValue::Text(text) => {
                let token = text.split_whitespace().next()?;
                FieldValue::Text(token.to_string()).as_number()
            }
            other => other.as_number(),
        }
    }

    /// The cell as a calendar year. Text labels such as `2005-03-31` resolve to their
    /// leading four-digit year.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(i) => i32::try_from(*i).ok(),
            FieldValue::Real(r) if r.fract() == 0.0 && r.is_finite() => {
                i32::try_from(*r as i64).ok()
            }
            FieldValue::Real(_) => None,
            FieldValue::Text(text) => {
                let text = text.trim();
                if let Ok(year) = text.parse::<i32>() {
                    return Some(year);
                }
                let prefix = text.get(..4)?;
                if prefix.chars().all(|c| c.is_ascii_digit()) {
                    prefix.parse().ok()
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Real(r) => write!(f, "{}", r),
            FieldValue::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Row of `BoxInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOfficeRow {
    pub id: i64,
    pub year: FieldValue,
    pub gross: FieldValue,
}

/// Row of `Movies`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub id: i64,
    pub rating: FieldValue,
    pub year: FieldValue,
}

/// Row of `Runtimes` with the release year from `Movies`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeRow {
    pub id: i64,
    pub runtime: FieldValue,
    pub year: FieldValue,
}

/// Row of `Stock`.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRow {
    pub date: FieldValue,
    pub price: FieldValue,
}
