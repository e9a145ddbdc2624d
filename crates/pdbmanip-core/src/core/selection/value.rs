use serde::Deserialize;
use std::fmt;
use std::ops::RangeInclusive;

/// A single scalar in a selection mapping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Keeps command-line text verbatim (trimmed). Numeric fields parse it
    /// on demand, so `004` stays `004` for a residue name and is `4` for a
    /// residue number.
    pub fn text(text: &str) -> Self {
        Scalar::Text(text.trim().to_string())
    }

    pub(crate) fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(_) => None,
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    pub(crate) fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// The accepted values for one field of a selection mapping.
///
/// In TOML this is either a scalar (`chain = "A"`), a list
/// (`name = ["CA", "CB"]`) or an inclusive range
/// (`res_num = { min = 10, max = 20 }`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    List(Vec<Scalar>),
    Range { min: Scalar, max: Scalar },
    Single(Scalar),
}

impl SelectionValue {
    pub fn range(min: impl Into<Scalar>, max: impl Into<Scalar>) -> Self {
        SelectionValue::Range {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for SelectionValue {
    fn from(values: Vec<T>) -> Self {
        SelectionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for SelectionValue {
    fn from(values: [T; N]) -> Self {
        SelectionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<RangeInclusive<i64>> for SelectionValue {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (min, max) = range.into_inner();
        SelectionValue::range(min, max)
    }
}

impl From<&str> for SelectionValue {
    fn from(value: &str) -> Self {
        SelectionValue::Single(value.into())
    }
}

impl From<i64> for SelectionValue {
    fn from(value: i64) -> Self {
        SelectionValue::Single(value.into())
    }
}
