use polars::prelude::DataType;
use std::fmt;

/// How a column's values are treated statistically.
///
/// Assigned once per column when a table is constructed, either from the
/// column's dtype or explicitly by the caller, and never re-inferred from the
/// values afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Floating-point measurements: summarized with mean/std bands and a trend line.
    Continuous,
    /// Integer counts: shown raw with a moving average, never regressed.
    Count,
    /// Anything else: passed through as point markers.
    Categorical,
}

impl ValueKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_float() {
            ValueKind::Continuous
        } else if dtype.is_integer() {
            ValueKind::Count
        } else {
            ValueKind::Categorical
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Continuous => "continuous",
            ValueKind::Count => "count",
            ValueKind::Categorical => "categorical",
        };
        f.write_str(name)
    }
}
