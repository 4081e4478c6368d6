use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Values that can appear in a result row or be bound as statement parameters.
///
/// One enum covers the whole document model so helper code never needs to
/// branch on wire types:
/// ```rust
/// use partiql_middleware::prelude::*;
/// use rust_decimal::Decimal;
///
/// let params = vec![
///     RowValues::Number(Decimal::from(1)),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
///
/// Sets carry their elements untyped; homogeneity is checked when the value
/// crosses the wire boundary, dispatching on the first element's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// NULL value
    Null,
    /// Text/string value
    Text(String),
    /// Exact decimal number (no binary float rounding)
    Number(Decimal),
    /// Boolean value
    Bool(bool),
    /// Binary data
    Blob(Vec<u8>),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// Ordered list of values
    List(Vec<RowValues>),
    /// Keyed map of values (insertion order preserved, equality ignores it)
    Map(IndexMap<String, RowValues>),
    /// Set of values; must be homogeneous to cross the wire
    Set(Vec<RowValues>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Decimal> {
        if let RowValues::Number(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[RowValues]> {
        if let RowValues::List(values) = self {
            Some(values)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, RowValues>> {
        if let RowValues::Map(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&[RowValues]> {
        if let RowValues::Set(values) = self {
            Some(values)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Number(Decimal::from(value))
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}
