//! Typed values bound to statement placeholders.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::query_builder::column::ColumnKind;

/// A single value bound to one positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Whether this value may be compared against a column of `kind`
    pub fn fits(&self, kind: ColumnKind) -> bool {
        matches!(
            (self, kind),
            (SqlValue::Int(_), ColumnKind::Integer)
                | (SqlValue::Int(_), ColumnKind::Float)
                | (SqlValue::Float(_), ColumnKind::Float)
                | (SqlValue::Text(_), ColumnKind::Text)
                | (SqlValue::Bool(_), ColumnKind::Bool)
                | (SqlValue::Date(_), ColumnKind::Date)
                | (SqlValue::Timestamp(_), ColumnKind::Timestamp)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Int(_) => "integer",
            SqlValue::Float(_) => "number",
            SqlValue::Text(_) => "text",
            SqlValue::Bool(_) => "boolean",
            SqlValue::Date(_) => "date",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Convert a JSON scalar into the value type expected by a column.
    ///
    /// Dates are `YYYY-MM-DD`, timestamps RFC 3339. Returns `None` when the
    /// JSON value cannot represent the column's type.
    pub fn from_json(value: &Value, kind: ColumnKind) -> Option<Self> {
        match (value, kind) {
            (Value::Number(n), ColumnKind::Integer) => n.as_i64().map(SqlValue::Int),
            (Value::Number(n), ColumnKind::Float) => n.as_f64().map(SqlValue::Float),
            (Value::String(s), ColumnKind::Text) => Some(SqlValue::Text(s.clone())),
            (Value::Bool(b), ColumnKind::Bool) => Some(SqlValue::Bool(*b)),
            (Value::String(s), ColumnKind::Date) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(SqlValue::Date),
            (Value::String(s), ColumnKind::Timestamp) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| SqlValue::Timestamp(dt.with_timezone(&Utc))),
            _ => None,
        }
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

/// Bind a [`SqlValue`] onto any sqlx query type (`Query`, `QueryAs`, `QueryScalar`)
macro_rules! bind_sql_value {
    ($query:expr, $value:expr) => {
        match $value {
            $crate::query_builder::SqlValue::Int(i) => $query.bind(i),
            $crate::query_builder::SqlValue::Float(f) => $query.bind(f),
            $crate::query_builder::SqlValue::Text(s) => $query.bind(s),
            $crate::query_builder::SqlValue::Bool(b) => $query.bind(b),
            $crate::query_builder::SqlValue::Date(d) => $query.bind(d),
            $crate::query_builder::SqlValue::Timestamp(ts) => $query.bind(ts),
        }
    };
}

pub(crate) use bind_sql_value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_uses_column_kind() {
        assert_eq!(
            SqlValue::from_json(&json!(-12.5), ColumnKind::Float),
            Some(SqlValue::Float(-12.5))
        );
        assert_eq!(
            SqlValue::from_json(&json!(0), ColumnKind::Float),
            Some(SqlValue::Float(0.0))
        );
        assert_eq!(
            SqlValue::from_json(&json!(42), ColumnKind::Integer),
            Some(SqlValue::Int(42))
        );
        assert_eq!(
            SqlValue::from_json(&json!("2024-01-01"), ColumnKind::Date),
            NaiveDate::from_ymd_opt(2024, 1, 1).map(SqlValue::Date)
        );
        // a date-looking string stays text on a text column
        assert_eq!(
            SqlValue::from_json(&json!("2024-01-01"), ColumnKind::Text),
            Some(SqlValue::Text("2024-01-01".to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_mismatches() {
        assert_eq!(SqlValue::from_json(&json!("abc"), ColumnKind::Float), None);
        assert_eq!(SqlValue::from_json(&json!(1.5), ColumnKind::Integer), None);
        assert_eq!(SqlValue::from_json(&json!("01/02/2024"), ColumnKind::Date), None);
        assert_eq!(SqlValue::from_json(&json!(null), ColumnKind::Text), None);
        assert_eq!(SqlValue::from_json(&json!([1, 2]), ColumnKind::Integer), None);
    }

    #[test]
    fn test_timestamp_normalised_to_utc() {
        let value = SqlValue::from_json(&json!("2024-03-01T10:00:00+02:00"), ColumnKind::Timestamp);
        match value {
            Some(SqlValue::Timestamp(ts)) => assert_eq!(ts.to_rfc3339(), "2024-03-01T08:00:00+00:00"),
            other => panic!("Expected timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_fits() {
        assert!(SqlValue::Int(0).fits(ColumnKind::Float));
        assert!(!SqlValue::Float(0.5).fits(ColumnKind::Integer));
        assert!(!SqlValue::Text("x".to_string()).fits(ColumnKind::Date));
    }
}
