//! Filter predicates over transactions
//!
//! A [`Filter`] is validated once, when it is built: an unknown column, an
//! unknown operator, a wrongly-typed value or a value of the wrong arity never
//! make it to the compiler.

use serde_json::Value;
use std::fmt;

use crate::errors::StoreError;
use crate::query_builder::column::TransactionColumn;
use crate::query_builder::value::SqlValue;

/// Comparison operators accepted in a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,      // =
    Ne,      // !=
    Lt,      // <
    Lte,     // <=
    Gt,      // >
    Gte,     // >=
    Like,    // LIKE
    ILike,   // ILIKE (case insensitive)
    Between, // BETWEEN low AND high
    In,      // IN (...)
}

/// Largest list an `IN` filter may carry
pub const MAX_IN_VALUES: usize = 1000;

/// How many values an operator binds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Two,
    AtLeastOne,
}

impl FilterOperator {
    /// Parse an operator token. Symbols must match exactly; keyword operators
    /// are case-insensitive.
    pub fn parse(token: &str) -> Option<Self> {
        let op = match token {
            "=" => FilterOperator::Eq,
            "!=" => FilterOperator::Ne,
            "<" => FilterOperator::Lt,
            "<=" => FilterOperator::Lte,
            ">" => FilterOperator::Gt,
            ">=" => FilterOperator::Gte,
            other => match other.to_ascii_uppercase().as_str() {
                "LIKE" => FilterOperator::Like,
                "ILIKE" => FilterOperator::ILike,
                "BETWEEN" => FilterOperator::Between,
                "IN" => FilterOperator::In,
                _ => return None,
            },
        };
        Some(op)
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Like => "LIKE",
            FilterOperator::ILike => "ILIKE",
            FilterOperator::Between => "BETWEEN",
            FilterOperator::In => "IN",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            FilterOperator::Between => Arity::Two,
            FilterOperator::In => Arity::AtLeastOne,
            _ => Arity::One,
        }
    }

    fn is_pattern(&self) -> bool {
        matches!(self, FilterOperator::Like | FilterOperator::ILike)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// The operand of a filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Single(SqlValue),
    /// Ordered (low, high) bounds
    Pair(SqlValue, SqlValue),
    List(Vec<SqlValue>),
}

impl FilterValue {
    /// Number of placeholders this value will occupy
    pub fn len(&self) -> usize {
        match self {
            FilterValue::Single(_) => 1,
            FilterValue::Pair(_, _) => 2,
            FilterValue::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound values in placeholder order
    pub fn values(&self) -> Vec<&SqlValue> {
        match self {
            FilterValue::Single(value) => vec![value],
            FilterValue::Pair(low, high) => vec![low, high],
            FilterValue::List(values) => values.iter().collect(),
        }
    }

    /// Convert a JSON operand for `column`: scalars become `Single`, arrays
    /// become `List` (a two-element list is accepted where a pair is needed).
    pub fn from_json(value: &Value, column: TransactionColumn) -> Result<Self, StoreError> {
        let convert = |item: &Value| {
            SqlValue::from_json(item, column.kind()).ok_or_else(|| {
                StoreError::InvalidFilter(format!(
                    "value for '{}' must be a {}",
                    column,
                    column.kind().as_str()
                ))
            })
        };

        match value {
            Value::Array(items) => Ok(FilterValue::List(
                items.iter().map(convert).collect::<Result<Vec<_>, _>>()?,
            )),
            scalar => Ok(FilterValue::Single(convert(scalar)?)),
        }
    }
}

impl From<SqlValue> for FilterValue {
    fn from(value: SqlValue) -> Self {
        FilterValue::Single(value)
    }
}

/// One predicate: `field operator value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    column: TransactionColumn,
    operator: FilterOperator,
    value: FilterValue,
}

impl Filter {
    /// Build a filter from untrusted field / operator tokens
    pub fn new(field: &str, operator: &str, value: FilterValue) -> Result<Self, StoreError> {
        let column = TransactionColumn::from_name(field).ok_or_else(|| {
            StoreError::InvalidFilter(format!("unknown field {:?}", field))
        })?;
        let operator = FilterOperator::parse(operator).ok_or_else(|| {
            StoreError::InvalidFilter(format!("unknown operator {:?}", operator))
        })?;
        Self::with_column(column, operator, value)
    }

    /// Build a filter from request JSON, converting the operand with the
    /// column's type
    pub fn from_json(field: &str, operator: &str, value: &Value) -> Result<Self, StoreError> {
        let column = TransactionColumn::from_name(field).ok_or_else(|| {
            StoreError::InvalidFilter(format!("unknown field {:?}", field))
        })?;
        let value = FilterValue::from_json(value, column)?;
        Self::new(column.as_str(), operator, value)
    }

    /// Build a filter from already-typed parts, checking arity and value types
    pub fn with_column(
        column: TransactionColumn,
        operator: FilterOperator,
        value: FilterValue,
    ) -> Result<Self, StoreError> {
        let value = match (operator.arity(), value) {
            (Arity::One, value @ FilterValue::Single(_)) => value,
            (Arity::Two, value @ FilterValue::Pair(_, _)) => value,
            (Arity::Two, FilterValue::List(values)) => match <[SqlValue; 2]>::try_from(values) {
                Ok([low, high]) => FilterValue::Pair(low, high),
                Err(values) => return Err(arity_error(column, operator, values.len())),
            },
            (Arity::AtLeastOne, FilterValue::List(values)) if values.len() > MAX_IN_VALUES => {
                return Err(StoreError::InvalidFilter(format!(
                    "operator {} on '{}' accepts at most {} values, got {}",
                    operator,
                    column,
                    MAX_IN_VALUES,
                    values.len()
                )));
            }
            (Arity::AtLeastOne, value @ FilterValue::List(_)) if !value.is_empty() => value,
            (_, value) => return Err(arity_error(column, operator, value.len())),
        };

        if operator.is_pattern() && !column.is_textual() {
            return Err(StoreError::InvalidFilter(format!(
                "operator {} requires a text column, '{}' is {}",
                operator,
                column,
                column.kind().as_str()
            )));
        }

        if let Some(bad) = value.values().into_iter().find(|v| !v.fits(column.kind())) {
            return Err(StoreError::InvalidFilter(format!(
                "'{}' is a {} column, got a {} value",
                column,
                column.kind().as_str(),
                bad.type_name()
            )));
        }

        Ok(Self {
            column,
            operator,
            value,
        })
    }

    /// Equal condition
    pub fn eq(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Eq, FilterValue::Single(value.into()))
    }

    /// Not equal condition
    pub fn ne(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Ne, FilterValue::Single(value.into()))
    }

    /// Less than condition
    pub fn lt(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Lt, FilterValue::Single(value.into()))
    }

    /// Less than or equal condition
    pub fn lte(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Lte, FilterValue::Single(value.into()))
    }

    /// Greater than condition
    pub fn gt(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Gt, FilterValue::Single(value.into()))
    }

    /// Greater than or equal condition
    pub fn gte(column: TransactionColumn, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Gte, FilterValue::Single(value.into()))
    }

    /// LIKE condition, wildcards included in `pattern`
    pub fn like(column: TransactionColumn, pattern: &str) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::Like, FilterValue::Single(pattern.into()))
    }

    /// ILIKE condition (case insensitive)
    pub fn ilike(column: TransactionColumn, pattern: &str) -> Result<Self, StoreError> {
        Self::with_column(column, FilterOperator::ILike, FilterValue::Single(pattern.into()))
    }

    /// BETWEEN condition, bounds inclusive
    pub fn between(
        column: TransactionColumn,
        low: impl Into<SqlValue>,
        high: impl Into<SqlValue>,
    ) -> Result<Self, StoreError> {
        Self::with_column(
            column,
            FilterOperator::Between,
            FilterValue::Pair(low.into(), high.into()),
        )
    }

    /// IN condition
    pub fn in_values<V: Into<SqlValue>>(
        column: TransactionColumn,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, StoreError> {
        Self::with_column(
            column,
            FilterOperator::In,
            FilterValue::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn column(&self) -> TransactionColumn {
        self.column
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Shape of the filter without its values, safe for logs and errors
    pub fn describe(&self) -> String {
        format!("{} {} [{}]", self.column, self.operator, self.value.len())
    }
}

fn arity_error(column: TransactionColumn, operator: FilterOperator, got: usize) -> StoreError {
    let expected = match operator.arity() {
        Arity::One => "exactly one value",
        Arity::Two => "exactly two values (low, high)",
        Arity::AtLeastOne => "a non-empty list of values",
    };
    StoreError::InvalidFilter(format!(
        "operator {} on '{}' requires {}, got {}",
        operator, column, expected, got
    ))
}
