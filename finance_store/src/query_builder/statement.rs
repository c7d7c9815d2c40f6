//! Statement text plus its positional arguments, built in lockstep.

use crate::query_builder::value::SqlValue;

/// A compiled, ready-to-bind statement
///
/// Every data value lives in `arguments`; `$n` in `sql` refers to
/// `arguments[n - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    sql: String,
    arguments: Vec<SqlValue>,
}

impl CompiledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn arguments(&self) -> &[SqlValue] {
        &self.arguments
    }
}

/// Accumulates SQL fragments and bound arguments.
///
/// Placeholders are handed out only by [`StatementBuilder::push_bind`], so the
/// `$n` numbering and the argument list cannot drift apart.
#[derive(Debug, Default)]
pub(crate) struct StatementBuilder {
    sql: String,
    arguments: Vec<SqlValue>,
}

impl StatementBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append structural SQL. Callers pass only fixed text or validated
    /// identifiers.
    pub(crate) fn push_sql(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Record `value` as the next argument and append its placeholder
    pub(crate) fn push_bind(&mut self, value: SqlValue) -> &mut Self {
        self.arguments.push(value);
        let position = self.arguments.len();
        self.sql.push('$');
        self.sql.push_str(&position.to_string());
        self
    }

    /// Append `value, value, ...` as consecutive placeholders
    pub(crate) fn push_bind_list<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = SqlValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(value);
        }
        self
    }

    pub(crate) fn finish(self) -> CompiledQuery {
        CompiledQuery {
            sql: self.sql,
            arguments: self.arguments,
        }
    }
}
