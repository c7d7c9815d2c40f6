//! Aggregation query compiler
//!
//! Turns an [`Aggregation`] and a flat list of [`Filter`]s into one
//! parametrized statement scoped to a single user:
//!
//! ```text
//! SELECT CAST(COALESCE(SUM(ABS(t.amount)), 0) AS DOUBLE PRECISION) AS total_income
//! FROM transactions_table AS t
//! INNER JOIN accounts_table AS a ON t.account_id = a.id
//! INNER JOIN items_table AS i ON a.item_id = i.id
//! WHERE i.user_id = $1 AND t.amount < $2 AND t.date >= $3
//! ```
//!
//! The scope predicate is always `$1`. Filter values follow in filter order,
//! one placeholder per value.

use crate::models::UserId;
use crate::query_builder::aggregation::Aggregation;
use crate::query_builder::filter::{Filter, FilterValue};
use crate::query_builder::join::{TRANSACTIONS_TABLE, USER_SCOPE_COLUMN, USER_SCOPE_JOINS};
use crate::query_builder::statement::{CompiledQuery, StatementBuilder};
use crate::query_builder::value::SqlValue;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Compile the aggregation over `user_id`'s transactions matching every filter
    pub fn compile(user_id: UserId, aggregation: &Aggregation, filters: &[Filter]) -> CompiledQuery {
        let mut statement = StatementBuilder::new();

        statement
            .push_sql("SELECT ")
            .push_sql(&Self::build_select_clause(aggregation))
            .push_sql(" FROM ")
            .push_sql(TRANSACTIONS_TABLE)
            .push_sql(" AS t");

        for join in &USER_SCOPE_JOINS {
            statement.push_sql(" ").push_sql(&join.to_sql());
        }

        statement
            .push_sql(" WHERE ")
            .push_sql(USER_SCOPE_COLUMN)
            .push_sql(" = ")
            .push_bind(SqlValue::Int(user_id.into()));

        for filter in filters {
            statement.push_sql(" AND ");
            Self::build_filter_sql(&mut statement, filter);
        }

        statement.finish()
    }

    /// `CAST(COALESCE(FUNC(t.field), 0) AS DOUBLE PRECISION) AS alias`
    ///
    /// COALESCE gives empty row sets a 0 instead of NULL; the cast makes COUNT
    /// (bigint) and SUM over integers decode as `f64` like everything else.
    fn build_select_clause(aggregation: &Aggregation) -> String {
        let column = aggregation.column().qualified();
        format!(
            "CAST(COALESCE({}, 0) AS DOUBLE PRECISION) AS {}",
            aggregation.function().to_sql(&column),
            aggregation.alias()
        )
    }

    /// Filter construction ties each operator to one value shape: BETWEEN
    /// holds a pair, IN a list, everything else a single value.
    fn build_filter_sql(statement: &mut StatementBuilder, filter: &Filter) {
        statement
            .push_sql(&filter.column().qualified())
            .push_sql(" ")
            .push_sql(filter.operator().to_sql())
            .push_sql(" ");

        match filter.value() {
            FilterValue::Single(value) => {
                statement.push_bind(value.clone());
            }
            FilterValue::Pair(low, high) => {
                statement
                    .push_bind(low.clone())
                    .push_sql(" AND ")
                    .push_bind(high.clone());
            }
            FilterValue::List(values) => {
                statement
                    .push_sql("(")
                    .push_bind_list(values.iter().cloned())
                    .push_sql(")");
            }
        }
    }
}

/// Compile an aggregation query; see [`SqlGenerator::compile`]
pub fn compile(user_id: UserId, aggregation: &Aggregation, filters: &[Filter]) -> CompiledQuery {
    SqlGenerator::compile(user_id, aggregation, filters)
}
