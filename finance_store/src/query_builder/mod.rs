//! Aggregation query builder
//!
//! Validated building blocks (columns, operators, values, aggregate functions)
//! and the compiler that turns them into one user-scoped, parametrized
//! statement.

pub mod aggregation;
pub mod column;
pub mod filter;
pub mod join;
pub mod sql_generation;
pub mod statement;
pub mod value;


pub use aggregation::{AggregateFunction, Aggregation};
pub use column::{ColumnKind, TransactionColumn};
pub use filter::{Arity, Filter, FilterOperator, FilterValue, MAX_IN_VALUES};
pub use sql_generation::{compile, SqlGenerator};
pub use statement::CompiledQuery;
pub(crate) use value::bind_sql_value;
pub use value::SqlValue;
