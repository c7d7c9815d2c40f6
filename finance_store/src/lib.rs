//! Finance store - data access layer for Compound
//!
//! Row models, the per-table stores, and the filtered-aggregation query
//! engine that compiles a validated [`Aggregation`] and its [`Filter`]s into
//! one parametrized statement scoped to a single user.

pub mod errors;
pub mod models;
pub mod prelude;
pub mod query_builder;
pub mod stores;
pub mod validation;

pub use errors::StoreError;
pub use models::{Account, Item, NewAccount, NewItem, NewTransaction, Transaction, User, UserId};
pub use query_builder::{
    compile, AggregateFunction, Aggregation, CompiledQuery, Filter, FilterOperator, FilterValue,
    SqlValue, TransactionColumn, MAX_IN_VALUES,
};
pub use stores::{
    AccountStore, AggregateStore, ItemStore, ScalarExecutor, TransactionStore, UserStore,
    MAX_FILTERS,
};
pub use validation::{ValidatedIdentifier, ValidationError};
