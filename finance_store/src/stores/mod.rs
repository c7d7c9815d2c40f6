//! Database accessors, one store per table plus the aggregation executor.
//!
//! Every store holds its own clone of the pool handle; nothing here reaches for
//! a global connection.

pub mod accounts;
pub mod aggregate;
pub mod items;
pub mod transactions;
pub mod users;

pub use accounts::AccountStore;
pub use aggregate::{total_income_query, AggregateStore, ScalarExecutor, MAX_FILTERS};
pub use items::ItemStore;
pub use transactions::TransactionStore;
pub use users::UserStore;
