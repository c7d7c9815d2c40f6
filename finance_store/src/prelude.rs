//! Convenience re-exports for common finance-store usage

// Models
pub use crate::models::{
    Account, Item, NewAccount, NewItem, NewTransaction, TableMetadata, Transaction, User, UserId,
};

// Error types
pub use crate::errors::StoreError;

// Stores
pub use crate::stores::{
    AccountStore, AggregateStore, ItemStore, ScalarExecutor, TransactionStore, UserStore,
};

// Query building
pub use crate::query_builder::{
    AggregateFunction, Aggregation, Filter, FilterOperator, SqlValue, TransactionColumn,
};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use sqlx::PgPool;
