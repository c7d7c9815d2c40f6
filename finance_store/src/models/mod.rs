//! Row types for the finance tables

pub mod account;
pub mod item;
pub mod transaction;
pub mod user;

pub use account::{Account, NewAccount};
pub use item::{Item, NewItem};
pub use transaction::{NewTransaction, Transaction};
pub use user::User;

/// Primary key of `users`, and the scope of every aggregation
pub type UserId = i32;

/// Static description of the table a model is read from
pub trait TableMetadata {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// Comma-separated column list matching the model's `FromRow` fields
    fn select_columns() -> &'static str;
}
