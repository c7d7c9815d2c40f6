//! # Compound
//!
//! Personal-finance backend: users, linked institution items, accounts and
//! transactions stored in PostgreSQL and served over HTTP, with a
//! filtered-aggregation engine that computes one statistic over a user's
//! transactions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compound::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let compound = Compound::new(&config.database).await?;
//!     compound.migrate().await?;
//!
//!     let aggregation = Aggregation::sum_abs(TransactionColumn::Amount, "total_income")?;
//!     let filters = vec![Filter::lt(TransactionColumn::Amount, 0.0)?];
//!     let total = compound.aggregates().aggregate(1, &aggregation, &filters).await?;
//!     println!("total income: {}", total);
//!
//!     compound.close().await;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod server;
pub mod telemetry;

// Re-export the main public types for convenience
pub use crate::core::Compound;
pub use errors::CompoundError;
pub use server::{AppState, router};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig};

// Re-export internal crates used by the public API
pub use finance_store;

// Re-export external dependencies used in public API
pub use sqlx;
