//! Error types for the Compound crate
//!
//! This module contains the errors returned while wiring the application
//! together: connecting, migrating, loading configuration and serving.

use finance_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompoundError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Migration step '{step}' failed: {source}")]
    Migration {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
