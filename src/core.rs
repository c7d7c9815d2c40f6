//! Core Compound functionality
//!
//! This module contains the main Compound struct: it owns the connection pool
//! and hands out the per-table stores built on it.

use finance_store::stores::{
    AccountStore, AggregateStore, ItemStore, TransactionStore, UserStore,
};
use sqlx::PgPool;
use std::time::Duration;

use crate::errors::CompoundError;
use config::DatabaseConfig;

/// Connection pool plus the settings the stores need
#[derive(Debug, Clone)]
pub struct Compound {
    pool: PgPool,
    query_timeout: Duration,
}

impl Compound {
    /// Create new Compound with database connection, verified with a ping
    pub async fn new(config: &DatabaseConfig) -> Result<Self, CompoundError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        let compound = Self::from_pool(pool, Duration::from_secs(config.query_timeout_seconds));
        compound.health_check().await?;

        tracing::info!(
            "Connected to database (max_connections={}, query_timeout={}s)",
            config.max_connections,
            config.query_timeout_seconds
        );
        Ok(compound)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    pub fn items(&self) -> ItemStore {
        ItemStore::new(self.pool.clone())
    }

    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.pool.clone())
    }

    pub fn transactions(&self) -> TransactionStore {
        TransactionStore::new(self.pool.clone())
    }

    pub fn aggregates(&self) -> AggregateStore {
        AggregateStore::new(self.pool.clone(), self.query_timeout)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), CompoundError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return, then close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
