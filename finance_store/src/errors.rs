use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid aggregation: {0}")]
    InvalidAggregation(String),

    #[error("Aggregation query failed for {context}: {source}")]
    ExecutionFailed {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Aggregation query returned no row for {0}")]
    NoResult(String),

    #[error("Query timed out after {seconds}s for {context}")]
    QueryTimeout { context: String, seconds: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error in {table}.{operation}: {source}")]
    Database {
        table: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Wrap a sqlx error raised by a plain accessor.
    ///
    /// Unique-constraint violations become [`StoreError::Conflict`] so the HTTP
    /// layer can tell a duplicate apart from a broken connection.
    pub fn database_operation(
        table: &'static str,
        operation: &'static str,
        source: sqlx::Error,
    ) -> Self {
        if let sqlx::Error::Database(db_err) = &source {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(format!("{}: {}", table, db_err.message()));
            }
        }

        StoreError::Database {
            table,
            operation,
            source,
        }
    }

    pub fn not_found(table: &str, key: impl std::fmt::Display) -> Self {
        StoreError::NotFound(format!("{} {}", table, key))
    }

    /// True for errors the caller caused and can fix by changing the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidFilter(_) | StoreError::InvalidAggregation(_)
        )
    }
}
