use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::{TableMetadata, User, UserId};

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            User::select_columns(),
            User::table_name()
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(User::table_name(), "get_by_id", e))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE username = $1",
            User::select_columns(),
            User::table_name()
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(User::table_name(), "get_by_username", e))
    }

    /// Insert a user; a taken username surfaces as [`StoreError::Conflict`]
    pub async fn create(&self, username: &str) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO {} (username, created_at, updated_at) VALUES ($1, NOW(), NOW()) \
             RETURNING {}",
            User::table_name(),
            User::select_columns()
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(User::table_name(), "create", e))
    }

    pub async fn delete_by_username(&self, username: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE username = $1", User::table_name());
        let result = sqlx::query(&sql)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(User::table_name(), "delete_by_username", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(User::table_name(), username));
        }
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id ASC",
            User::select_columns(),
            User::table_name()
        );
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(User::table_name(), "list_all", e))
    }
}
