use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::{Item, NewItem, TableMetadata, UserId};

#[derive(Debug, Clone)]
pub struct ItemStore {
    pool: PgPool,
}

impl ItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, item: &NewItem) -> Result<Item, StoreError> {
        let sql = format!(
            "INSERT INTO {} (user_id, plaid_access_token, plaid_item_id, plaid_institution_id, \
             status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) \
             RETURNING {}",
            Item::table_name(),
            Item::select_columns()
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(item.user_id)
            .bind(&item.plaid_access_token)
            .bind(&item.plaid_item_id)
            .bind(&item.plaid_institution_id)
            .bind(&item.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Item::table_name(), "create", e))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Item>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            Item::select_columns(),
            Item::table_name()
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Item::table_name(), "get_by_id", e))
    }

    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Item>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY id ASC",
            Item::select_columns(),
            Item::table_name()
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Item::table_name(), "list_by_user", e))
    }
}
