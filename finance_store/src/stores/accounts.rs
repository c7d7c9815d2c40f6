use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::{Account, NewAccount, TableMetadata, UserId};

const LIST_BY_USER_SQL: &str = "SELECT a.id, a.item_id, a.plaid_account_id, a.name, a.mask, \
     a.official_name, a.iso_currency_code, a.unofficial_currency_code, a.type, a.subtype, \
     a.created_at, a.updated_at \
     FROM accounts_table AS a \
     INNER JOIN items_table AS i ON a.item_id = i.id \
     WHERE i.user_id = $1 \
     ORDER BY a.id ASC";

#[derive(Debug, Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh an account keyed by `plaid_account_id`
    pub async fn upsert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO {} (item_id, plaid_account_id, name, mask, official_name, \
             iso_currency_code, unofficial_currency_code, type, subtype, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) \
             ON CONFLICT (plaid_account_id) DO UPDATE SET \
             name = EXCLUDED.name, \
             mask = EXCLUDED.mask, \
             official_name = EXCLUDED.official_name, \
             iso_currency_code = EXCLUDED.iso_currency_code, \
             unofficial_currency_code = EXCLUDED.unofficial_currency_code, \
             type = EXCLUDED.type, \
             subtype = EXCLUDED.subtype, \
             updated_at = NOW() \
             RETURNING {}",
            Account::table_name(),
            Account::select_columns()
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(account.item_id)
            .bind(&account.plaid_account_id)
            .bind(&account.name)
            .bind(&account.mask)
            .bind(&account.official_name)
            .bind(&account.iso_currency_code)
            .bind(&account.unofficial_currency_code)
            .bind(&account.account_type)
            .bind(&account.subtype)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Account::table_name(), "upsert", e))
    }

    pub async fn list_by_item(&self, item_id: i32) -> Result<Vec<Account>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE item_id = $1 ORDER BY id ASC",
            Account::select_columns(),
            Account::table_name()
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Account::table_name(), "list_by_item", e))
    }

    /// Accounts across every item the user has linked
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Account>, StoreError> {
        sqlx::query_as::<_, Account>(LIST_BY_USER_SQL)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Account::table_name(), "list_by_user", e))
    }
}
