use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::{NewTransaction, TableMetadata, Transaction, UserId};

/// Reads through `transactions_enriched` so the JSONB primary category comes along
const LIST_BY_USER_SQL: &str = "SELECT id, account_id, plaid_transaction_id, plaid_category_id, \
     legacy_category AS category, primary_category, type, transaction_name AS name, amount, \
     iso_currency_code, unofficial_currency_code, date, pending, account_owner, created_at, \
     updated_at \
     FROM transactions_enriched \
     WHERE user_id = $1 \
     ORDER BY date DESC, id DESC";

#[derive(Debug, Clone)]
pub struct TransactionStore {
    pool: PgPool,
}

impl TransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh a transaction keyed by `plaid_transaction_id`.
    /// `account_id` and `date` are fixed once written.
    pub async fn upsert(&self, transaction: &NewTransaction) -> Result<Transaction, StoreError> {
        let sql = format!(
            "INSERT INTO {} (account_id, plaid_transaction_id, plaid_category_id, category, \
             category_data, type, name, amount, iso_currency_code, unofficial_currency_code, \
             date, pending, account_owner, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW(), NOW()) \
             ON CONFLICT (plaid_transaction_id) DO UPDATE SET \
             plaid_category_id = EXCLUDED.plaid_category_id, \
             category = EXCLUDED.category, \
             category_data = EXCLUDED.category_data, \
             type = EXCLUDED.type, \
             name = EXCLUDED.name, \
             amount = EXCLUDED.amount, \
             iso_currency_code = EXCLUDED.iso_currency_code, \
             unofficial_currency_code = EXCLUDED.unofficial_currency_code, \
             pending = EXCLUDED.pending, \
             account_owner = EXCLUDED.account_owner, \
             updated_at = NOW() \
             RETURNING {}",
            Transaction::table_name(),
            Transaction::select_columns()
        );
        sqlx::query_as::<_, Transaction>(&sql)
            .bind(transaction.account_id)
            .bind(&transaction.plaid_transaction_id)
            .bind(&transaction.plaid_category_id)
            .bind(&transaction.category)
            .bind(&transaction.category_data)
            .bind(&transaction.transaction_type)
            .bind(&transaction.name)
            .bind(transaction.amount)
            .bind(&transaction.iso_currency_code)
            .bind(&transaction.unofficial_currency_code)
            .bind(transaction.date)
            .bind(transaction.pending)
            .bind(&transaction.account_owner)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Transaction::table_name(), "upsert", e))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Transaction>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            Transaction::select_columns(),
            Transaction::table_name()
        );
        sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Transaction::table_name(), "get_by_id", e))
    }

    pub async fn list_by_account(&self, account_id: i32) -> Result<Vec<Transaction>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE account_id = $1 ORDER BY date DESC, id DESC",
            Transaction::select_columns(),
            Transaction::table_name()
        );
        sqlx::query_as::<_, Transaction>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                StoreError::database_operation(Transaction::table_name(), "list_by_account", e)
            })
    }

    /// Newest first, with `category` falling back to the primary category
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query_as::<_, Transaction>(LIST_BY_USER_SQL)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                StoreError::database_operation("transactions_enriched", "list_by_user", e)
            })?;

        Ok(rows
            .into_iter()
            .map(Transaction::with_category_fallback)
            .collect())
    }

    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Transaction::table_name());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database_operation(Transaction::table_name(), "delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Transaction::table_name(), id));
        }
        Ok(())
    }

    pub async fn delete_by_plaid_id(&self, plaid_transaction_id: &str) -> Result<(), StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE plaid_transaction_id = $1",
            Transaction::table_name()
        );
        let result = sqlx::query(&sql)
            .bind(plaid_transaction_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                StoreError::database_operation(Transaction::table_name(), "delete_by_plaid_id", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                Transaction::table_name(),
                plaid_transaction_id,
            ));
        }
        Ok(())
    }
}
