//! Database migration functionality
//!
//! Idempotent schema bootstrap for the finance tables and the
//! `transactions_enriched` view.

use crate::core::Compound;
use crate::errors::CompoundError;

/// Serialises concurrent `migrate` calls (several processes or test binaries
/// starting against the same database)
const MIGRATION_LOCK_KEY: i64 = 0x636f_6d70_6f75_6e64;

/// `(step name, statement)` in dependency order
const SCHEMA: &[(&str, &str)] = &[
    (
        "create_users",
        "CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "create_items_table",
        "CREATE TABLE IF NOT EXISTS items_table (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            plaid_access_token TEXT NOT NULL,
            plaid_item_id TEXT NOT NULL UNIQUE,
            plaid_institution_id TEXT,
            status TEXT NOT NULL DEFAULT 'good',
            transactions_cursor TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "create_accounts_table",
        "CREATE TABLE IF NOT EXISTS accounts_table (
            id SERIAL PRIMARY KEY,
            item_id INTEGER NOT NULL REFERENCES items_table(id) ON DELETE CASCADE,
            plaid_account_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            mask TEXT,
            official_name TEXT,
            iso_currency_code TEXT,
            unofficial_currency_code TEXT,
            type TEXT NOT NULL,
            subtype TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "create_transactions_table",
        "CREATE TABLE IF NOT EXISTS transactions_table (
            id SERIAL PRIMARY KEY,
            account_id INTEGER NOT NULL REFERENCES accounts_table(id) ON DELETE CASCADE,
            plaid_transaction_id TEXT NOT NULL UNIQUE,
            plaid_category_id TEXT,
            category TEXT,
            category_data JSONB,
            type TEXT NOT NULL,
            name TEXT NOT NULL,
            amount DOUBLE PRECISION NOT NULL,
            iso_currency_code TEXT,
            unofficial_currency_code TEXT,
            date DATE NOT NULL,
            pending BOOLEAN NOT NULL DEFAULT FALSE,
            account_owner TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "index_items_user_id",
        "CREATE INDEX IF NOT EXISTS idx_items_table_user_id ON items_table (user_id)",
    ),
    (
        "index_accounts_item_id",
        "CREATE INDEX IF NOT EXISTS idx_accounts_table_item_id ON accounts_table (item_id)",
    ),
    (
        "index_transactions_account_id",
        "CREATE INDEX IF NOT EXISTS idx_transactions_table_account_id \
         ON transactions_table (account_id)",
    ),
    (
        "index_transactions_date",
        "CREATE INDEX IF NOT EXISTS idx_transactions_table_date ON transactions_table (date)",
    ),
    (
        "create_transactions_enriched",
        "CREATE OR REPLACE VIEW transactions_enriched AS
         SELECT
            t.id,
            t.account_id,
            t.plaid_transaction_id,
            t.plaid_category_id,
            t.category AS legacy_category,
            t.category_data->>'primary' AS primary_category,
            t.type,
            t.name AS transaction_name,
            t.amount,
            t.iso_currency_code,
            t.unofficial_currency_code,
            t.date,
            t.pending,
            t.account_owner,
            t.created_at,
            t.updated_at,
            i.user_id
         FROM transactions_table AS t
         INNER JOIN accounts_table AS a ON t.account_id = a.id
         INNER JOIN items_table AS i ON a.item_id = i.id",
    ),
];

impl Compound {
    /// Create tables, indexes and views that do not exist yet.
    ///
    /// Runs in one transaction under an advisory lock, so it is safe to call
    /// on every start.
    pub async fn migrate(&self) -> Result<(), CompoundError> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|source| CompoundError::Migration {
                step: "begin",
                source,
            })?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|source| CompoundError::Migration {
                step: "lock",
                source,
            })?;

        for &(step, sql) in SCHEMA {
            tracing::debug!("[MIGRATE] {}", step);
            sqlx::query(sql)
                .execute(&mut *tx)
                .await
                .map_err(|source| CompoundError::Migration { step, source })?;
        }

        tx.commit().await.map_err(|source| CompoundError::Migration {
            step: "commit",
            source,
        })?;

        tracing::info!("Schema is up to date ({} steps)", SCHEMA.len());
        Ok(())
    }
}
