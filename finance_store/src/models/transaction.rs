use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::TableMetadata;

/// One posted or pending transaction. Negative amounts are incoming funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i32,
    pub account_id: i32,
    pub plaid_transaction_id: String,
    pub plaid_category_id: Option<String>,
    pub category: Option<String>,
    /// Only populated when read through `transactions_enriched`
    #[sqlx(default)]
    pub primary_category: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub name: String,
    pub amount: f64,
    pub iso_currency_code: Option<String>,
    pub unofficial_currency_code: Option<String>,
    pub date: NaiveDate,
    pub pending: bool,
    pub account_owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Fill an empty legacy `category` from `primary_category`
    pub fn with_category_fallback(mut self) -> Self {
        let primary = self.primary_category.as_deref().filter(|c| !c.is_empty());
        let legacy_missing = self.category.as_deref().map_or(true, str::is_empty);

        match primary {
            Some(primary) if legacy_missing => {
                self.category = Some(primary.to_string());
            }
            Some(_) => {}
            None => self.primary_category = None,
        }
        self
    }
}

impl TableMetadata for Transaction {
    fn table_name() -> &'static str {
        "transactions_table"
    }

    fn select_columns() -> &'static str {
        "id, account_id, plaid_transaction_id, plaid_category_id, category, type, name, amount, \
         iso_currency_code, unofficial_currency_code, date, pending, account_owner, created_at, \
         updated_at"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub account_id: i32,
    pub plaid_transaction_id: String,
    pub plaid_category_id: Option<String>,
    pub category: Option<String>,
    /// Raw personal-finance category object, e.g. `{"primary": "INCOME"}`
    pub category_data: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub name: String,
    pub amount: f64,
    pub iso_currency_code: Option<String>,
    pub unofficial_currency_code: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub pending: bool,
    pub account_owner: Option<String>,
}
