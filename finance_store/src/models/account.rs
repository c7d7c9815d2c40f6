use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::TableMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i32,
    pub item_id: i32,
    pub plaid_account_id: String,
    pub name: String,
    pub mask: Option<String>,
    pub official_name: Option<String>,
    pub iso_currency_code: Option<String>,
    pub unofficial_currency_code: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableMetadata for Account {
    fn table_name() -> &'static str {
        "accounts_table"
    }

    fn select_columns() -> &'static str {
        "id, item_id, plaid_account_id, name, mask, official_name, iso_currency_code, \
         unofficial_currency_code, type, subtype, created_at, updated_at"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub item_id: i32,
    pub plaid_account_id: String,
    pub name: String,
    pub mask: Option<String>,
    pub official_name: Option<String>,
    pub iso_currency_code: Option<String>,
    pub unofficial_currency_code: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
}
