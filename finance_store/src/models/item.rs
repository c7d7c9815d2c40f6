use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{TableMetadata, UserId};

/// A linked institution connection owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub user_id: UserId,
    /// Never leaves the server
    #[serde(skip_serializing, default)]
    pub plaid_access_token: String,
    pub plaid_item_id: String,
    pub plaid_institution_id: Option<String>,
    pub status: String,
    pub transactions_cursor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableMetadata for Item {
    fn table_name() -> &'static str {
        "items_table"
    }

    fn select_columns() -> &'static str {
        "id, user_id, plaid_access_token, plaid_item_id, plaid_institution_id, status, \
         transactions_cursor, created_at, updated_at"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub user_id: UserId,
    pub plaid_access_token: String,
    pub plaid_item_id: String,
    pub plaid_institution_id: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "good".to_string()
}
