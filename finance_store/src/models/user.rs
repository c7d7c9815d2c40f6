use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{TableMetadata, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableMetadata for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn select_columns() -> &'static str {
        "id, username, created_at, updated_at"
    }
}
