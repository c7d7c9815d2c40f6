//! Allow-list of transaction columns usable in filters and aggregations.

use std::fmt;

/// A column of `transactions_table`.
///
/// Field names arriving from callers are resolved against this enum; nothing
/// outside it can ever reach the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionColumn {
    Id,
    AccountId,
    PlaidTransactionId,
    PlaidCategoryId,
    Category,
    Type,
    Name,
    Amount,
    IsoCurrencyCode,
    UnofficialCurrencyCode,
    Date,
    Pending,
    AccountOwner,
    CreatedAt,
    UpdatedAt,
}

impl TransactionColumn {
    pub const ALL: [TransactionColumn; 15] = [
        TransactionColumn::Id,
        TransactionColumn::AccountId,
        TransactionColumn::PlaidTransactionId,
        TransactionColumn::PlaidCategoryId,
        TransactionColumn::Category,
        TransactionColumn::Type,
        TransactionColumn::Name,
        TransactionColumn::Amount,
        TransactionColumn::IsoCurrencyCode,
        TransactionColumn::UnofficialCurrencyCode,
        TransactionColumn::Date,
        TransactionColumn::Pending,
        TransactionColumn::AccountOwner,
        TransactionColumn::CreatedAt,
        TransactionColumn::UpdatedAt,
    ];

    /// Column name as it appears in the table
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionColumn::Id => "id",
            TransactionColumn::AccountId => "account_id",
            TransactionColumn::PlaidTransactionId => "plaid_transaction_id",
            TransactionColumn::PlaidCategoryId => "plaid_category_id",
            TransactionColumn::Category => "category",
            TransactionColumn::Type => "type",
            TransactionColumn::Name => "name",
            TransactionColumn::Amount => "amount",
            TransactionColumn::IsoCurrencyCode => "iso_currency_code",
            TransactionColumn::UnofficialCurrencyCode => "unofficial_currency_code",
            TransactionColumn::Date => "date",
            TransactionColumn::Pending => "pending",
            TransactionColumn::AccountOwner => "account_owner",
            TransactionColumn::CreatedAt => "created_at",
            TransactionColumn::UpdatedAt => "updated_at",
        }
    }

    /// Resolve a caller-supplied field name. Accepts the bare column name or
    /// the `t.`-qualified form; matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("t.").unwrap_or(name);
        Self::ALL.into_iter().find(|column| column.as_str() == name)
    }

    /// Column qualified with the transactions alias used by the compiler
    pub fn qualified(&self) -> String {
        format!("t.{}", self.as_str())
    }

    /// SQL type family of the column
    pub fn kind(&self) -> ColumnKind {
        match self {
            TransactionColumn::Id | TransactionColumn::AccountId => ColumnKind::Integer,
            TransactionColumn::Amount => ColumnKind::Float,
            TransactionColumn::PlaidTransactionId
            | TransactionColumn::PlaidCategoryId
            | TransactionColumn::Category
            | TransactionColumn::Type
            | TransactionColumn::Name
            | TransactionColumn::IsoCurrencyCode
            | TransactionColumn::UnofficialCurrencyCode
            | TransactionColumn::AccountOwner => ColumnKind::Text,
            TransactionColumn::Date => ColumnKind::Date,
            TransactionColumn::Pending => ColumnKind::Bool,
            TransactionColumn::CreatedAt | TransactionColumn::UpdatedAt => ColumnKind::Timestamp,
        }
    }

    /// Columns a numeric aggregate (SUM, AVG, ...) may target
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind(), ColumnKind::Integer | ColumnKind::Float)
    }

    /// Columns a LIKE / ILIKE pattern may target
    pub fn is_textual(&self) -> bool {
        self.kind() == ColumnKind::Text
    }
}

/// SQL type family of a column, used to check bound values before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Bool,
    Date,
    Timestamp,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "number",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "boolean",
            ColumnKind::Date => "date",
            ColumnKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for TransactionColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_column_round_trips_by_name() {
        for column in TransactionColumn::ALL {
            assert_eq!(TransactionColumn::from_name(column.as_str()), Some(column));
        }
    }

    #[test]
    fn test_qualified_names_resolve() {
        assert_eq!(
            TransactionColumn::from_name("t.amount"),
            Some(TransactionColumn::Amount)
        );
        assert_eq!(TransactionColumn::Amount.qualified(), "t.amount");
    }

    #[test]
    fn test_unknown_names_rejected() {
        for name in [
            "",
            "AMOUNT",
            "a.user_id",
            "category_data",
            "amount; --",
            "\"; DROP TABLE users; --",
            "amount ",
        ] {
            assert_eq!(TransactionColumn::from_name(name), None, "name: {:?}", name);
        }
    }

    #[test]
    fn test_column_kinds() {
        assert!(TransactionColumn::Amount.is_numeric());
        assert!(!TransactionColumn::Date.is_numeric());
        assert!(TransactionColumn::Name.is_textual());
        assert!(!TransactionColumn::Amount.is_textual());
        assert_eq!(TransactionColumn::Date.kind(), ColumnKind::Date);
        assert_eq!(TransactionColumn::CreatedAt.kind(), ColumnKind::Timestamp);
    }
}
