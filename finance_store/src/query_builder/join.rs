/// An `INNER JOIN table AS alias ON left = right` clause over fixed identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub table: &'static str,
    pub alias: &'static str,
    pub left_field: &'static str,
    pub right_field: &'static str,
}

impl JoinClause {
    pub const fn inner(
        table: &'static str,
        alias: &'static str,
        left_field: &'static str,
        right_field: &'static str,
    ) -> Self {
        Self {
            table,
            alias,
            left_field,
            right_field,
        }
    }

    pub fn to_sql(&self) -> String {
        format!(
            "INNER JOIN {} AS {} ON {} = {}",
            self.table, self.alias, self.left_field, self.right_field
        )
    }
}

/// Table the aggregation reads from, aliased `t`
pub const TRANSACTIONS_TABLE: &str = "transactions_table";

/// Path from a transaction to its owning user: transaction -> account -> item.
/// `i.user_id` is then compared against the scope argument.
pub const USER_SCOPE_JOINS: [JoinClause; 2] = [
    JoinClause::inner("accounts_table", "a", "t.account_id", "a.id"),
    JoinClause::inner("items_table", "i", "a.item_id", "i.id"),
];

/// Column carrying the owning user once the scope joins are applied
pub const USER_SCOPE_COLUMN: &str = "i.user_id";
