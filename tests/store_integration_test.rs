//! Integration tests for the stores and the aggregation engine
//!
//! Run against a live PostgreSQL named by `DATABASE_URL`; every test returns
//! early when it is unset. Each test creates its own user so tests can share
//! one database.

use chrono::{NaiveDate, Utc};
use compound::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn unique(prefix: &str) -> String {
    format!(
        "{}_{}_{}_{}",
        prefix,
        std::process::id(),
        Utc::now().timestamp_micros(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn setup() -> Option<Compound> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    let compound = Compound::from_pool(pool, Duration::from_secs(10));
    compound.migrate().await.expect("Failed to migrate");
    Some(compound)
}

/// A user with one item and one account
async fn seed_account(compound: &Compound) -> (User, Account) {
    let user = compound.users().create(&unique("user")).await.unwrap();
    let item = compound
        .items()
        .create(&NewItem {
            user_id: user.id,
            plaid_access_token: unique("access"),
            plaid_item_id: unique("item"),
            plaid_institution_id: Some("ins_1".to_string()),
            status: "good".to_string(),
        })
        .await
        .unwrap();
    let account = compound
        .accounts()
        .upsert(&NewAccount {
            item_id: item.id,
            plaid_account_id: unique("account"),
            name: "Checking".to_string(),
            mask: Some("0000".to_string()),
            official_name: None,
            iso_currency_code: Some("USD".to_string()),
            unofficial_currency_code: None,
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
        })
        .await
        .unwrap();
    (user, account)
}

fn new_transaction(account_id: i32, name: &str, amount: f64, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        account_id,
        plaid_transaction_id: unique("txn"),
        plaid_category_id: None,
        category: None,
        category_data: None,
        transaction_type: "place".to_string(),
        name: name.to_string(),
        amount,
        iso_currency_code: Some("USD".to_string()),
        unofficial_currency_code: None,
        date: on,
        pending: false,
        account_owner: None,
    }
}

async fn seed_amounts(compound: &Compound, account_id: i32, rows: &[(&str, f64, NaiveDate)]) {
    for (name, amount, on) in rows {
        compound
            .transactions()
            .upsert(&new_transaction(account_id, name, *amount, *on))
            .await
            .unwrap();
    }
}

// ========================================
// Aggregation engine
// ========================================

#[tokio::test]
async fn test_total_income_sums_incoming_amounts() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    seed_amounts(
        &compound,
        account.id,
        &[
            ("Payroll", -100.0, date(2024, 1, 10)),
            ("Refund", -50.0, date(2024, 2, 10)),
            ("Groceries", 30.0, date(2024, 3, 10)),
        ],
    )
    .await;

    let aggregates = compound.aggregates();
    assert_eq!(aggregates.total_income(user.id, None, None).await.unwrap(), 150.0);
    assert_eq!(
        aggregates
            .total_income(user.id, Some(date(2024, 2, 1)), None)
            .await
            .unwrap(),
        50.0
    );
    assert_eq!(
        aggregates
            .total_income(user.id, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
            .await
            .unwrap(),
        100.0
    );
}

#[tokio::test]
async fn test_empty_match_yields_zero() {
    let Some(compound) = setup().await else { return };
    let (user, _) = seed_account(&compound).await;
    let aggregates = compound.aggregates();

    assert_eq!(aggregates.total_income(user.id, None, None).await.unwrap(), 0.0);

    for aggregation in [
        Aggregation::count(TransactionColumn::Id, "n").unwrap(),
        Aggregation::avg(TransactionColumn::Amount, "mean").unwrap(),
        Aggregation::max(TransactionColumn::Amount, "largest").unwrap(),
    ] {
        let value = aggregates.aggregate(user.id, &aggregation, &[]).await.unwrap();
        assert_eq!(value, 0.0, "{}", aggregation.describe());
    }
}

#[tokio::test]
async fn test_between_and_in_filters() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    seed_amounts(
        &compound,
        account.id,
        &[
            ("Coffee", 4.0, date(2024, 5, 1)),
            ("Lunch", 12.0, date(2024, 5, 2)),
            ("Dinner", 40.0, date(2024, 5, 3)),
            ("Rent", 1200.0, date(2024, 5, 4)),
        ],
    )
    .await;
    let aggregates = compound.aggregates();
    let count = Aggregation::count(TransactionColumn::Id, "n").unwrap();

    let between = [Filter::between(TransactionColumn::Amount, 10.0, 40.0).unwrap()];
    assert_eq!(aggregates.aggregate(user.id, &count, &between).await.unwrap(), 2.0);

    let in_names =
        [Filter::in_values(TransactionColumn::Name, ["Coffee", "Rent", "Nothing"]).unwrap()];
    let sum = Aggregation::sum(TransactionColumn::Amount, "spent").unwrap();
    assert_eq!(aggregates.aggregate(user.id, &sum, &in_names).await.unwrap(), 1204.0);

    let combined = [
        Filter::between(TransactionColumn::Date, date(2024, 5, 2), date(2024, 5, 3)).unwrap(),
        Filter::ilike(TransactionColumn::Name, "%N%").unwrap(),
    ];
    // Lunch, Dinner
    assert_eq!(aggregates.aggregate(user.id, &sum, &combined).await.unwrap(), 52.0);
}

#[tokio::test]
async fn test_other_users_are_excluded() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    let (other, other_account) = seed_account(&compound).await;
    seed_amounts(&compound, account.id, &[("Salary", -10.0, date(2024, 1, 1))]).await;
    seed_amounts(&compound, other_account.id, &[("Salary", -999.0, date(2024, 1, 1))]).await;

    let aggregates = compound.aggregates();
    assert_eq!(aggregates.total_income(user.id, None, None).await.unwrap(), 10.0);
    assert_eq!(aggregates.total_income(other.id, None, None).await.unwrap(), 999.0);
}

#[tokio::test]
async fn test_hostile_values_are_plain_data() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    let hostile = "'; DROP TABLE users; --";
    seed_amounts(&compound, account.id, &[(hostile, 7.0, date(2024, 1, 1))]).await;

    let sum = Aggregation::sum(TransactionColumn::Amount, "total").unwrap();
    let filters = [Filter::eq(TransactionColumn::Name, hostile).unwrap()];
    assert_eq!(
        compound.aggregates().aggregate(user.id, &sum, &filters).await.unwrap(),
        7.0
    );

    // still there
    assert!(compound.users().get_by_id(user.id).await.unwrap().is_some());
}

// ========================================
// CRUD accessors
// ========================================

#[tokio::test]
async fn test_user_lifecycle() {
    let Some(compound) = setup().await else { return };
    let users = compound.users();
    let username = unique("lifecycle");

    let created = users.create(&username).await.unwrap();
    assert_eq!(created.username, username);
    assert_eq!(users.get_by_id(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(
        users.get_by_username(&username).await.unwrap().map(|u| u.id),
        Some(created.id)
    );
    assert!(users.list_all().await.unwrap().iter().any(|u| u.id == created.id));

    assert!(matches!(
        users.create(&username).await,
        Err(StoreError::Conflict(_))
    ));

    users.delete_by_username(&username).await.unwrap();
    assert!(users.get_by_id(created.id).await.unwrap().is_none());
    assert!(matches!(
        users.delete_by_username(&username).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_accounts_listed_by_item_and_user() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;

    let by_item = compound.accounts().list_by_item(account.item_id).await.unwrap();
    assert_eq!(by_item, vec![account.clone()]);

    let by_user = compound.accounts().list_by_user(user.id).await.unwrap();
    assert_eq!(by_user, vec![account.clone()]);

    let items = compound.items().list_by_user(user.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, account.item_id);
    assert!(compound.items().get_by_id(account.item_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_transaction_upsert_and_category_fallback() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    let transactions = compound.transactions();

    let mut new = new_transaction(account.id, "Paycheck", -2000.0, date(2024, 4, 1));
    new.category_data = Some(json!({ "primary": "INCOME", "detailed": "INCOME_WAGES" }));
    let first = transactions.upsert(&new).await.unwrap();

    new.amount = -2100.0;
    let second = transactions.upsert(&new).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.amount, -2100.0);

    let listed = transactions.list_by_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].primary_category.as_deref(), Some("INCOME"));
    assert_eq!(listed[0].category.as_deref(), Some("INCOME"));
    assert_eq!(listed[0].name, "Paycheck");

    assert_eq!(transactions.list_by_account(account.id).await.unwrap().len(), 1);
    assert!(transactions.get_by_id(first.id).await.unwrap().is_some());

    transactions.delete_by_plaid_id(&new.plaid_transaction_id).await.unwrap();
    assert!(matches!(
        transactions.delete_by_plaid_id(&new.plaid_transaction_id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        transactions.delete(first.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_transactions_listed_newest_first() {
    let Some(compound) = setup().await else { return };
    let (user, account) = seed_account(&compound).await;
    seed_amounts(
        &compound,
        account.id,
        &[
            ("Old", 1.0, date(2023, 12, 31)),
            ("New", 2.0, date(2024, 6, 1)),
            ("Middle", 3.0, date(2024, 1, 15)),
        ],
    )
    .await;

    let names: Vec<String> = compound
        .transactions()
        .list_by_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["New", "Middle", "Old"]);
}

#[tokio::test]
async fn test_migrate_is_repeatable() {
    let Some(compound) = setup().await else { return };
    compound.migrate().await.unwrap();
    compound.health_check().await.unwrap();
}
