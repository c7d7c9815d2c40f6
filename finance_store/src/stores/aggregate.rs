//! Execution of compiled aggregation queries

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::UserId;
use crate::query_builder::{
    bind_sql_value, compile, Aggregation, CompiledQuery, Filter, TransactionColumn,
};

/// Runs a compiled statement and returns its single scalar column.
///
/// `Ok(None)` means the statement produced no row at all.
#[async_trait]
pub trait ScalarExecutor: Send + Sync {
    async fn fetch_scalar(&self, query: &CompiledQuery) -> Result<Option<f64>, sqlx::Error>;
}

#[async_trait]
impl ScalarExecutor for PgPool {
    async fn fetch_scalar(&self, query: &CompiledQuery) -> Result<Option<f64>, sqlx::Error> {
        let mut statement = sqlx::query_scalar::<_, f64>(query.sql());
        for value in query.arguments().iter().cloned() {
            statement = bind_sql_value!(statement, value);
        }
        statement.fetch_optional(self).await
    }
}

/// Most filters one aggregation may combine. With
/// [`MAX_IN_VALUES`](crate::query_builder::filter::MAX_IN_VALUES) per list
/// this keeps a statement well under the Postgres limit of 65535 arguments.
pub const MAX_FILTERS: usize = 32;

/// Aggregation over one user's transactions
#[derive(Debug, Clone)]
pub struct AggregateStore<E = PgPool> {
    executor: E,
    query_timeout: Duration,
}

impl<E: ScalarExecutor> AggregateStore<E> {
    pub fn new(executor: E, query_timeout: Duration) -> Self {
        Self {
            executor,
            query_timeout,
        }
    }

    /// Compile and run `aggregation` over `user_id`'s transactions matching
    /// every filter. An empty match yields `0.0`.
    pub async fn aggregate(
        &self,
        user_id: UserId,
        aggregation: &Aggregation,
        filters: &[Filter],
    ) -> Result<f64, StoreError> {
        if filters.len() > MAX_FILTERS {
            return Err(StoreError::InvalidFilter(format!(
                "at most {} filters are allowed, got {}",
                MAX_FILTERS,
                filters.len()
            )));
        }

        let query = compile(user_id, aggregation, filters);

        tracing::debug!("[AGGREGATE] SQL: {}", query.sql());
        tracing::debug!("[AGGREGATE] arguments count: {}", query.arguments().len());

        let outcome = tokio::time::timeout(self.query_timeout, self.executor.fetch_scalar(&query))
            .await;

        match outcome {
            Ok(Ok(Some(value))) => Ok(value),
            Ok(Ok(None)) => Err(StoreError::NoResult(describe(aggregation, filters))),
            Ok(Err(source)) => Err(StoreError::ExecutionFailed {
                context: describe(aggregation, filters),
                source,
            }),
            Err(_) => {
                tracing::warn!(
                    "[AGGREGATE] timed out after {:?}: {}",
                    self.query_timeout,
                    describe(aggregation, filters)
                );
                Err(StoreError::QueryTimeout {
                    context: describe(aggregation, filters),
                    seconds: self.query_timeout.as_secs(),
                })
            }
        }
    }

    /// Sum of absolute incoming amounts (negative `amount`), optionally
    /// bounded by inclusive dates
    pub async fn total_income(
        &self,
        user_id: UserId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<f64, StoreError> {
        let (aggregation, filters) = total_income_query(start_date, end_date)?;
        self.aggregate(user_id, &aggregation, &filters).await
    }
}

/// `SUM_ABS(amount) AS total_income` over `amount < 0`, plus date bounds when given
pub fn total_income_query(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(Aggregation, Vec<Filter>), StoreError> {
    let aggregation = Aggregation::sum_abs(TransactionColumn::Amount, "total_income")?;

    let mut filters = vec![Filter::lt(TransactionColumn::Amount, 0.0)?];
    if let Some(start) = start_date {
        filters.push(Filter::gte(TransactionColumn::Date, start)?);
    }
    if let Some(end) = end_date {
        filters.push(Filter::lte(TransactionColumn::Date, end)?);
    }

    Ok((aggregation, filters))
}

/// Aggregation and filter shapes, never the bound values
fn describe(aggregation: &Aggregation, filters: &[Filter]) -> String {
    if filters.is_empty() {
        return aggregation.describe();
    }
    let filters: Vec<String> = filters.iter().map(Filter::describe).collect();
    format!("{} WHERE {}", aggregation.describe(), filters.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::SqlValue;
    use std::sync::Mutex;

    enum Reply {
        Value(f64),
        NoRow,
        Fail,
        Hang,
    }

    struct FakeExecutor {
        reply: Reply,
        seen: Mutex<Vec<CompiledQuery>>,
    }

    impl FakeExecutor {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ScalarExecutor for FakeExecutor {
        async fn fetch_scalar(&self, query: &CompiledQuery) -> Result<Option<f64>, sqlx::Error> {
            self.seen.lock().unwrap().push(query.clone());
            match self.reply {
                Reply::Value(v) => Ok(Some(v)),
                Reply::NoRow => Ok(None),
                Reply::Fail => Err(sqlx::Error::Protocol("connection reset".to_string())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(Some(0.0))
                }
            }
        }
    }

    fn store(reply: Reply) -> AggregateStore<FakeExecutor> {
        AggregateStore::new(FakeExecutor::new(reply), Duration::from_millis(50))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_aggregate_returns_scalar() {
        let store = store(Reply::Value(150.0));
        let aggregation = Aggregation::sum_abs(TransactionColumn::Amount, "total").unwrap();

        let result = store.aggregate(1, &aggregation, &[]).await.unwrap();
        assert_eq!(result, 150.0);
    }

    #[tokio::test]
    async fn test_execution_error_carries_context_not_values() {
        let store = store(Reply::Fail);
        let aggregation = Aggregation::sum(TransactionColumn::Amount, "spent").unwrap();
        let filters = vec![Filter::eq(TransactionColumn::Name, "secret merchant").unwrap()];

        match store.aggregate(1, &aggregation, &filters).await {
            Err(StoreError::ExecutionFailed { context, source }) => {
                assert_eq!(context, "SUM(amount) AS spent WHERE name = [1]");
                assert!(!context.contains("secret merchant"));
                assert!(matches!(source, sqlx::Error::Protocol(_)));
            }
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_too_many_filters_rejected_before_execution() {
        let store = store(Reply::Value(1.0));
        let aggregation = Aggregation::count(TransactionColumn::Id, "n").unwrap();
        let filters: Vec<Filter> = (0..=MAX_FILTERS as i64)
            .map(|i| Filter::ne(TransactionColumn::Id, i).unwrap())
            .collect();

        let result = store.aggregate(1, &aggregation, &filters).await;
        assert!(matches!(result, Err(StoreError::InvalidFilter(_))));
        assert!(store.executor.seen.lock().unwrap().is_empty());

        let result = store.aggregate(1, &aggregation, &filters[..MAX_FILTERS]).await;
        assert_eq!(result.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_missing_row_is_no_result() {
        let store = store(Reply::NoRow);
        let aggregation = Aggregation::count(TransactionColumn::Id, "n").unwrap();

        let result = store.aggregate(1, &aggregation, &[]).await;
        assert!(matches!(result, Err(StoreError::NoResult(_))));
    }

    #[tokio::test]
    async fn test_slow_query_times_out() {
        let store = store(Reply::Hang);
        let aggregation = Aggregation::avg(TransactionColumn::Amount, "mean").unwrap();

        match store.aggregate(1, &aggregation, &[]).await {
            Err(StoreError::QueryTimeout { context, seconds }) => {
                assert_eq!(context, "AVG(amount) AS mean");
                assert_eq!(seconds, 0);
            }
            other => panic!("Expected QueryTimeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_total_income_binds_date_bounds_in_order() {
        let store = store(Reply::Value(0.0));

        store
            .total_income(8, Some(date(2024, 1, 1)), Some(date(2024, 3, 31)))
            .await
            .unwrap();

        let seen = store.executor.seen.lock().unwrap();
        let query = &seen[0];
        assert!(query
            .sql()
            .ends_with("AND t.amount < $2 AND t.date >= $3 AND t.date <= $4"));
        assert_eq!(
            query.arguments(),
            &[
                SqlValue::Int(8),
                SqlValue::Float(0.0),
                SqlValue::Date(date(2024, 1, 1)),
                SqlValue::Date(date(2024, 3, 31)),
            ]
        );
    }

    #[test]
    fn test_total_income_query_without_dates() {
        let (aggregation, filters) = total_income_query(None, None).unwrap();
        assert_eq!(aggregation.describe(), "SUM_ABS(amount) AS total_income");
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].describe(), "amount < [1]");

        let (_, filters) = total_income_query(None, Some(date(2024, 12, 31))).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1].describe(), "date <= [1]");
    }
}
