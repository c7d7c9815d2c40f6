//! Aggregation endpoints: the generic filtered aggregate and the
//! total-income preset

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use finance_store::{Aggregation, Filter, StoreError, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiError, AppState};

/// `{ "function": "SUM", "field": "amount", "alias": "total" }`
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationParams {
    pub function: String,
    pub field: String,
    pub alias: String,
}

/// `{ "field": "date", "operator": "BETWEEN", "value": ["2024-01-01", "2024-01-31"] }`
#[derive(Debug, Clone, Deserialize)]
pub struct FilterParams {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRequest {
    pub aggregation: AggregationParams,
    #[serde(default)]
    pub filters: Vec<FilterParams>,
}

impl AggregateRequest {
    /// Validate every part of the request into query-builder types
    pub fn into_query(self) -> Result<(Aggregation, Vec<Filter>), StoreError> {
        let AggregationParams {
            function,
            field,
            alias,
        } = self.aggregation;
        let aggregation = Aggregation::new(&function, &field, &alias)?;

        let filters = self
            .filters
            .iter()
            .map(|filter| Filter::from_json(&filter.field, &filter.operator, &filter.value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((aggregation, filters))
    }
}

#[derive(Debug, Deserialize)]
pub struct IncomeParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct TotalIncome {
    pub total_income: f64,
}

/// `POST /api/users/{id}/aggregate` → `{ "<alias>": value }`
pub async fn aggregate(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let (aggregation, filters) = request.into_query()?;
    crate::debug_log!(
        "aggregate for user {}: {} with {} filters",
        user_id,
        aggregation.describe(),
        filters.len()
    );

    let value = state
        .aggregates
        .aggregate(user_id, &aggregation, &filters)
        .await?;

    let mut body = Map::new();
    body.insert(aggregation.alias().to_string(), Value::from(value));
    Ok(Json(body))
}

pub async fn total_income(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<IncomeParams>,
) -> Result<Json<TotalIncome>, ApiError> {
    if let (Some(start), Some(end)) = (params.start_date, params.end_date) {
        if start > end {
            return Err(ApiError::BadRequest(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
    }

    let total_income = state
        .aggregates
        .total_income(user_id, params.start_date, params.end_date)
        .await?;
    Ok(Json(TotalIncome { total_income }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finance_store::{FilterOperator, FilterValue, SqlValue, TransactionColumn};
    use serde_json::json;

    fn request(body: Value) -> AggregateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_request_converts_to_typed_query() {
        let (aggregation, filters) = request(json!({
            "aggregation": { "function": "sum_abs", "field": "amount", "alias": "income" },
            "filters": [
                { "field": "amount", "operator": "<", "value": 0 },
                { "field": "date", "operator": "BETWEEN", "value": ["2024-01-01", "2024-01-31"] },
                { "field": "category", "operator": "IN", "value": ["INCOME", "TRANSFER_IN"] }
            ]
        }))
        .into_query()
        .unwrap();

        assert_eq!(aggregation.describe(), "SUM_ABS(amount) AS income");
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].value(), &FilterValue::Single(SqlValue::Float(0.0)));
        assert_eq!(filters[1].operator(), FilterOperator::Between);
        assert!(matches!(
            filters[1].value(),
            FilterValue::Pair(SqlValue::Date(_), SqlValue::Date(_))
        ));
        assert_eq!(filters[2].column(), TransactionColumn::Category);
        assert_eq!(filters[2].value().len(), 2);
    }

    #[test]
    fn test_filters_are_optional() {
        let (_, filters) = request(json!({
            "aggregation": { "function": "COUNT", "field": "id", "alias": "n" }
        }))
        .into_query()
        .unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_invalid_parts_rejected() {
        let err = request(json!({
            "aggregation": { "function": "SUM", "field": "amount", "alias": "total" },
            "filters": [{ "field": "\"; DROP TABLE users; --", "operator": "=", "value": 1 }]
        }))
        .into_query()
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilter(_)));

        let err = request(json!({
            "aggregation": { "function": "SUM", "field": "amount", "alias": "total" },
            "filters": [{ "field": "amount", "operator": "BETWEEN", "value": [1, 2, 3] }]
        }))
        .into_query()
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilter(_)));

        let err = request(json!({
            "aggregation": { "function": "MEDIAN", "field": "amount", "alias": "total" }
        }))
        .into_query()
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidAggregation(_)));
    }
}
