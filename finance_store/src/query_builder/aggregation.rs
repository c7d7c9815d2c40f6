use crate::errors::StoreError;
use crate::query_builder::column::TransactionColumn;
use crate::validation::ValidatedIdentifier;

/// Represents SQL aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// SUM(field)
    Sum,
    /// SUM(ABS(field))
    SumAbs,
    /// COUNT(field)
    Count,
    /// AVG(field)
    Avg,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
}

impl AggregateFunction {
    /// Parse a function name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunction::Sum),
            "SUM_ABS" => Some(AggregateFunction::SumAbs),
            "COUNT" => Some(AggregateFunction::Count),
            "AVG" => Some(AggregateFunction::Avg),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::SumAbs => "SUM_ABS",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// Apply the function to an already-qualified column expression
    pub fn to_sql(&self, column: &str) -> String {
        match self {
            AggregateFunction::Sum => format!("SUM({})", column),
            AggregateFunction::SumAbs => format!("SUM(ABS({}))", column),
            AggregateFunction::Count => format!("COUNT({})", column),
            AggregateFunction::Avg => format!("AVG({})", column),
            AggregateFunction::Min => format!("MIN({})", column),
            AggregateFunction::Max => format!("MAX({})", column),
        }
    }

    /// COUNT works on any column; everything else needs a number
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggregateFunction::Count)
    }
}

/// The single statistic a query computes: `function(field) AS alias`
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    function: AggregateFunction,
    column: TransactionColumn,
    alias: ValidatedIdentifier,
}

impl Aggregation {
    /// Build an aggregation from untrusted names
    pub fn new(function: &str, field: &str, alias: &str) -> Result<Self, StoreError> {
        let function = AggregateFunction::parse(function).ok_or_else(|| {
            StoreError::InvalidAggregation(format!("unknown function {:?}", function))
        })?;
        let column = TransactionColumn::from_name(field).ok_or_else(|| {
            StoreError::InvalidAggregation(format!("unknown field {:?}", field))
        })?;
        Self::with_column(function, column, alias)
    }

    pub fn with_column(
        function: AggregateFunction,
        column: TransactionColumn,
        alias: &str,
    ) -> Result<Self, StoreError> {
        if function.requires_numeric() && !column.is_numeric() {
            return Err(StoreError::InvalidAggregation(format!(
                "{} requires a numeric field, '{}' is {}",
                function.name(),
                column,
                column.kind().as_str()
            )));
        }

        let alias = ValidatedIdentifier::new(alias)
            .map_err(|e| StoreError::InvalidAggregation(format!("invalid alias: {}", e)))?;

        Ok(Self {
            function,
            column,
            alias,
        })
    }

    pub fn sum(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::Sum, column, alias)
    }

    pub fn sum_abs(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::SumAbs, column, alias)
    }

    pub fn count(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::Count, column, alias)
    }

    pub fn avg(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::Avg, column, alias)
    }

    pub fn min(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::Min, column, alias)
    }

    pub fn max(column: TransactionColumn, alias: &str) -> Result<Self, StoreError> {
        Self::with_column(AggregateFunction::Max, column, alias)
    }

    pub fn function(&self) -> AggregateFunction {
        self.function
    }

    pub fn column(&self) -> TransactionColumn {
        self.column
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// `FUNC(field) AS alias`, for logs and error context
    pub fn describe(&self) -> String {
        format!("{}({}) AS {}", self.function.name(), self.column, self.alias)
    }
}
