use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::stats::{AggregateStats, MonthlySummary, StatsError};

/// Transaction kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// Exclusive upper bound of a `NUMERIC(14, 2)` column
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Validate that amount is positive and fits the stored precision (whole cents)
fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive")
            .with_message("Amount must be positive.".into()));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("amount_sub_cent")
            .with_message("Amount cannot have more than 2 decimal places.".into()));
    }
    if *amount >= Decimal::new(MAX_AMOUNT_UNITS, 0) {
        return Err(ValidationError::new("amount_too_large")
            .with_message("Amount must be less than 1,000,000,000,000.".into()));
    }
    Ok(())
}

/// Categories are grouping keys, so blank labels are rejected
fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::new("category_blank"));
    }
    Ok(())
}

/// Row as stored in the `transactions` table
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub category: String,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A decoded income or expense record owned by one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StatsError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = TransactionKind::parse(&row.kind).ok_or_else(|| StatsError::UnknownKind {
            id: row.id,
            value: row.kind.clone(),
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            kind,
            category: row.category,
            amount: row.amount,
            occurred_on: row.occurred_on,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Unique transaction identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Transaction kind (income, expense)
    pub kind: TransactionKind,
    /// Category label
    #[schema(example = "Groceries")]
    pub category: String,
    /// Transaction amount (always positive)
    #[schema(value_type = String, example = "50.25")]
    pub amount: Decimal,
    /// Date the transaction took effect
    pub occurred_on: NaiveDate,
    /// Optional description
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            kind: t.kind,
            category: t.category,
            amount: t.amount,
            occurred_on: t.occurred_on,
            description: t.description,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Request body for creating a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionDto {
    /// Transaction kind
    #[serde(alias = "type")]
    pub kind: TransactionKind,

    /// Category label (trimmed, max 50 chars)
    #[validate(length(max = 50, message = "Category cannot exceed 50 characters"))]
    #[validate(custom(function = "validate_category", message = "Category is required."))]
    #[schema(example = "Groceries")]
    pub category: String,

    /// Transaction amount (must be positive)
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = String, example = "50.25")]
    pub amount: Decimal,

    /// Date of the transaction
    #[serde(alias = "date")]
    pub occurred_on: NaiveDate,

    /// Optional description (max 200 chars)
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
}

/// Request body for updating a transaction (all fields optional)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionDto {
    /// Transaction kind
    #[serde(alias = "type")]
    pub kind: Option<TransactionKind>,

    /// Category label
    #[validate(length(max = 50, message = "Category cannot exceed 50 characters"))]
    #[validate(custom(function = "validate_category", message = "Category is required."))]
    pub category: Option<String>,

    /// Transaction amount
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = Option<String>, example = "75.00")]
    pub amount: Option<Decimal>,

    /// Transaction date
    #[serde(alias = "date")]
    pub occurred_on: Option<NaiveDate>,

    /// Description
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    pub description: Option<String>,
}

/// Query parameters for listing transactions
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    /// Only this kind (income, expense)
    pub kind: Option<TransactionKind>,
    /// Earliest date, inclusive
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive
    pub to: Option<NaiveDate>,
}

impl TransactionFilters {
    pub fn validate_range(&self) -> Result<(), ValidationError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(ValidationError::new("invalid_date_range")
                .with_message("'from' must not be after 'to'".into())),
            _ => Ok(()),
        }
    }
}

/// Query parameters for the monthly summary
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct MonthlySummaryQuery {
    /// Restrict the histogram to one calendar year. Omit to merge all years.
    #[validate(range(min = 1900, max = 9999, message = "Year must be between 1900 and 9999"))]
    #[param(example = 2025)]
    pub year: Option<i32>,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponseBody {
    pub success: bool,
    pub transaction: TransactionResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<TransactionResponse>,
}

/// Totals over all of the caller's transactions
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatsResponse {
    pub success: bool,
    #[schema(value_type = String, example = "2000")]
    pub total_income: Decimal,
    #[schema(value_type = String, example = "900")]
    pub total_expense: Decimal,
    #[schema(value_type = String, example = "1100")]
    pub balance: Decimal,
    /// Summed amount per category, income and expense combined
    #[schema(value_type = Object)]
    pub category_summary: BTreeMap<String, Decimal>,
    #[schema(example = 2)]
    pub transaction_count: usize,
}

impl From<AggregateStats> for TransactionStatsResponse {
    fn from(stats: AggregateStats) -> Self {
        Self {
            success: true,
            total_income: stats.total_income,
            total_expense: stats.total_expense,
            balance: stats.balance,
            category_summary: stats.category_totals,
            transaction_count: stats.transaction_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryResponse {
    pub success: bool,
    /// Keys "Jan" through "Dec" in calendar order, each `{income, expense}`
    #[schema(value_type = Object)]
    pub monthly_summary: MonthlySummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(kind: &str) -> TransactionRow {
        TransactionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: kind.to_string(),
            category: "Rent".to_string(),
            amount: Decimal::new(90000, 2),
            occurred_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_round_trips_through_text() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::parse("transfer"), None);
        assert_eq!(TransactionKind::parse("Income"), None);
    }

    #[test]
    fn test_row_with_known_kind_decodes() {
        let transaction = Transaction::try_from(row("expense")).expect("Should decode");
        assert_eq!(transaction.kind, TransactionKind::Expense);
    }

    #[test]
    fn test_row_with_unknown_kind_is_rejected() {
        let result = Transaction::try_from(row("refund"));
        assert!(matches!(result, Err(StatsError::UnknownKind { value, .. }) if value == "refund"));
    }

    #[test]
    fn test_create_dto_accepts_legacy_field_names() {
        let dto: CreateTransactionDto = serde_json::from_value(json!({
            "type": "income",
            "category": "Salary",
            "amount": 2000,
            "date": "2025-01-01"
        }))
        .expect("Should deserialize");

        assert_eq!(dto.kind, TransactionKind::Income);
        assert_eq!(dto.amount, Decimal::from(2000));
        assert_eq!(dto.occurred_on, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_unknown_kind() {
        let result = serde_json::from_value::<CreateTransactionDto>(json!({
            "kind": "transfer",
            "category": "Salary",
            "amount": 10,
            "occurredOn": "2025-01-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_dto_rejects_non_positive_amount() {
        let dto: CreateTransactionDto = serde_json::from_value(json!({
            "kind": "expense",
            "category": "Food",
            "amount": 0,
            "occurredOn": "2025-01-01"
        }))
        .unwrap();

        let err = dto.validate().expect_err("Zero amount should fail");
        assert!(err.to_string().contains("Amount must be positive."));
    }

    fn create_with_amount(amount: &str) -> CreateTransactionDto {
        serde_json::from_value(json!({
            "kind": "income",
            "category": "Salary",
            "amount": amount,
            "occurredOn": "2025-01-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_dto_rejects_sub_cent_amounts() {
        for amount in ["0.001", "0.004", "12.345"] {
            let err = create_with_amount(amount)
                .validate()
                .expect_err("Sub-cent amount should fail");
            assert!(err.to_string().contains("2 decimal places"), "{amount}");
        }
    }

    #[test]
    fn test_create_dto_rejects_amounts_beyond_column_precision() {
        for amount in ["123456789012345678.00", "1000000000000"] {
            let err = create_with_amount(amount)
                .validate()
                .expect_err("Oversized amount should fail");
            assert!(err.to_string().contains("less than"), "{amount}");
        }
    }

    #[test]
    fn test_create_dto_accepts_cent_precision_bounds() {
        for amount in ["0.01", "12.50", "12.500", "999999999999.99"] {
            assert!(create_with_amount(amount).validate().is_ok(), "{amount}");
        }
    }

    #[test]
    fn test_update_dto_rejects_sub_cent_amount() {
        let dto = UpdateTransactionDto {
            amount: Some(Decimal::new(4, 3)),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_rejects_blank_category() {
        let dto: CreateTransactionDto = serde_json::from_value(json!({
            "kind": "expense",
            "category": "   ",
            "amount": "5.00",
            "occurredOn": "2025-01-01"
        }))
        .unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_validates_only_present_fields() {
        let dto = UpdateTransactionDto {
            description: Some("Updated".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateTransactionDto {
            amount: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_filters_reject_inverted_range() {
        let filters = TransactionFilters {
            from: NaiveDate::from_ymd_opt(2025, 6, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        };
        assert!(filters.validate_range().is_err());

        let filters = TransactionFilters {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        };
        assert!(filters.validate_range().is_ok());
    }

    #[test]
    fn test_monthly_summary_query_bounds_year() {
        assert!(MonthlySummaryQuery { year: Some(2025) }.validate().is_ok());
        assert!(MonthlySummaryQuery { year: Some(12) }.validate().is_err());
        assert!(MonthlySummaryQuery { year: None }.validate().is_ok());
    }
}
