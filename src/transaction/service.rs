use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::models::{
    CreateTransactionDto, Transaction, TransactionFilters, TransactionRow, UpdateTransactionDto,
};
use super::stats::{compute_aggregate_stats, compute_monthly_summary, AggregateStats, MonthlySummary};
use crate::errors::AppError;

/// Service layer for transaction business logic.
pub struct TransactionService;

/// Trimmed text, with blank input treated as absent
fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Blank or missing update text keeps the stored description
fn merge_description(update: Option<String>, existing: Option<String>) -> Option<String> {
    clean_description(update).or(existing)
}

fn decode_rows(rows: Vec<TransactionRow>) -> Result<Vec<Transaction>, AppError> {
    rows.into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
}

impl TransactionService {
    /// List the user's transactions, newest first
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, kind, category, amount, occurred_on, description,
                   created_at, updated_at
            FROM transactions
            WHERE user_id = $1
              AND ($2::text IS NULL OR kind = $2)
              AND ($3::date IS NULL OR occurred_on >= $3)
              AND ($4::date IS NULL OR occurred_on <= $4)
            ORDER BY occurred_on DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filters.kind.map(|k| k.as_str()))
        .bind(filters.from)
        .bind(filters.to)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        decode_rows(rows)
    }

    /// Every transaction owned by the user, optionally restricted to one
    /// calendar year. Order is not significant to the aggregations.
    pub async fn fetch_for_aggregation(
        pool: &PgPool,
        user_id: Uuid,
        year: Option<i32>,
    ) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, kind, category, amount, occurred_on, description,
                   created_at, updated_at
            FROM transactions
            WHERE user_id = $1
              AND ($2::int IS NULL OR EXTRACT(YEAR FROM occurred_on)::int = $2)
            "#,
        )
        .bind(user_id)
        .bind(year)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        debug!(%user_id, count = rows.len(), "Loaded transactions for aggregation");
        decode_rows(rows)
    }

    /// Totals, balance and category breakdown for the user
    pub async fn get_stats(pool: &PgPool, user_id: Uuid) -> Result<AggregateStats, AppError> {
        let transactions = Self::fetch_for_aggregation(pool, user_id, None).await?;
        Ok(compute_aggregate_stats(&transactions)?)
    }

    /// Twelve-month income/expense histogram for the user
    pub async fn get_monthly_summary(
        pool: &PgPool,
        user_id: Uuid,
        year: Option<i32>,
    ) -> Result<MonthlySummary, AppError> {
        let transactions = Self::fetch_for_aggregation(pool, user_id, year).await?;
        Ok(compute_monthly_summary(&transactions)?)
    }

    /// Create a transaction owned by the user
    pub async fn create_transaction(
        pool: &PgPool,
        user_id: Uuid,
        dto: CreateTransactionDto,
    ) -> Result<Transaction, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (user_id, kind, category, amount, occurred_on, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, kind, category, amount, occurred_on, description,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(dto.kind.as_str())
        .bind(dto.category.trim())
        .bind(dto.amount)
        .bind(dto.occurred_on)
        .bind(clean_description(dto.description))
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(Transaction::try_from(row)?)
    }

    /// Lock a transaction row and check that the caller owns it.
    /// Missing rows are 404; rows owned by someone else are 403.
    async fn lock_owned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        transaction_id: Uuid,
        forbidden_message: &str,
    ) -> Result<Transaction, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, kind, category, amount, occurred_on, description,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found.".to_string()))?;

        if row.user_id != user_id {
            return Err(AppError::Forbidden(forbidden_message.to_string()));
        }

        Ok(Transaction::try_from(row)?)
    }

    /// Apply a partial update to one of the user's transactions
    pub async fn update_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
        dto: UpdateTransactionDto,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let existing = Self::lock_owned(
            &mut tx,
            user_id,
            transaction_id,
            "You can only update your own transactions.",
        )
        .await?;

        // Determine final values
        let kind = dto.kind.unwrap_or(existing.kind);
        let category = dto
            .category
            .map(|c| c.trim().to_string())
            .unwrap_or(existing.category);
        let amount = dto.amount.unwrap_or(existing.amount);
        let occurred_on = dto.occurred_on.unwrap_or(existing.occurred_on);
        let description = merge_description(dto.description, existing.description);

        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions SET
                kind = $2,
                category = $3,
                amount = $4,
                occurred_on = $5,
                description = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, kind, category, amount, occurred_on, description,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(kind.as_str())
        .bind(&category)
        .bind(amount)
        .bind(occurred_on)
        .bind(&description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(Transaction::try_from(row)?)
    }

    /// Delete one of the user's transactions
    pub async fn delete_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Self::lock_owned(
            &mut tx,
            user_id,
            transaction_id,
            "You can only delete your own transactions.",
        )
        .await?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(())
    }
}
