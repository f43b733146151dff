use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    CreateTransactionDto, MonthlySummaryQuery, MonthlySummaryResponse, TransactionFilters,
    TransactionIdPath, TransactionListResponse, TransactionResponse, TransactionResponseBody,
    TransactionStatsResponse, UpdateTransactionDto,
};
use super::service::TransactionService;

/// GET /api/transactions - List the caller's transactions, newest first
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(TransactionFilters),
    responses(
        (status = 200, description = "All matching transactions", body = TransactionListResponse),
        (status = 400, description = "Invalid filters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[get("/api/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<TransactionFilters>,
) -> Result<HttpResponse, AppError> {
    query
        .validate_range()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transactions =
        TransactionService::list_transactions(pool.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(TransactionListResponse {
        success: true,
        transactions: transactions.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/transactions - Record a new income or expense
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponseBody),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[post("/api/transactions")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), auth.user_id, body.into_inner())
            .await?;

    Ok(HttpResponse::Created().json(TransactionResponseBody {
        success: true,
        transaction: TransactionResponse::from(transaction),
    }))
}

/// PUT /api/transactions/{id} - Update fields of a transaction
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponseBody),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[put("/api/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<UpdateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction = TransactionService::update_transaction(
        pool.get_ref(),
        auth.user_id,
        path.id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(TransactionResponseBody {
        success: true,
        transaction: TransactionResponse::from(transaction),
    }))
}

/// DELETE /api/transactions/{id} - Delete a transaction
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[delete("/api/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Transaction deleted successfully."
    })))
}

/// GET /api/transactions/stats - Income, expense, balance and category totals
#[utoipa::path(
    get,
    path = "/api/transactions/stats",
    tag = "Transactions",
    responses(
        (status = 200, description = "Aggregate statistics", body = TransactionStatsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[get("/api/transactions/stats")]
pub async fn get_stats(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let stats = TransactionService::get_stats(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(TransactionStatsResponse::from(stats)))
}

/// GET /api/transactions/monthly-summary - Month-of-year income/expense totals
#[utoipa::path(
    get,
    path = "/api/transactions/monthly-summary",
    tag = "Transactions",
    params(MonthlySummaryQuery),
    responses(
        (status = 200, description = "Twelve monthly buckets, Jan to Dec", body = MonthlySummaryResponse),
        (status = 400, description = "Invalid year", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[get("/api/transactions/monthly-summary")]
pub async fn get_monthly_summary(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<MonthlySummaryQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let monthly_summary =
        TransactionService::get_monthly_summary(pool.get_ref(), auth.user_id, query.year).await?;

    Ok(HttpResponse::Ok().json(MonthlySummaryResponse {
        success: true,
        monthly_summary,
    }))
}
