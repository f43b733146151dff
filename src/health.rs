use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;
use tracing::warn;
use utoipa::ToSchema;

use crate::config::Environment;

/// Moment the server process started, used for uptime reporting
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

impl StartedAt {
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "connected")]
    pub database: &'static str,
    pub uptime_seconds: u64,
    #[schema(example = "development")]
    pub environment: &'static str,
}

/// GET /health - Report process uptime and database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health_check(
    pool: web::Data<PgPool>,
    started_at: web::Data<StartedAt>,
    environment: web::Data<Environment>,
) -> HttpResponse {
    let uptime_seconds = started_at.0.elapsed().as_secs();
    let environment = environment.as_str();

    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            database: "connected",
            uptime_seconds,
            environment,
        }),
        Err(e) => {
            warn!("Health check failed: {e}");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy",
                database: "disconnected",
                uptime_seconds,
                environment,
            })
        }
    }
}
