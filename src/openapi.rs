use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::jwt::ACCESS_TOKEN_COOKIE;
use crate::auth::models::{
    ForgotPasswordDto, MessageResponse, SecurityQuestion, SigninDto, SigninResponse, SignupDto,
    UserResponseDto,
};
use crate::contact::models::{ContactReceipt, ContactResponse, SubmitContactDto};
use crate::errors::ErrorResponse;
use crate::health::HealthResponse;
use crate::transaction::models::{
    CreateTransactionDto, MonthlySummaryResponse, TransactionKind, TransactionListResponse,
    TransactionResponse, TransactionResponseBody, TransactionStatsResponse, UpdateTransactionDto,
};
use crate::transaction::MonthTotals;
use crate::user::models::{UpdateUserDto, UserResponseBody};

/// Security schemes: the `access_token` cookie set at sign in, or the same
/// JWT as a Bearer header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fintrack API",
        version = "1.0.0",
        description = "Personal finance tracking: transactions, statistics and monthly summaries",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Sign up, sign in and password recovery"),
        (name = "Users", description = "Profile management"),
        (name = "Transactions", description = "Income and expense records with aggregate statistics"),
        (name = "Contact", description = "Public contact form")
    ),
    paths(
        crate::health::health_check,
        // Auth endpoints
        crate::auth::handlers::signup,
        crate::auth::handlers::signin,
        crate::auth::handlers::signout,
        crate::auth::handlers::forgot_password,
        // User endpoints
        crate::user::handlers::user_test,
        crate::user::handlers::update_user,
        crate::user::handlers::delete_user,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        crate::transaction::handlers::get_stats,
        crate::transaction::handlers::get_monthly_summary,
        // Contact endpoints
        crate::contact::handlers::submit_contact,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            // Auth schemas
            SecurityQuestion,
            SignupDto,
            SigninDto,
            ForgotPasswordDto,
            UserResponseDto,
            SigninResponse,
            MessageResponse,
            // User schemas
            UpdateUserDto,
            UserResponseBody,
            // Transaction schemas
            TransactionKind,
            TransactionResponse,
            TransactionResponseBody,
            TransactionListResponse,
            CreateTransactionDto,
            UpdateTransactionDto,
            TransactionStatsResponse,
            MonthTotals,
            MonthlySummaryResponse,
            // Contact schemas
            SubmitContactDto,
            ContactReceipt,
            ContactResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/api/auth/signup",
            "/api/auth/signin",
            "/api/auth/signout",
            "/api/auth/forgot-password",
            "/api/user",
            "/api/user/update/{id}",
            "/api/user/delete/{id}",
            "/api/transactions",
            "/api/transactions/{id}",
            "/api/transactions/stats",
            "/api/transactions/monthly-summary",
            "/api/contact",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("Should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("cookie_auth"));
    }
}
