use actix_web::{get, post, web, HttpResponse};
use secrecy::Secret;
use sqlx::PgPool;
use validator::Validate;

use crate::config::Environment;
use crate::errors::{AppError, ErrorResponse};

use super::jwt::{auth_cookie, removal_cookie};
use super::models::{
    ForgotPasswordDto, MessageResponse, SigninDto, SigninResponse, SignupDto, UserResponseDto,
};
use super::service::AuthService;

/// POST /api/auth/signup - Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupDto,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    )
)]
#[post("/api/auth/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    body: web::Json<SignupDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner().normalized();
    dto.validate()?;

    AuthService::signup(pool.get_ref(), &dto).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User created successfully!")))
}

/// POST /api/auth/signin - Authenticate and receive the access token cookie
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Auth",
    request_body = SigninDto,
    responses(
        (status = 200, description = "Signed in; access_token cookie set", body = SigninResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[post("/api/auth/signin")]
pub async fn signin(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    environment: web::Data<Environment>,
    body: web::Json<SigninDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let (user, token) =
        AuthService::signin(pool.get_ref(), jwt_secret.get_ref(), &body.email, &body.password)
            .await?;

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(token.clone(), environment.is_production()))
        .json(SigninResponse {
            success: true,
            token,
            user: UserResponseDto::from_user(&user),
        }))
}

/// GET /api/auth/signout - Clear the access token cookie
#[utoipa::path(
    get,
    path = "/api/auth/signout",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse)
    )
)]
#[get("/api/auth/signout")]
pub async fn signout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(MessageResponse::new("Signed out successfully."))
}

/// POST /api/auth/forgot-password - Reset a password with the security question
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Email, question or answer does not match", body = ErrorResponse)
    )
)]
#[post("/api/auth/forgot-password")]
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    body: web::Json<ForgotPasswordDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::forgot_password(pool.get_ref(), &body).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Password reset successfully. Please sign in with your new password.",
    )))
}
