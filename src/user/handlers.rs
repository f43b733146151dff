use actix_web::{delete, get, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::{removal_cookie, MessageResponse, UserResponseDto};
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{UpdateUserDto, UserIdPath, UserResponseBody};
use super::service::UserService;

/// GET /api/user - Liveness probe for the user routes
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "User routes are reachable", body = MessageResponse)
    )
)]
#[get("/api/user")]
pub async fn user_test() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("API is working!"))
}

/// PUT /api/user/update/{id} - Update the caller's own profile
#[utoipa::path(
    put,
    path = "/api/user/update/{id}",
    tag = "Users",
    params(UserIdPath),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponseBody),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[put("/api/user/update/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<UserIdPath>,
    body: web::Json<UpdateUserDto>,
) -> Result<HttpResponse, AppError> {
    if path.id != auth.user_id {
        return Err(AppError::Forbidden(
            "You can only update your own account.".to_string(),
        ));
    }

    let dto = body.into_inner().normalized();
    dto.validate()?;

    let user = UserService::update_user(pool.get_ref(), auth.user_id, &dto).await?;

    Ok(HttpResponse::Ok().json(UserResponseBody {
        success: true,
        user: UserResponseDto::from_user(&user),
    }))
}

/// DELETE /api/user/delete/{id} - Delete the caller's account and all of its transactions
#[utoipa::path(
    delete,
    path = "/api/user/delete/{id}",
    tag = "Users",
    params(UserIdPath),
    responses(
        (status = 200, description = "Account deleted; access_token cookie cleared", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
#[delete("/api/user/delete/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<UserIdPath>,
) -> Result<HttpResponse, AppError> {
    if path.id != auth.user_id {
        return Err(AppError::Forbidden(
            "You can only delete your own account.".to_string(),
        ));
    }

    UserService::delete_user(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(MessageResponse::new("Account deleted successfully.")))
}
