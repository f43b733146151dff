use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::User;
use crate::errors::AppError;

use super::models::UpdateUserDto;

/// Service layer for profile management.
pub struct UserService;

impl UserService {
    /// Apply the provided profile fields; omitted fields keep their value
    pub async fn update_user(
        pool: &PgPool,
        user_id: Uuid,
        dto: &UpdateUserDto,
    ) -> Result<User, AppError> {
        let username = dto.username.as_deref().map(str::trim);
        let email = dto.email.as_deref().map(|e| e.trim().to_lowercase());
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, security_question,
                      security_answer_hash, profile_picture, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("Username or email already exists.".to_string())
            }
            other => other,
        })?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }

    /// Delete a user; their transactions go with them (ON DELETE CASCADE)
    pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        info!(%user_id, "User deleted");
        Ok(())
    }
}
