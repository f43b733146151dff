use secrecy::Secret;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;

use super::jwt::create_access_token;
use super::models::{ForgotPasswordDto, SignupDto, User};
use super::password::{
    hash_password, hash_security_answer, verify_password, verify_security_answer,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Authentication service handling sign up, sign in and password recovery
pub struct AuthService;

impl AuthService {
    /// Register a new user
    pub async fn signup(pool: &PgPool, dto: &SignupDto) -> Result<User, AppError> {
        let username = dto.username.trim();
        let email = dto.email.trim().to_lowercase();

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(&email)
        .bind(username)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if taken {
            return Err(AppError::Conflict(
                "Username or email already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;
        let security_answer_hash = dto
            .security_answer
            .as_deref()
            .map(hash_security_answer)
            .transpose()?;

        // A concurrent signup can still win the race; the unique index reports it
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, security_question, security_answer_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, security_question,
                      security_answer_hash, profile_picture, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(&email)
        .bind(&password_hash)
        .bind(dto.security_question.map(|q| q.as_str()))
        .bind(&security_answer_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("Username or email already exists.".to_string())
            }
            other => other,
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticate a user by email and password, return the user and a token
    pub async fn signin(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AppError> {
        let user = Self::find_by_email(pool, email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = create_access_token(user.id, jwt_secret)?;
        Ok((user, token))
    }

    /// Reset a password after checking the security question and answer.
    /// Unknown emails and accounts without a question fail exactly like a
    /// wrong answer.
    pub async fn forgot_password(pool: &PgPool, dto: &ForgotPasswordDto) -> Result<(), AppError> {
        let mismatch = || AppError::Unauthorized("Security answer does not match.".to_string());

        let user = Self::find_by_email(pool, &dto.email)
            .await?
            .ok_or_else(mismatch)?;

        let (Some(question), Some(answer_hash)) =
            (user.security_question.as_deref(), user.security_answer_hash.as_deref())
        else {
            return Err(mismatch());
        };

        if question != dto.security_question.as_str()
            || !verify_security_answer(&dto.security_answer, answer_hash)?
        {
            return Err(mismatch());
        }

        let password_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user.id)
            .bind(&password_hash)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(user_id = %user.id, "Password reset via security question");
        Ok(())
    }

    async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, security_question,
                   security_answer_hash, profile_picture, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }
}

