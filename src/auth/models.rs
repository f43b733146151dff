use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Prompts a user may pick for password recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SecurityQuestion {
    #[serde(rename = "Whats your favorite color?")]
    FavoriteColor,
    #[serde(rename = "Whats your pets name?")]
    PetsName,
    #[serde(rename = "Whats your first school?")]
    FirstSchool,
}

impl SecurityQuestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityQuestion::FavoriteColor => "Whats your favorite color?",
            SecurityQuestion::PetsName => "Whats your pets name?",
            SecurityQuestion::FirstSchool => "Whats your first school?",
        }
    }
}

/// Usernames are compared after trimming, 3 to 30 characters
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if (3..=30).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new("username_length"))
    }
}

fn validate_security_pair(dto: &SignupDto) -> Result<(), ValidationError> {
    let has_answer = dto
        .security_answer
        .as_deref()
        .is_some_and(|a| !a.trim().is_empty());

    match (dto.security_question.is_some(), has_answer) {
        (true, false) => Err(ValidationError::new("security_answer_required")
            .with_message("A security answer is required with a security question.".into())),
        (false, true) => Err(ValidationError::new("security_question_required")
            .with_message("A security question is required with a security answer.".into())),
        _ => Ok(()),
    }
}

/// Request body for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_security_pair", skip_on_field_errors = false))]
pub struct SignupDto {
    /// Display name, unique
    #[validate(custom(
        function = "validate_username",
        message = "Username must be between 3 and 30 characters."
    ))]
    #[schema(example = "jdoe")]
    pub username: String,
    /// User's email address
    #[validate(email(message = "Please provide a valid email address."))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password (min 6 chars)
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "secret123")]
    pub password: String,
    /// Optional recovery question
    pub security_question: Option<SecurityQuestion>,
    /// Answer to the recovery question
    #[schema(example = "blue")]
    pub security_answer: Option<String>,
}

impl SignupDto {
    /// Trim username and email and lower-case the email; validation runs on the result
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            ..self
        }
    }
}

/// Request body for sign in
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninDto {
    #[validate(length(min = 1, message = "Email and password are required."))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required."))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Request body for resetting a password with the security question
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordDto {
    #[validate(email(message = "Please provide a valid email address."))]
    pub email: String,
    pub security_question: SecurityQuestion,
    #[validate(length(min = 1, message = "Security answer is required."))]
    pub security_answer: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub new_password: String,
}

/// User information returned in responses (never includes hashes)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    /// Unique user identifier
    pub id: Uuid,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub security_question: Option<String>,
    pub profile_picture: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponseDto {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            security_question: user.security_question.clone(),
            profile_picture: user.profile_picture.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Token Models
// ============================================================================

/// JWT access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,  // User ID
    pub iat: usize, // Issued at
    pub exp: usize, // Expiration
}

/// Response for a successful sign in
#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    pub success: bool,
    /// JWT access token, also set as the `access_token` cookie
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponseDto,
}

/// Generic `{success, message}` body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    #[schema(example = "Signed out successfully.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
