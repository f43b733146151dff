use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::validate_username;
use crate::auth::UserResponseDto;

/// Request body for updating a profile (all fields optional)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(custom(
        function = "validate_username",
        message = "Username must be between 3 and 30 characters."
    ))]
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format."))]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: Option<String>,
}

impl UpdateUserDto {
    /// Trim username and email and lower-case the email; validation runs on the result
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.map(|u| u.trim().to_string()),
            email: self.email.map(|e| e.trim().to_lowercase()),
            ..self
        }
    }
}

/// Path parameters for user ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserIdPath {
    /// User UUID
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponseBody {
    pub success: bool,
    pub user: UserResponseDto,
}
