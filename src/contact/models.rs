use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    /// Addresses accepted by the contact form
    pub(crate) static ref CONTACT_EMAIL_RE: Regex =
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("Invalid email regex");
}

#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form submission. Missing fields deserialize as empty and fail
/// validation with the field's message.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SubmitContactDto {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(regex(
        path = *CONTACT_EMAIL_RE,
        message = "Please provide a valid email address."
    ))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 3, message = "Subject must be at least 3 characters."))]
    #[schema(example = "Feature request")]
    pub subject: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters."))]
    #[schema(example = "It would be great to export my transactions.")]
    pub message: String,
}

impl SubmitContactDto {
    /// Trim every field and lower-case the email; lengths are checked after this
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    #[schema(example = "Thank you for your submission! We will get back to you soon.")]
    pub message: String,
    pub data: ContactReceipt,
}
