use actix_web::{post, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};

use super::mailer::Mailer;
use super::models::{ContactReceipt, ContactResponse, SubmitContactDto};
use super::service::ContactService;

/// POST /api/contact - Submit the public contact form
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    request_body = SubmitContactDto,
    responses(
        (status = 201, description = "Submission stored", body = ContactResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[post("/api/contact")]
pub async fn submit_contact(
    pool: web::Data<PgPool>,
    mailer: web::Data<Mailer>,
    body: web::Json<SubmitContactDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner().normalized();
    dto.validate()?;

    let contact = ContactService::submit(pool.get_ref(), mailer.get_ref(), dto).await?;

    Ok(HttpResponse::Created().json(ContactResponse {
        success: true,
        message: "Thank you for your submission! We will get back to you soon.".to_string(),
        data: ContactReceipt {
            id: contact.id,
            submitted_at: contact.created_at,
        },
    }))
}
