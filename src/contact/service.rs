use sqlx::PgPool;
use tracing::{error, info};

use crate::errors::AppError;

use super::mailer::Mailer;
use super::models::{Contact, SubmitContactDto};

pub struct ContactService;

impl ContactService {
    /// Store a submission, then try to notify the site owner.
    /// Delivery failures are logged; the stored submission stands.
    pub async fn submit(
        pool: &PgPool,
        mailer: &Mailer,
        dto: SubmitContactDto,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.subject)
        .bind(&dto.message)
        .fetch_one(pool)
        .await?;

        info!(contact_id = %contact.id, "Contact submission saved");

        match mailer.send_contact_notification(&contact).await {
            Ok(true) => info!(contact_id = %contact.id, "Contact notification sent"),
            Ok(false) => {}
            Err(e) => error!(contact_id = %contact.id, "Contact notification failed: {e}"),
        }

        Ok(contact)
    }
}
