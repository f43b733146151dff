use maud::{html, DOCTYPE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::MailConfig;

use super::models::Contact;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers contact-form notifications through a transactional-mail HTTP API.
///
/// Built once at startup. Without mail settings it is disabled and every
/// send is a no-op.
pub struct Mailer {
    transport: Option<Transport>,
}

struct Transport {
    client: reqwest::Client,
    api_url: String,
    api_key: Secret<String>,
    from: String,
    to: String,
}

#[derive(Debug)]
pub enum MailError {
    Request(reqwest::Error),
    Rejected(StatusCode),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Request(e) => write!(f, "mail request failed: {e}"),
            MailError::Rejected(status) => write!(f, "mail API rejected message: {status}"),
        }
    }
}

impl std::error::Error for MailError {}

/// JSON body posted to the mail API
#[derive(Debug, Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: String,
    text: String,
    html: String,
}

impl Mailer {
    pub fn new(config: Option<&MailConfig>) -> Self {
        let Some(config) = config else {
            warn!("Mail settings not configured; contact notifications are disabled");
            return Self::disabled();
        };

        let client = match reqwest::Client::builder().timeout(SEND_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build mail client, notifications disabled: {e}");
                return Self::disabled();
            }
        };

        info!(api_url = %config.api_url, to = %config.to, "Contact notifications enabled");
        Self {
            transport: Some(Transport {
                client,
                api_url: config.api_url.clone(),
                api_key: config.api_key.clone(),
                from: config.from.clone(),
                to: config.to.clone(),
            }),
        }
    }

    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a notification for a stored submission.
    /// Returns `Ok(false)` when the mailer is disabled.
    pub async fn send_contact_notification(&self, contact: &Contact) -> Result<bool, MailError> {
        let Some(transport) = &self.transport else {
            return Ok(false);
        };

        let mail = OutgoingMail {
            from: &transport.from,
            to: &transport.to,
            reply_to: &contact.email,
            subject: format!("New Contact Form: {}", contact.subject),
            text: render_text(contact),
            html: render_html(contact),
        };

        let response = transport
            .client
            .post(&transport.api_url)
            .bearer_auth(transport.api_key.expose_secret())
            .json(&mail)
            .send()
            .await
            .map_err(MailError::Request)?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status()));
        }

        Ok(true)
    }
}

fn render_text(contact: &Contact) -> String {
    format!(
        "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n",
        contact.name, contact.email, contact.subject, contact.message
    )
}

fn render_html(contact: &Contact) -> String {
    let submitted = contact.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    html! {
        (DOCTYPE)
        html {
            body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;" {
                h2 { "New Contact Form Submission" }
                p { strong { "From: " } (contact.name) }
                p {
                    strong { "Email: " }
                    a href={ "mailto:" (contact.email) } { (contact.email) }
                }
                p { strong { "Subject: " } (contact.subject) }
                p { strong { "Message:" } }
                p style="white-space: pre-wrap;" { (contact.message) }
                p style="color: #6b7280; font-size: 14px;" { "Submitted at " (submitted) }
            }
        }
    }
    .into_string()
}
