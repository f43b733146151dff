pub mod handlers;
pub mod mailer;
pub mod models;
pub mod service;

pub use handlers::submit_contact;
pub use mailer::Mailer;
