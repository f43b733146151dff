use actix_web::web;

use crate::errors::extractor_error;
use crate::{auth, contact, health, transaction, user};

/// Largest JSON body accepted by any endpoint
pub const JSON_BODY_LIMIT: usize = 10 * 1024;

/// Extractor settings so malformed bodies, queries and paths produce the
/// standard 400 error body
pub fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(extractor_error),
    )
    .app_data(web::QueryConfig::default().error_handler(extractor_error))
    .app_data(web::PathConfig::default().error_handler(extractor_error));
}

/// Routes served without rate limiting
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .service(auth::signout)
        // User endpoints
        .service(user::user_test)
        .service(user::update_user)
        .service(user::delete_user)
        // Transaction endpoints (order matters: specific routes before generic {id} routes)
        .service(transaction::get_stats)
        .service(transaction::get_monthly_summary)
        .service(transaction::list_transactions)
        .service(transaction::create_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        .service(contact::submit_contact);
}

/// Credential endpoints; the server wraps these in the rate limiter
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::signin)
        .service(auth::forgot_password);
}
