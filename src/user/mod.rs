pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{delete_user, update_user, user_test};
pub use service::UserService;
