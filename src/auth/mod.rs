pub mod handlers;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

// Re-export handlers for use in main.rs
pub use handlers::{forgot_password, signin, signout, signup};

// Re-export for use in extractors and the user module
pub use jwt::{decode_token, extract_token, removal_cookie};
pub use models::{MessageResponse, User, UserResponseDto};
pub use service::AuthService;
