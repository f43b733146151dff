pub mod auth;
pub mod config;
pub mod contact;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod openapi;
pub mod routes;
pub mod transaction;
pub mod user;
