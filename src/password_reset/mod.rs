//! # Password Reset Module
//!
//! Token-based password reset: a high-entropy single-use token with a
//! one-hour expiry, delivered by email, consumed atomically.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use models::RESET_TOKEN_TTL_SECS;
pub use routes::password_reset_routes;
pub use services::PasswordResetService;
