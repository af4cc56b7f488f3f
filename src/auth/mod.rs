//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Account registration and login
//! - Server-side session store (opaque token, cookie or bearer)
//! - Password hashing
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
