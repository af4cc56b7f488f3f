//! # Verification Module
//!
//! Session-bound email verification: a 6-digit code with a server-side
//! 120-second expiry, used to prove control of an address before an
//! email change is applied.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use models::CODE_TTL_SECS;
pub use routes::verification_routes;
pub use services::VerificationService;
