//! # Profile Module
//!
//! Account self-service: display name, password change gated on the
//! current password, and email change gated on a verified challenge.

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::profile_routes;
