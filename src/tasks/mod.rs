//! # Tasks Module
//!
//! Task registry: create, list, and delete tasks referencing a course,
//! always scoped to the authenticated owner. Task deletion also removes
//! dependent reminders atomically.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::tasks_routes;
pub use services::TasksService;
