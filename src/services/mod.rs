// Services module - cross-domain infrastructure services

pub mod email_templates;
pub mod mail;

pub use mail::{MailService, MailTransport, MockTransport, SesConfig, SesTransport};
