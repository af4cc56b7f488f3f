// src/services/mail.rs
//! Outbound mail dispatch.
//!
//! The whole application sends email through [`MailService`], which wraps
//! a [`MailTransport`] implementation. Production uses SES; tests swap in
//! [`MockTransport`]. Callers decide what (if anything) to persist about
//! a delivery - the dispatcher records nothing.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::config::{Credentials, Region};
use aws_sdk_sesv2::Client as SesClient;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

use crate::common::{is_valid_email, safe_email_log, ApiError};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport not configured")]
    NotConfigured,

    #[error("SES operation failed: {0}")]
    SesError(String),

    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// SES connection settings, read from the environment at startup
#[derive(Debug, Clone)]
pub struct SesConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub from_email: String,
}

impl SesConfig {
    /// Returns None when the AWS credentials are absent, in which case
    /// every send reports failure instead of panicking at startup.
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let region = env::var("AWS_SES_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .unwrap_or_else(|_| "us-east-1".to_string());
        let from_email = env::var("AWS_SES_FROM_EMAIL").ok()?;

        Some(Self {
            access_key_id,
            secret_access_key,
            region,
            from_email,
        })
    }
}

/// The transport seam: one contract shared by reminder, verification and
/// password-reset call sites so the provider can be swapped in one place.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

// ============================================================================
// SES transport
// ============================================================================

pub struct SesTransport {
    config: Option<SesConfig>,
}

impl SesTransport {
    pub fn new(config: Option<SesConfig>) -> Self {
        Self { config }
    }

    async fn get_client(&self) -> Result<(SesClient, &SesConfig), MailError> {
        let config = self.config.as_ref().ok_or(MailError::NotConfigured)?;

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "env",
        );

        let region = Region::new(config.region.clone());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        Ok((SesClient::new(&aws_config), config))
    }
}

#[async_trait]
impl MailTransport for SesTransport {
    async fn deliver(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let (client, config) = self.get_client().await?;

        use aws_sdk_sesv2::types::{Body as SesBody, Content, Destination, EmailContent, Message};

        let destination = Destination::builder()
            .set_to_addresses(Some(vec![to.to_string()]))
            .build();

        let subject_content = Content::builder()
            .data(subject)
            .charset("UTF-8")
            .build()
            .map_err(|e| MailError::SesError(format!("Failed to build subject: {}", e)))?;

        let body_content = Content::builder()
            .data(html_body)
            .charset("UTF-8")
            .build()
            .map_err(|e| MailError::SesError(format!("Failed to build body: {}", e)))?;

        let ses_body = SesBody::builder().html(body_content).build();

        let message = Message::builder()
            .subject(subject_content)
            .body(ses_body)
            .build();

        let email_content = EmailContent::builder().simple(message).build();

        let result = client
            .send_email()
            .from_email_address(&config.from_email)
            .destination(destination)
            .content(email_content)
            .send()
            .await
            .map_err(|e| MailError::SesError(format!("Send failed: {}", e)))?;

        info!(
            to = %safe_email_log(to),
            message_id = ?result.message_id(),
            "Email sent successfully via SES"
        );

        Ok(())
    }
}

// ============================================================================
// Mock transport (tests)
// ============================================================================

/// One captured outbound message
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Records outbound mail instead of sending it
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All subsequent deliveries fail while set
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn sent_mail(&self) -> Vec<SentMail> {
        self.sent.lock().expect("mock mail lock poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn deliver(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::TransportFailure("mock transport failing".to_string()));
        }

        self.sent
            .lock()
            .expect("mock mail lock poisoned")
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });

        Ok(())
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

pub struct MailService {
    transport: Arc<dyn MailTransport>,
}

impl MailService {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Build the production dispatcher from environment configuration
    pub fn from_env() -> Self {
        let config = SesConfig::from_env();
        if config.is_none() {
            warn!("AWS SES not configured - outbound email will report failure");
        }
        Self::new(Arc::new(SesTransport::new(config)))
    }

    /// Dispatch one message, reporting success or failure.
    ///
    /// Ordinary transport failure is logged and returned as `Ok(false)`;
    /// the only error case is a malformed recipient address.
    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<bool, ApiError> {
        if !is_valid_email(to) {
            return Err(ApiError::ValidationError("Invalid email format".to_string()));
        }

        match self.transport.deliver(to, subject, html_body).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(
                    error = %e,
                    to = %safe_email_log(to),
                    subject = %subject,
                    "Email delivery failed"
                );
                Ok(false)
            }
        }
    }
}
