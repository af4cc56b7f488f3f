use serde::Deserialize;
use sqlx::FromRow;

/// Server-side validity window for a verification code
pub const CODE_TTL_SECS: i64 = 120;

/// One pending email-verification challenge, bound to a session.
/// Issuing a new code for the same session replaces the old challenge.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationChallenge {
    pub email: String,
    pub code: String,
    pub issued_at: i64,
    pub verified: i64,
}

/// Single endpoint, dispatched on the `action` field like the form the
/// UI posts.
#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
pub enum VerificationRequest {
    #[serde(rename = "send_code")]
    SendCode { email: String },
    #[serde(rename = "verify_code")]
    VerifyCode { email: String, code: String },
}
