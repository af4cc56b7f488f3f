use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{VerificationChallenge, CODE_TTL_SECS};
use crate::common::{is_valid_email, safe_email_log, ApiError};
use crate::services::{email_templates, MailService};

pub struct VerificationService {
    db: SqlitePool,
}

impl VerificationService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Uniformly random 6-digit code, zero-padded ("000000"-"999999")
    fn generate_code() -> String {
        format!("{:06}", rand::thread_rng().gen_range(0..=999_999))
    }

    /// Issue a fresh code for the session and email the recipient.
    ///
    /// Replaces any previous challenge for the session, so only the
    /// newest code can verify.
    pub async fn issue_code(
        &self,
        mail: &MailService,
        session_token: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let email = email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(ApiError::ValidationError("Invalid email format".to_string()));
        }

        let code = Self::generate_code();

        sqlx::query(
            r#"
            INSERT INTO verification_challenges (session_token, email, code, issued_at, verified)
            VALUES (?, ?, ?, ?, 0)
            ON CONFLICT(session_token) DO UPDATE SET
                email = excluded.email,
                code = excluded.code,
                issued_at = excluded.issued_at,
                verified = 0
            "#,
        )
        .bind(session_token)
        .bind(&email)
        .bind(&code)
        .bind(now.timestamp())
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let body = email_templates::verification_code_email(&code);
        let delivered = mail
            .send(&email, "TaskMatrix - Email Verification Code", &body)
            .await?;

        if !delivered {
            return Err(ApiError::DispatchError(
                "Failed to send verification code".to_string(),
            ));
        }

        info!(
            email = %safe_email_log(&email),
            "Verification code issued"
        );

        Ok(())
    }

    /// Verify a presented code against the session's pending challenge.
    ///
    /// Succeeds at most once per issued challenge; an expired challenge
    /// is removed so it cannot be retried.
    pub async fn verify_code(
        &self,
        session_token: &str,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let challenge: Option<VerificationChallenge> = sqlx::query_as(
            "SELECT email, code, issued_at, verified FROM verification_challenges WHERE session_token = ?",
        )
        .bind(session_token)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let challenge = match challenge {
            Some(c) => c,
            None => {
                return Err(ApiError::StateError(
                    "No verification in progress".to_string(),
                ))
            }
        };

        if challenge.verified != 0 {
            return Err(ApiError::StateError(
                "Code already used; request a new one".to_string(),
            ));
        }

        if now.timestamp() - challenge.issued_at > CODE_TTL_SECS {
            // Remove the stale challenge so it cannot be retried
            sqlx::query("DELETE FROM verification_challenges WHERE session_token = ?")
                .bind(session_token)
                .execute(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

            warn!(
                email = %safe_email_log(&challenge.email),
                "Verification code expired"
            );
            return Err(ApiError::ExpiredError(
                "Verification code expired".to_string(),
            ));
        }

        let email = email.trim().to_lowercase();
        if code != challenge.code || email != challenge.email {
            return Err(ApiError::ValidationError(
                "Invalid verification code".to_string(),
            ));
        }

        sqlx::query("UPDATE verification_challenges SET verified = 1 WHERE session_token = ?")
            .bind(session_token)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(email = %safe_email_log(&email), "Email verified");

        Ok(())
    }

    /// Whether the session holds a verified challenge for this email
    pub async fn has_verified_email(
        &self,
        session_token: &str,
        email: &str,
    ) -> Result<bool, ApiError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT verified FROM verification_challenges WHERE session_token = ? AND email = ?",
        )
        .bind(session_token)
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(matches!(row, Some((v,)) if v != 0))
    }

    /// Discard the session's challenge once its purpose is served
    pub async fn consume_challenge(&self, session_token: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM verification_challenges WHERE session_token = ?")
            .bind(session_token)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(())
    }
}
