use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::RESET_TOKEN_TTL_SECS;
use crate::auth::password::hash_password;
use crate::common::{
    generate_secure_token, is_valid_email, safe_email_log, safe_token_log, ApiError,
};
use crate::services::{email_templates, MailService};

pub struct PasswordResetService {
    db: SqlitePool,
}

impl PasswordResetService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Begin a reset: issue a token and email a reset link.
    ///
    /// Deliberately quiet about outcomes - whether the email exists and
    /// whether delivery worked are both invisible to the caller, so the
    /// endpoint cannot be used to enumerate accounts. Failures end up in
    /// the server log only.
    pub async fn request_reset(
        &self,
        mail: &MailService,
        app_base_url: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let email = email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(ApiError::ValidationError("Invalid email format".to_string()));
        }

        let user: Option<(String, String)> =
            sqlx::query_as("SELECT id, name FROM users WHERE email = ?")
                .bind(&email)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        let (user_id, name) = match user {
            Some(u) => u,
            None => {
                info!(
                    email = %safe_email_log(&email),
                    "Reset requested for unknown email; responding generically"
                );
                return Ok(());
            }
        };

        // 32 bytes of CSPRNG entropy, hex-encoded
        let token = generate_secure_token(32);
        let expiry = now.timestamp() + RESET_TOKEN_TTL_SECS;

        sqlx::query("UPDATE users SET reset_token = ?, reset_expiry = ? WHERE id = ?")
            .bind(&token)
            .bind(expiry)
            .bind(&user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let reset_link = format!(
            "{}/reset-password?token={}",
            app_base_url.trim_end_matches('/'),
            token
        );
        let body = email_templates::password_reset_email(&name, &reset_link);

        let delivered = mail
            .send(&email, "TaskMatrix Password Reset", &body)
            .await?;

        if delivered {
            info!(
                user_id = %user_id,
                token = %safe_token_log(&token),
                "Password reset link emailed"
            );
        } else {
            warn!(
                user_id = %user_id,
                "Password reset email failed to deliver; token remains valid"
            );
        }

        Ok(())
    }

    /// Consume a reset token and rewrite the password hash.
    ///
    /// The rewrite is a single conditional UPDATE keyed on the token and
    /// its expiry, so two concurrent submissions cannot both succeed. An
    /// expired token is cleared as a side effect of the failed attempt.
    pub async fn consume_reset(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if token.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
            return Err(ApiError::ValidationError(
                "All fields are required".to_string(),
            ));
        }

        if new_password != confirm_password {
            return Err(ApiError::ValidationError(
                "Passwords do not match".to_string(),
            ));
        }

        if new_password.len() < 6 {
            return Err(ApiError::ValidationError(
                "Password must be at least 6 characters long".to_string(),
            ));
        }

        let password_hash = hash_password(new_password)?;
        let now_ts = now.timestamp();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, reset_token = NULL, reset_expiry = NULL
            WHERE reset_token = ? AND reset_expiry > ?
            "#,
        )
        .bind(&password_hash)
        .bind(token)
        .bind(now_ts)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() > 0 {
            info!(token = %safe_token_log(token), "Password reset consumed");
            return Ok(());
        }

        // Zero rows: the token is unknown, already consumed, or expired.
        let stale: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT id, reset_expiry FROM users WHERE reset_token = ?")
                .bind(token)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        match stale {
            Some((user_id, _)) => {
                // Clear the expired token so it cannot be retried
                sqlx::query(
                    "UPDATE users SET reset_token = NULL, reset_expiry = NULL WHERE reset_token = ?",
                )
                .bind(token)
                .execute(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

                warn!(user_id = %user_id, "Expired reset token presented and cleared");
                Err(ApiError::ExpiredError(
                    "Reset link has expired".to_string(),
                ))
            }
            None => Err(ApiError::NotFound(
                "Invalid or expired reset link".to_string(),
            )),
        }
    }
}
