use serde::Deserialize;

/// Reset tokens are valid for one hour from issuance
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsumeResetRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}
