use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
}

impl TokenKind {
    pub fn collection(&self) -> &'static str {
        match self {
            TokenKind::EmailVerification => "email_verifications",
            TokenKind::PasswordReset => "password_resets",
        }
    }
}

/// one-time token; only the argon2 hash of the token is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub token: String,
    pub create_time: i64,
    pub expires_at: i64,
}

impl TokenRecord {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at < now
    }
}

/// outcome of checking a presented token against the stored record
#[derive(Debug, Clone, PartialEq)]
pub enum TokenCheck {
    Valid(TokenRecord),
    /// no record for the user
    Missing,
    /// the token does not match the stored hash
    Mismatch,
    /// the record had expired and has been removed
    Expired,
}

/// result of following an email verification link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Expired,
    Invalid,
    Missing,
}

impl Verification {
    pub fn is_success(&self) -> bool {
        matches!(self, Verification::Verified)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verification::Verified => "Email verified successfully",
            Verification::Expired => "Verification token has expired.",
            Verification::Invalid => "Verification failed or link is invalid",
            Verification::Missing => "Invalid verification link. Try again later.",
        }
    }
}

/// outcome of asking for a password reset link
#[derive(Debug, Clone, PartialEq)]
pub enum ResetRequest {
    /// a fresh token was issued; carries the raw token for the mailer
    Issued { user_id: String, token: String },
    /// an unexpired link is still out there
    AlreadySent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetEmail {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidateReset {
    pub uid: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChangePassword {
    pub uid: Option<String>,
    pub token: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_strictly_before_now() {
        let record = TokenRecord {
            id: "t".into(),
            user_id: "u".into(),
            email: None,
            token: "hash".into(),
            create_time: 0,
            expires_at: 1_000,
        };
        assert!(!record.is_expired(1_000));
        assert!(record.is_expired(1_001));
    }
}
