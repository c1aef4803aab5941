use nanoid::nanoid;
use tracing::{debug, info};

use abi::errors::{Error, Result};
use abi::model::{
    now_millis, ResetRequest, TokenCheck, TokenKind, TokenRecord, Verification,
};

use crate::DbRepo;

impl DbRepo {
    fn ttl_millis(&self, kind: TokenKind) -> i64 {
        let secs = match kind {
            TokenKind::EmailVerification => self.tokens.verification_ttl,
            TokenKind::PasswordReset => self.tokens.reset_ttl,
        };
        secs * 1000
    }

    /// store the hash of a fresh token and hand the raw token back for the mailer
    pub async fn issue_token(
        &self,
        kind: TokenKind,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<String> {
        let token = utils::generate_token();
        let now = now_millis();
        let record = TokenRecord {
            id: nanoid!(),
            user_id: user_id.to_string(),
            email: email.map(str::to_string),
            token: utils::hash_secret(&token)?,
            create_time: now,
            expires_at: now + self.ttl_millis(kind),
        };
        self.token.save_token(kind, record).await?;
        debug!("issued {:?} token for {}", kind, user_id);
        Ok(token)
    }

    /// compare the presented token against the stored hash, then expire the record;
    /// a wrong token never touches the record
    pub async fn check_token(
        &self,
        kind: TokenKind,
        user_id: &str,
        token: &str,
    ) -> Result<TokenCheck> {
        let Some(record) = self.token.get_token_by_user(kind, user_id).await? else {
            return Ok(TokenCheck::Missing);
        };
        if !utils::verify_password(token, &record.token) {
            return Ok(TokenCheck::Mismatch);
        }
        if record.is_expired(now_millis()) {
            self.token.delete_token(kind, &record.id).await?;
            return Ok(TokenCheck::Expired);
        }
        Ok(TokenCheck::Valid(record))
    }

    /// follow an email verification link; an expired link takes the unverified account with it
    pub async fn verify_email(&self, user_id: &str, token: &str) -> Result<Verification> {
        let kind = TokenKind::EmailVerification;
        let Some(record) = self.token.get_token_by_user(kind, user_id).await? else {
            return Ok(Verification::Missing);
        };

        if record.is_expired(now_millis()) {
            self.token.delete_token(kind, &record.id).await?;
            if let Some(user) = self.user.get_user_by_id(user_id).await? {
                if !user.verified {
                    info!("verification expired, removing account {}", user_id);
                    self.user.delete_user(user_id).await?;
                }
            }
            return Ok(Verification::Expired);
        }
        if !utils::verify_password(token, &record.token) {
            return Ok(Verification::Invalid);
        }

        self.user.set_verified(user_id).await?;
        self.token.delete_token(kind, &record.id).await?;
        Ok(Verification::Verified)
    }

    /// issue a reset token unless an unexpired one is already out
    pub async fn request_password_reset(&self, email: &str) -> Result<ResetRequest> {
        let kind = TokenKind::PasswordReset;
        let user = self
            .user
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| Error::not_found_with_details("Email address not found."))?;

        if let Some(existing) = self.token.get_token_by_email(kind, email).await? {
            if !existing.is_expired(now_millis()) {
                return Ok(ResetRequest::AlreadySent);
            }
            self.token.delete_token(kind, &existing.id).await?;
        }

        let token = self.issue_token(kind, &user.id, Some(email)).await?;
        Ok(ResetRequest::Issued {
            user_id: user.id,
            token,
        })
    }

    pub async fn check_reset_token(&self, user_id: &str, token: &str) -> Result<TokenCheck> {
        self.check_token(TokenKind::PasswordReset, user_id, token)
            .await
    }

    /// classify a reset link from the mail; expiry wins over the comparison and
    /// nothing is deleted, the form submit burns the record
    pub async fn check_reset_link(&self, user_id: &str, token: &str) -> Result<TokenCheck> {
        let Some(record) = self
            .token
            .get_token_by_user(TokenKind::PasswordReset, user_id)
            .await?
        else {
            return Ok(TokenCheck::Missing);
        };
        if record.is_expired(now_millis()) {
            return Ok(TokenCheck::Expired);
        }
        if !utils::verify_password(token, &record.token) {
            return Ok(TokenCheck::Mismatch);
        }
        Ok(TokenCheck::Valid(record))
    }

    /// replace the password and burn the token; anything but `Valid` leaves the password as is
    pub async fn change_password(
        &self,
        user_id: &str,
        token: &str,
        password: &str,
    ) -> Result<TokenCheck> {
        let check = self.check_reset_token(user_id, token).await?;
        if let TokenCheck::Valid(record) = &check {
            let hash = utils::hash_secret(password)?;
            self.user.modify_pwd(user_id, &hash).await?;
            self.token
                .delete_token(TokenKind::PasswordReset, &record.id)
                .await?;
            info!("password changed for {}", user_id);
        }
        Ok(check)
    }
}
