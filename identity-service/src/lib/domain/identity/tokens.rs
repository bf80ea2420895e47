use std::fmt;
use std::sync::Arc;

use auth::token::new_token;
use auth::token::SINGLE_USE_TOKEN_BYTES;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::identity::errors::AuthError;
use crate::identity::errors::TokenError;
use crate::identity::models::UserId;
use crate::identity::ports::TokenRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::EmailVerification => f.write_str("email_verification"),
            TokenKind::PasswordReset => f.write_str("password_reset"),
        }
    }
}

/// Emailed token that can be redeemed at most once, before `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleUseToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SingleUseToken {
    /// Check the token can still be redeemed at `now`.
    ///
    /// # Errors
    /// * `AlreadyUsed` - `used_at` is set
    /// * `Expired` - `now` is past `expires_at`
    pub fn ensure_redeemable(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        if self.used_at.is_some() {
            return Err(TokenError::AlreadyUsed);
        }
        if now > self.expires_at {
            return Err(TokenError::Expired);
        }
        Ok(())
    }
}

/// Generates, stores and redeems single-use tokens.
pub struct TokenIssuer<TR>
where
    TR: TokenRepository,
{
    repository: Arc<TR>,
    verification_ttl: Duration,
    reset_ttl: Duration,
}

impl<TR> TokenIssuer<TR>
where
    TR: TokenRepository,
{
    pub fn new(repository: Arc<TR>, verification_ttl: Duration, reset_ttl: Duration) -> Self {
        Self {
            repository,
            verification_ttl,
            reset_ttl,
        }
    }

    fn mint(&self, user_id: UserId, ttl: Duration) -> Result<SingleUseToken, AuthError> {
        let token = new_token(SINGLE_USE_TOKEN_BYTES).map_err(|e| AuthError::Entropy(e.to_string()))?;
        let now = Utc::now();

        Ok(SingleUseToken {
            token,
            user_id,
            expires_at: now + ttl,
            used_at: None,
            created_at: now,
        })
    }

    /// Store a new email verification token. Earlier tokens stay valid.
    pub async fn issue_verification_token(
        &self,
        user_id: UserId,
    ) -> Result<SingleUseToken, AuthError> {
        let token = self.mint(user_id, self.verification_ttl)?;
        self.repository
            .insert(TokenKind::EmailVerification, &token)
            .await?;

        tracing::debug!(user_id = %user_id, expires_at = %token.expires_at, "Verification token issued");
        Ok(token)
    }

    /// Store a new reset token, retiring every unused reset token of the user.
    pub async fn issue_reset_token(&self, user_id: UserId) -> Result<SingleUseToken, AuthError> {
        let token = self.mint(user_id, self.reset_ttl)?;
        self.repository.replace_reset_token(&token).await?;

        tracing::debug!(user_id = %user_id, expires_at = %token.expires_at, "Reset token issued");
        Ok(token)
    }

    /// Look up a token and check it can be redeemed now.
    ///
    /// # Errors
    /// * `Token(NotFound)` - No such token of this kind
    /// * `Token(AlreadyUsed)` / `Token(Expired)` - See [`SingleUseToken::ensure_redeemable`]
    pub async fn redeemable(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> Result<SingleUseToken, AuthError> {
        let record = self
            .repository
            .find(kind, token)
            .await?
            .ok_or(TokenError::NotFound)?;

        record.ensure_redeemable(Utc::now()).map_err(|e| {
            tracing::info!(kind = %kind, user_id = %record.user_id, reason = %e, "Token rejected");
            e
        })?;

        Ok(record)
    }

    /// Redeem a verification token and mark its owner verified.
    pub async fn consume_verification(&self, token: &str) -> Result<UserId, AuthError> {
        let record = self.redeemable(TokenKind::EmailVerification, token).await?;
        self.repository
            .consume_verification(&record.token, &record.user_id)
            .await?;
        Ok(record.user_id)
    }

    /// Redeem a reset token previously returned by [`Self::redeemable`],
    /// storing `password_hash` for its owner.
    pub async fn consume_reset(
        &self,
        record: &SingleUseToken,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        self.repository
            .consume_reset(&record.token, &record.user_id, password_hash)
            .await
    }
}
