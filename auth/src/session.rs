use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// Issues and validates signed session tokens.
///
/// Built once from the signing secret and shared read-only afterwards.
pub struct ClaimsCodec {
    jwt_handler: JwtHandler,
    validity: Duration,
}

impl ClaimsCodec {
    /// Create a codec.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret
    /// * `validity` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `EmptySecret` - `secret` is empty
    pub fn new(secret: &[u8], validity: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            jwt_handler: JwtHandler::new(secret)?,
            validity,
        })
    }

    /// Issue a token for `user_id` with `role`, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, user_id: &str, role: &str) -> Result<String, JwtError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &str,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = SessionClaims::new(user_id, role, issued_at, self.validity);
        self.jwt_handler.encode(&claims)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - The validity window has passed
    /// * `InvalidToken` - Signature or structure is wrong
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
