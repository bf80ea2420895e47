use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session claims carried by an access token.
///
/// `role` is kept as the raw role name; services parse it into their own
/// role type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Claims issued at `issued_at` and valid for `validity`.
    pub fn new(
        user_id: impl ToString,
        role: impl ToString,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + validity).timestamp(),
        }
    }
}
