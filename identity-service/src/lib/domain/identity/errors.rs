use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationStatusError {
    #[error("Unknown verification status: {0}")]
    Unknown(String),
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Reasons a single-use token cannot be redeemed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid or expired token")]
    NotFound,

    #[error("token has already been used")]
    AlreadyUsed,

    #[error("token has expired")]
    Expired,
}

/// Error for event publishing operations
#[derive(Debug, Clone, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),
}

/// Error raised by a fallback notification target
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Request to {service} failed: {reason}")]
    Transport { service: String, reason: String },

    #[error("{service} responded with unexpected status {status}")]
    UnexpectedStatus { service: String, status: u16 },
}

#[derive(Debug, Clone, Error)]
pub enum EmailDeliveryError {
    #[error("Invalid email API url: {0}")]
    InvalidUrl(String),

    #[error("Email API request failed: {0}")]
    Transport(String),

    #[error("Email API rejected the message with status {0}")]
    Rejected(u16),
}

/// Top-level error for identity operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Role {0} is not allowed for this operation")]
    InvalidRole(String),

    #[error("Invalid verification status: {0}")]
    InvalidVerificationStatus(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("License number already registered: {0}")]
    LicenseNumberTaken(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token generation failed: {0}")]
    Entropy(String),

    #[error("Event publishing failed: {0}")]
    EventPublishing(#[from] EventPublisherError),

    #[error("Database error: {0}")]
    Storage(String),
}

