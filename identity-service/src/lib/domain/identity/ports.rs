use async_trait::async_trait;

use crate::identity::errors::AuthError;
use crate::identity::errors::EmailDeliveryError;
use crate::identity::errors::EventPublisherError;
use crate::identity::errors::NotificationError;
use crate::identity::events::ClinicUpdatedEvent;
use crate::identity::events::UserRegisteredEvent;
use crate::identity::models::AdminRegistration;
use crate::identity::models::Caller;
use crate::identity::models::ClinicUpdate;
use crate::identity::models::EmailAddress;
use crate::identity::models::LoginOutcome;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Session;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::VerificationStatus;
use crate::identity::tokens::SingleUseToken;
use crate::identity::tokens::TokenKind;

/// Port for identity domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Self-register a new account.
    ///
    /// Creates the account unverified, emails a verification link and
    /// announces the registration in the background. No session token is
    /// issued; the user logs in once verified.
    ///
    /// # Errors
    /// * `InvalidRole` - Role may not self-register
    /// * `UserExists` - Email is already registered
    /// * `Hashing` / `Entropy` / `Storage` - Infrastructure failure
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Create an account on behalf of a system admin.
    ///
    /// The account is verified and approved immediately and a session token
    /// for it is returned.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not a system admin (checked before any storage access)
    /// * `InvalidRole` - Role cannot be created by an admin
    /// * `UserExists` - Email is already registered
    async fn admin_register(
        &self,
        caller: &Caller,
        command: RegisterCommand,
    ) -> Result<AdminRegistration, AuthError>;

    /// Check credentials.
    ///
    /// # Returns
    /// `Authenticated` with a session token, or `PendingVerification` when the
    /// credentials are right but the account is not fully verified
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `AccountInactive` - Account is switched off
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<LoginOutcome, AuthError>;

    /// Redeem an email verification token.
    ///
    /// # Errors
    /// * `Token(NotFound | AlreadyUsed | Expired)`
    async fn verify_email(&self, token: &str) -> Result<UserId, AuthError>;

    /// Send a fresh verification link if the email belongs to an unverified
    /// account. Silent otherwise, so callers cannot probe for accounts.
    async fn resend_verification(&self, email: &EmailAddress);

    /// Send a password reset link if the email belongs to an account.
    /// Silent otherwise, so callers cannot probe for accounts.
    async fn forgot_password(&self, email: &EmailAddress);

    /// Redeem a reset token and store the new password.
    ///
    /// # Errors
    /// * `Token(NotFound | AlreadyUsed | Expired)`
    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError>;

    /// Validate a session token.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed or expired
    async fn validate_session(&self, token: &str) -> Result<Session, AuthError>;

    /// Approve or reject a professional account.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not a system admin
    /// * `InvalidVerificationStatus` - Status is PENDING
    /// * `UserNotFound` - No such account
    /// * `InvalidRole` - Account is not a professional role
    async fn review_professional(
        &self,
        caller: &Caller,
        user_id: &UserId,
        status: VerificationStatus,
    ) -> Result<User, AuthError>;

    /// Publish a clinic change to downstream services.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is neither clinic admin nor system admin
    /// * `EventPublishing` - Broker rejected the event
    async fn announce_clinic_update(
        &self,
        caller: &Caller,
        update: ClinicUpdate,
    ) -> Result<(), AuthError>;

    /// Link a clinic admin to the clinic created for them.
    ///
    /// # Errors
    /// * `UserNotFound` - No such account
    async fn assign_clinic(&self, user_id: &UserId, clinic_id: i64) -> Result<(), AuthError>;

    /// Make sure the platform system admin exists.
    ///
    /// # Returns
    /// `true` if the account was created by this call
    async fn ensure_sys_admin(
        &self,
        email: &EmailAddress,
        password: Password,
    ) -> Result<bool, AuthError>;
}

/// Persistence operations for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UserExists` - Email (or license number) is already taken
    /// * `Storage` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    /// # Errors
    /// * `UserNotFound` - No such account
    async fn set_verification_status(
        &self,
        id: &UserId,
        status: VerificationStatus,
    ) -> Result<(), AuthError>;

    /// # Errors
    /// * `UserNotFound` - No such account
    async fn assign_clinic(&self, id: &UserId, clinic_id: i64) -> Result<(), AuthError>;
}

/// Persistence operations for single-use tokens.
///
/// Both `consume_*` operations are atomic: the token is marked used only if
/// it is still unused, in the same transaction as the state change it
/// unlocks. When another consumer got there first they fail with
/// `Token(AlreadyUsed)` and change nothing.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    async fn insert(&self, kind: TokenKind, token: &SingleUseToken) -> Result<(), AuthError>;

    /// Mark every unused reset token of the owner as used, then insert `token`.
    async fn replace_reset_token(&self, token: &SingleUseToken) -> Result<(), AuthError>;

    async fn find(&self, kind: TokenKind, token: &str)
        -> Result<Option<SingleUseToken>, AuthError>;

    /// Mark a verification token used and set `is_verified` on its owner.
    async fn consume_verification(&self, token: &str, user_id: &UserId)
        -> Result<(), AuthError>;

    /// Mark a reset token used and replace its owner's password hash.
    async fn consume_reset(
        &self,
        token: &str,
        user_id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError>;
}

/// Primary, durable channel for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// # Errors
    /// * `SerializationFailed` - Event encoding failed
    /// * `PublishFailed` - Broker did not acknowledge the event
    async fn publish_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError>;

    async fn publish_clinic_updated(
        &self,
        event: &ClinicUpdatedEvent,
    ) -> Result<(), EventPublisherError>;
}

/// Direct call to a dependent service, used when the primary channel fails.
#[async_trait]
pub trait FallbackNotifier: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn notify_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: EmailAddress,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Transactional email delivery.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailDeliveryError>;
}
