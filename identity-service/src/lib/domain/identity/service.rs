use std::sync::Arc;

use async_trait::async_trait;
use auth::ClaimsCodec;
use auth::JwtError;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::identity::emails::EmailTemplates;
use crate::identity::errors::AuthError;
use crate::identity::events::ClinicUpdatedEvent;
use crate::identity::events::UserRegisteredEvent;
use crate::identity::models::AdminRegistration;
use crate::identity::models::Caller;
use crate::identity::models::ClinicUpdate;
use crate::identity::models::EmailAddress;
use crate::identity::models::LoginOutcome;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Role;
use crate::identity::models::Session;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::VerificationStatus;
use crate::identity::notifier::RegistrationNotifier;
use crate::identity::policy;
use crate::identity::policy::InitialPosture;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::EmailMessage;
use crate::identity::ports::EmailSender;
use crate::identity::ports::EventPublisher;
use crate::identity::ports::FallbackNotifier;
use crate::identity::ports::TokenRepository;
use crate::identity::ports::UserRepository;
use crate::identity::tokens::TokenIssuer;
use crate::identity::tokens::TokenKind;

/// Lifetimes of emailed tokens and the templates that carry them.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub verification_ttl: Duration,
    pub reset_ttl: Duration,
    pub templates: EmailTemplates,
}

impl AuthSettings {
    pub fn new(templates: EmailTemplates) -> Self {
        Self {
            verification_ttl: Duration::minutes(15),
            reset_ttl: Duration::minutes(60),
            templates,
        }
    }
}

/// Domain service implementation for identity operations.
///
/// Storage and token work happen inline; emails are best effort and
/// registration events go out on a detached task.
pub struct AuthService<UR, TR, EP, ES>
where
    UR: UserRepository,
    TR: TokenRepository,
    EP: EventPublisher,
    ES: EmailSender,
{
    users: Arc<UR>,
    tokens: TokenIssuer<TR>,
    publisher: Arc<EP>,
    notifier: RegistrationNotifier<EP>,
    email_sender: Arc<ES>,
    claims_codec: Arc<ClaimsCodec>,
    password_hasher: PasswordHasher,
    settings: AuthSettings,
}

impl<UR, TR, EP, ES> AuthService<UR, TR, EP, ES>
where
    UR: UserRepository,
    TR: TokenRepository,
    EP: EventPublisher,
    ES: EmailSender,
{
    /// Create a service with no fallback notifiers and the default hashing cost.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `tokens` - Single-use token persistence implementation
    /// * `publisher` - Primary event channel
    /// * `email_sender` - Transactional email delivery
    /// * `claims_codec` - Session token signer, built once from the secret
    /// * `settings` - Token lifetimes and email templates
    pub fn new(
        users: Arc<UR>,
        tokens: Arc<TR>,
        publisher: Arc<EP>,
        email_sender: Arc<ES>,
        claims_codec: Arc<ClaimsCodec>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            tokens: TokenIssuer::new(tokens, settings.verification_ttl, settings.reset_ttl),
            notifier: RegistrationNotifier::new(Arc::clone(&publisher), Vec::new()),
            publisher,
            email_sender,
            claims_codec,
            password_hasher: PasswordHasher::new(),
            settings,
        }
    }

    /// Services called directly when the primary event channel fails.
    pub fn with_fallbacks(mut self, fallbacks: Vec<Arc<dyn FallbackNotifier>>) -> Self {
        self.notifier = RegistrationNotifier::new(Arc::clone(&self.publisher), fallbacks);
        self
    }

    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    async fn hash_password(&self, password: &Password) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let plaintext = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn issue_session(&self, user: &User) -> Result<String, AuthError> {
        self.claims_codec
            .issue(&user.id.to_string(), user.role.as_str())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    async fn ensure_email_available(&self, email: &EmailAddress) -> Result<(), AuthError> {
        match self.users.find_by_email(email).await? {
            Some(_) => Err(AuthError::UserExists(email.to_string())),
            None => Ok(()),
        }
    }

    async fn create_user(
        &self,
        command: &RegisterCommand,
        posture: InitialPosture,
    ) -> Result<User, AuthError> {
        let password_hash = self.hash_password(&command.password).await?;

        let user = User {
            id: UserId::new(),
            email: command.email.clone(),
            password_hash,
            role: command.role,
            first_name: command.first_name.clone(),
            last_name: command.last_name.clone(),
            is_active: true,
            is_verified: posture.is_verified,
            verification_status: posture.verification_status,
            license_number: command.license_number.clone(),
            clinic_id: None,
            created_at: Utc::now(),
        };

        self.users.create(user).await
    }

    async fn deliver_email(&self, message: EmailMessage) {
        match self.email_sender.send(&message).await {
            Ok(()) => tracing::debug!(recipient = %message.recipient, subject = %message.subject, "Email sent"),
            Err(e) => tracing::error!(
                recipient = %message.recipient,
                subject = %message.subject,
                error = %e,
                "Failed to send email"
            ),
        }
    }

    async fn send_verification(&self, user: &User) -> Result<(), AuthError> {
        let token = self.tokens.issue_verification_token(user.id).await?;
        let message = self.settings.templates.verification_email(
            &user.email,
            &token.token,
            self.settings.verification_ttl,
        );
        self.deliver_email(message).await;
        Ok(())
    }

    async fn try_resend_verification(&self, email: &EmailAddress) -> Result<(), AuthError> {
        match self.users.find_by_email(email).await? {
            None => {
                tracing::info!("Verification resend requested for unknown email");
                Ok(())
            }
            Some(user) if user.is_verified => {
                tracing::info!(user_id = %user.id, "Verification resend requested for verified account");
                Ok(())
            }
            Some(user) => self.send_verification(&user).await,
        }
    }

    async fn try_forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = self.tokens.issue_reset_token(user.id).await?;
        let message =
            self.settings
                .templates
                .reset_email(&user.email, &token.token, self.settings.reset_ttl);
        self.deliver_email(message).await;

        tracing::info!(user_id = %user.id, "Password reset link issued");
        Ok(())
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::<Utc>::from_timestamp(seconds, 0).ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<UR, TR, EP, ES> AuthServicePort for AuthService<UR, TR, EP, ES>
where
    UR: UserRepository,
    TR: TokenRepository,
    EP: EventPublisher,
    ES: EmailSender,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let posture = policy::self_registration_posture(command.role)
            .ok_or_else(|| AuthError::InvalidRole(command.role.to_string()))?;

        self.ensure_email_available(&command.email).await?;
        let user = self.create_user(&command, posture).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            verification_status = %user.verification_status,
            "User registered"
        );

        self.send_verification(&user).await?;

        self.notifier.dispatch(UserRegisteredEvent::new(
            &user,
            command.phone_number.as_deref(),
            command.clinic.as_ref(),
        ));

        Ok(user)
    }

    async fn admin_register(
        &self,
        caller: &Caller,
        command: RegisterCommand,
    ) -> Result<AdminRegistration, AuthError> {
        if !policy::can_provision_accounts(caller.role) {
            tracing::warn!(
                caller_id = %caller.user_id,
                caller_role = %caller.role,
                "Admin registration rejected"
            );
            return Err(AuthError::Forbidden(
                "only SYS_ADMIN may create accounts".to_string(),
            ));
        }

        if !policy::is_admin_creatable(command.role) {
            return Err(AuthError::InvalidRole(command.role.to_string()));
        }

        self.ensure_email_available(&command.email).await?;
        let user = self.create_user(&command, policy::ADMIN_CREATED).await?;
        let token = self.issue_session(&user)?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            created_by = %caller.user_id,
            "User created by admin"
        );

        self.notifier.dispatch(UserRegisteredEvent::new(
            &user,
            command.phone_number.as_deref(),
            command.clinic.as_ref(),
        ));

        Ok(AdminRegistration { user, token })
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!(reason = "unknown_email", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, reason = "wrong_password", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::info!(user_id = %user.id, reason = "inactive", "Login rejected");
            return Err(AuthError::AccountInactive);
        }

        if !user.is_fully_verified() {
            tracing::info!(
                user_id = %user.id,
                is_verified = user.is_verified,
                verification_status = %user.verification_status,
                "Login pending verification"
            );
            return Ok(LoginOutcome::PendingVerification { user });
        }

        let token = self.issue_session(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginOutcome::Authenticated { user, token })
    }

    async fn verify_email(&self, token: &str) -> Result<UserId, AuthError> {
        let user_id = self.tokens.consume_verification(token).await?;
        tracing::info!(user_id = %user_id, "Email verified");
        Ok(user_id)
    }

    async fn resend_verification(&self, email: &EmailAddress) {
        if let Err(e) = self.try_resend_verification(email).await {
            tracing::error!(error = %e, "Failed to resend verification email");
        }
    }

    async fn forgot_password(&self, email: &EmailAddress) {
        if let Err(e) = self.try_forgot_password(email).await {
            tracing::error!(error = %e, "Failed to issue password reset");
        }
    }

    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError> {
        let record = self.tokens.redeemable(TokenKind::PasswordReset, token).await?;
        let password_hash = self.hash_password(&new_password).await?;
        self.tokens.consume_reset(&record, &password_hash).await?;

        tracing::info!(user_id = %record.user_id, "Password reset");
        Ok(())
    }

    async fn validate_session(&self, token: &str) -> Result<Session, AuthError> {
        let claims = self.claims_codec.validate(token).map_err(|e| {
            match e {
                JwtError::TokenExpired => tracing::debug!("Session token expired"),
                other => tracing::debug!(error = %other, "Session token invalid"),
            }
            AuthError::InvalidToken
        })?;

        let user_id = UserId::from_string(&claims.user_id).map_err(|_| AuthError::InvalidToken)?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Session {
            user_id,
            role,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    async fn review_professional(
        &self,
        caller: &Caller,
        user_id: &UserId,
        status: VerificationStatus,
    ) -> Result<User, AuthError> {
        if !policy::can_provision_accounts(caller.role) {
            return Err(AuthError::Forbidden(
                "only SYS_ADMIN may review accounts".to_string(),
            ));
        }

        if status == VerificationStatus::Pending {
            return Err(AuthError::InvalidVerificationStatus(status.to_string()));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        if !policy::requires_review(user.role) {
            return Err(AuthError::InvalidRole(user.role.to_string()));
        }

        self.users.set_verification_status(user_id, status).await?;

        tracing::info!(
            user_id = %user_id,
            status = %status,
            reviewed_by = %caller.user_id,
            "Professional account reviewed"
        );

        Ok(User {
            verification_status: status,
            ..user
        })
    }

    async fn announce_clinic_update(
        &self,
        caller: &Caller,
        update: ClinicUpdate,
    ) -> Result<(), AuthError> {
        if !policy::can_announce_clinic_updates(caller.role) {
            return Err(AuthError::Forbidden(
                "only clinic or system admins may update clinics".to_string(),
            ));
        }

        let event = ClinicUpdatedEvent::new(update);
        self.publisher.publish_clinic_updated(&event).await?;

        tracing::info!(clinic_id = event.clinic_id, name = %event.name, "Clinic update published");
        Ok(())
    }

    async fn assign_clinic(&self, user_id: &UserId, clinic_id: i64) -> Result<(), AuthError> {
        self.users.assign_clinic(user_id, clinic_id).await?;
        tracing::info!(user_id = %user_id, clinic_id, "Clinic assigned");
        Ok(())
    }

    async fn ensure_sys_admin(
        &self,
        email: &EmailAddress,
        password: Password,
    ) -> Result<bool, AuthError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.role != Role::SysAdmin {
                tracing::warn!(
                    user_id = %existing.id,
                    role = %existing.role,
                    "Bootstrap admin email belongs to a non-admin account"
                );
            }
            return Ok(false);
        }

        let command = RegisterCommand::new(email.clone(), password, Role::SysAdmin);
        let user = self.create_user(&command, policy::ADMIN_CREATED).await?;

        tracing::info!(user_id = %user.id, "System admin account created");
        Ok(true)
    }
}
