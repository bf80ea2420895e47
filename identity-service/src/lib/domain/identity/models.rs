use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::EmailError;
use crate::identity::errors::PasswordPolicyError;
use crate::identity::errors::RoleError;
use crate::identity::errors::UserIdError;
use crate::identity::errors::VerificationStatusError;

/// Registered account.
///
/// Accounts are never physically deleted; `is_active` is the only way to
/// switch one off.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub verification_status: VerificationStatus,
    pub license_number: Option<String>,
    pub clinic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Email confirmed and, for professionals, approved by an administrator.
    pub fn is_fully_verified(&self) -> bool {
        self.is_verified && self.verification_status == VerificationStatus::Approved
    }

    /// Full name from whichever name parts are set, otherwise the email address.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full_name.is_empty() {
            self.email.as_str().to_string()
        } else {
            full_name
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The address is
/// stored exactly as given; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Platform roles. Parsing is exact: no case folding, no prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Patient,
    Doctor,
    Pharmacist,
    ClinicAdmin,
    SysAdmin,
    Service,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Patient,
        Role::Doctor,
        Role::Pharmacist,
        Role::ClinicAdmin,
        Role::SysAdmin,
        Role::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Pharmacist => "PHARMACIST",
            Role::ClinicAdmin => "CLINIC_ADMIN",
            Role::SysAdmin => "SYS_ADMIN",
            Role::Service => "SERVICE",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::Approved => "APPROVED",
            VerificationStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = VerificationStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(VerificationStatus::Pending),
            "APPROVED" => Ok(VerificationStatus::Approved),
            "REJECTED" => Ok(VerificationStatus::Rejected),
            other => Err(VerificationStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext password that satisfies the length policy.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 8;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let actual = password.chars().count();
        if actual < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Clinic details a clinic admin may supply when registering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicDetails {
    pub name: Option<String>,
    pub physical_address: Option<String>,
    pub contact_phone: Option<String>,
    pub operating_hours: Option<String>,
}

/// Command to create an account, used by both self and admin registration.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub license_number: Option<String>,
    pub clinic: Option<ClinicDetails>,
}

impl RegisterCommand {
    pub fn new(email: EmailAddress, password: Password, role: Role) -> Self {
        Self {
            email,
            password,
            role,
            first_name: None,
            last_name: None,
            phone_number: None,
            license_number: None,
            clinic: None,
        }
    }

    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn with_phone_number(mut self, phone_number: Option<String>) -> Self {
        self.phone_number = phone_number;
        self
    }

    pub fn with_license_number(mut self, license_number: Option<String>) -> Self {
        self.license_number = license_number;
        self
    }

    pub fn with_clinic(mut self, clinic: Option<ClinicDetails>) -> Self {
        self.clinic = clinic;
        self
    }
}

/// Identity the gateway asserts for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

/// Result of a login attempt that passed the credential check.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Authenticated { user: User, token: String },
    /// Credentials are correct but the account is not fully verified yet.
    PendingVerification { user: User },
}

/// Account created by a system admin, with a session token for it.
#[derive(Debug, Clone)]
pub struct AdminRegistration {
    pub user: User,
    pub token: String,
}

/// Validated session token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Clinic change announced to downstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicUpdate {
    pub clinic_id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub operating_hours: String,
    pub is_active: bool,
}
