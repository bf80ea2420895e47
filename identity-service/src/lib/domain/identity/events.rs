use chrono::DateTime;
use chrono::Utc;

use crate::identity::models::ClinicDetails;
use crate::identity::models::ClinicUpdate;
use crate::identity::models::Role;
use crate::identity::models::User;

pub const USER_REGISTERED: &str = "user.registered";
pub const CLINIC_UPDATED: &str = "clinic.updated";
pub const CLINIC_UPDATE_ROUTING_KEY: &str = "clinic.update.clinic";

const DEFAULT_CLINIC_ADDRESS: &str = "Address to be provided";
const DEFAULT_OPERATING_HOURS: &str = "Monday-Friday 9:00-17:00";

/// Clinic to provision alongside a newly registered clinic admin.
///
/// The clinic id is assigned downstream, so it is always 0 here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicProvisioning {
    pub clinic_id: i64,
    pub name: String,
    pub physical_address: String,
    pub contact_phone: String,
    pub operating_hours: String,
}

impl ClinicProvisioning {
    /// Fill in whatever the registrant left out.
    fn for_admin(user: &User, details: Option<&ClinicDetails>) -> Self {
        let details = details.cloned().unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Self {
            clinic_id: 0,
            name: non_empty(details.name)
                .unwrap_or_else(|| format!("Clinic managed by {}", user.display_name())),
            physical_address: non_empty(details.physical_address)
                .unwrap_or_else(|| DEFAULT_CLINIC_ADDRESS.to_string()),
            contact_phone: details.contact_phone.unwrap_or_default(),
            operating_hours: non_empty(details.operating_hours)
                .unwrap_or_else(|| DEFAULT_OPERATING_HOURS.to_string()),
        }
    }
}

/// Snapshot of a newly created account for downstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegisteredEvent {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub timestamp: DateTime<Utc>,
    pub clinic: Option<ClinicProvisioning>,
}

impl UserRegisteredEvent {
    /// Build the event for `user`. A clinic block is attached only for clinic admins.
    pub fn new(user: &User, phone_number: Option<&str>, clinic: Option<&ClinicDetails>) -> Self {
        let clinic = match user.role {
            Role::ClinicAdmin => Some(ClinicProvisioning::for_admin(user, clinic)),
            _ => None,
        };

        Self {
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            phone_number: phone_number.unwrap_or_default().to_string(),
            timestamp: Utc::now(),
            clinic,
        }
    }

    pub fn event_type(&self) -> &'static str {
        USER_REGISTERED
    }

    /// `user.registration.<ROLE>`
    pub fn routing_key(&self) -> String {
        format!("user.registration.{}", self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicUpdatedEvent {
    pub clinic_id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub operating_hours: String,
    pub is_active: bool,
    pub timestamp: DateTime<Utc>,
}

impl ClinicUpdatedEvent {
    pub fn new(update: ClinicUpdate) -> Self {
        Self {
            clinic_id: update.clinic_id,
            name: update.name,
            address: update.address,
            contact_phone: update.contact_phone,
            operating_hours: update.operating_hours,
            is_active: update.is_active,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        CLINIC_UPDATED
    }

    pub fn routing_key(&self) -> &'static str {
        CLINIC_UPDATE_ROUTING_KEY
    }
}

/// Received once the profile service has created a clinic for a clinic admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicCreatedEvent {
    pub clinic_id: i64,
    pub admin_user_id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}
