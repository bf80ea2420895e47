//! Wire payloads for the event broker and the fallback endpoints.
//!
//! Field tags follow `proto/identity_events.proto`; both sides of every
//! topic decode with that schema.

use chrono::DateTime;
use chrono::Utc;

use crate::identity::events::ClinicCreatedEvent;
use crate::identity::events::ClinicProvisioning;
use crate::identity::events::ClinicUpdatedEvent;
use crate::identity::events::UserRegisteredEvent;

pub const CONTENT_TYPE: &str = "application/protobuf";

/// `identity.events.UserRegistrationEvent`
#[derive(Clone, PartialEq, prost::Message)]
pub struct UserRegistrationMessage {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub email: String,
    #[prost(string, tag = "3")]
    pub role: String,
    #[prost(string, tag = "4")]
    pub first_name: String,
    #[prost(string, tag = "5")]
    pub last_name: String,
    #[prost(string, tag = "6")]
    pub phone_number: String,
    #[prost(int64, tag = "7")]
    pub timestamp: i64,
    #[prost(string, tag = "8")]
    pub event_type: String,
    #[prost(message, optional, tag = "9")]
    pub clinic_data: Option<ClinicDataMessage>,
}

/// `identity.events.ClinicData`
#[derive(Clone, PartialEq, prost::Message)]
pub struct ClinicDataMessage {
    #[prost(int64, tag = "1")]
    pub clinic_id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub physical_address: String,
    #[prost(string, tag = "4")]
    pub contact_phone: String,
    #[prost(string, tag = "5")]
    pub operating_hours: String,
}

/// `identity.events.ClinicUpdateEvent`
#[derive(Clone, PartialEq, prost::Message)]
pub struct ClinicUpdateMessage {
    #[prost(int64, tag = "1")]
    pub clinic_id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub address: String,
    #[prost(string, tag = "4")]
    pub contact_phone: String,
    #[prost(string, tag = "5")]
    pub operating_hours: String,
    #[prost(bool, tag = "6")]
    pub is_active: bool,
    #[prost(int64, tag = "7")]
    pub timestamp: i64,
    #[prost(string, tag = "8")]
    pub event_type: String,
}

/// `identity.events.ClinicCreatedEvent`
#[derive(Clone, PartialEq, prost::Message)]
pub struct ClinicCreatedMessage {
    #[prost(int64, tag = "1")]
    pub clinic_id: i64,
    #[prost(string, tag = "2")]
    pub admin_user_id: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(int64, tag = "4")]
    pub timestamp: i64,
}

impl From<&ClinicProvisioning> for ClinicDataMessage {
    fn from(clinic: &ClinicProvisioning) -> Self {
        Self {
            clinic_id: clinic.clinic_id,
            name: clinic.name.clone(),
            physical_address: clinic.physical_address.clone(),
            contact_phone: clinic.contact_phone.clone(),
            operating_hours: clinic.operating_hours.clone(),
        }
    }
}

impl From<&UserRegisteredEvent> for UserRegistrationMessage {
    fn from(event: &UserRegisteredEvent) -> Self {
        Self {
            user_id: event.user_id.clone(),
            email: event.email.clone(),
            role: event.role.to_string(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            phone_number: event.phone_number.clone(),
            timestamp: event.timestamp.timestamp(),
            event_type: event.event_type().to_string(),
            clinic_data: event.clinic.as_ref().map(ClinicDataMessage::from),
        }
    }
}

impl From<&ClinicUpdatedEvent> for ClinicUpdateMessage {
    fn from(event: &ClinicUpdatedEvent) -> Self {
        Self {
            clinic_id: event.clinic_id,
            name: event.name.clone(),
            address: event.address.clone(),
            contact_phone: event.contact_phone.clone(),
            operating_hours: event.operating_hours.clone(),
            is_active: event.is_active,
            timestamp: event.timestamp.timestamp(),
            event_type: event.event_type().to_string(),
        }
    }
}

impl From<ClinicCreatedMessage> for ClinicCreatedEvent {
    fn from(message: ClinicCreatedMessage) -> Self {
        Self {
            clinic_id: message.clinic_id,
            admin_user_id: message.admin_user_id,
            name: message.name,
            timestamp: DateTime::<Utc>::from_timestamp(message.timestamp, 0)
                .unwrap_or_else(Utc::now),
        }
    }
}
