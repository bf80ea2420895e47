use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::identity::errors::AuthError;
use crate::identity::models::ClinicDetails;
use crate::identity::models::EmailAddress;
use crate::identity::models::Password;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Role;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let command = body.try_into_command()?;
    let user = state.auth_service.register(command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisterResponseData {
            message: "User registered successfully. A verification email has been sent."
                .to_string(),
            user: (&user).into(),
        },
    ))
}

/// Registration payload, shared with admin registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    email: String,
    password: String,
    role: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    license_number: Option<String>,
    clinic: Option<ClinicRequestBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClinicRequestBody {
    name: Option<String>,
    physical_address: Option<String>,
    contact_phone: Option<String>,
    operating_hours: Option<String>,
}

impl RegisterRequestBody {
    pub(super) fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let email = EmailAddress::new(self.email).map_err(AuthError::from)?;
        let password = Password::new(self.password).map_err(AuthError::from)?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let clinic = self.clinic.map(|clinic| ClinicDetails {
            name: clinic.name,
            physical_address: clinic.physical_address,
            contact_phone: clinic.contact_phone,
            operating_hours: clinic.operating_hours,
        });

        Ok(RegisterCommand::new(email, password, role)
            .with_names(self.first_name, self.last_name)
            .with_phone_number(self.phone_number)
            .with_license_number(self.license_number)
            .with_clinic(clinic))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub user: UserData,
}
