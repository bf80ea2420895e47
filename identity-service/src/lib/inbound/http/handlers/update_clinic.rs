use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::models::Caller;
use crate::identity::models::ClinicUpdate;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn update_clinic<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<ClinicUpdateRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    if body.clinic_id <= 0 {
        return Err(ApiError::BadRequest("clinic_id must be positive".to_string()));
    }

    state
        .auth_service
        .announce_clinic_update(&caller, body.into())
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Clinic update published"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClinicUpdateRequestBody {
    clinic_id: i64,
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    contact_phone: String,
    #[serde(default)]
    operating_hours: String,
    #[serde(default = "active")]
    is_active: bool,
}

fn active() -> bool {
    true
}

impl From<ClinicUpdateRequestBody> for ClinicUpdate {
    fn from(body: ClinicUpdateRequestBody) -> Self {
        Self {
            clinic_id: body.clinic_id,
            name: body.name,
            address: body.address,
            contact_phone: body.contact_phone,
            operating_hours: body.operating_hours,
            is_active: body.is_active,
        }
    }
}
