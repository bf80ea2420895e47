use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn resend_verification<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<EmailRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(AuthError::from)?;
    state.auth_service.resend_verification(&email).await;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new(
            "If an unverified account exists for this email, a new verification link has been sent.",
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailRequestBody {
    pub(super) email: String,
}
