use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::resend_verification::EmailRequestBody;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Responds identically whether or not the account exists.
pub async fn forgot_password<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<EmailRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(AuthError::from)?;
    state.auth_service.forgot_password(&email).await;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("If an account exists for this email, a password reset link has been sent."),
    ))
}
