use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::errors::AuthError;
use crate::identity::models::Password;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn reset_password<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    if body.token.is_empty() {
        return Err(ApiError::BadRequest("token is required".to_string()));
    }
    let new_password = Password::new(body.new_password).map_err(AuthError::from)?;

    state
        .auth_service
        .reset_password(&body.token, new_password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Password has been reset. You can now log in."),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequestBody {
    token: String,
    new_password: String,
}
