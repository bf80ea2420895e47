use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use super::register::RegisterRequestBody;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::identity::models::Caller;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn admin_register<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<AdminRegisterResponseData>, ApiError> {
    let command = body.try_into_command()?;
    let registration = state.auth_service.admin_register(&caller, command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AdminRegisterResponseData {
            message: "User created successfully".to_string(),
            token: registration.token,
            user: (&registration.user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRegisterResponseData {
    pub message: String,
    pub token: String,
    pub user: UserData,
}
