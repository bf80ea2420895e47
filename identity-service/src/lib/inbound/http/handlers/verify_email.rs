use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::errors::AuthError;
use crate::identity::errors::TokenError;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_email<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Query(query): Query<VerifyQuery>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let token = query
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::BadRequest("token query parameter is required".to_string()))?;

    state
        .auth_service
        .verify_email(&token)
        .await
        .map_err(|e| match e {
            AuthError::Token(TokenError::Expired) => ApiError::Gone(e.to_string()),
            other => ApiError::from(other),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Email verified successfully. You can now log in."),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyQuery {
    token: Option<String>,
}
