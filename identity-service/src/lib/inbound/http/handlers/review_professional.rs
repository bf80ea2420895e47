use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::identity::errors::AuthError;
use crate::identity::models::Caller;
use crate::identity::models::UserId;
use crate::identity::models::VerificationStatus;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn review_professional<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(user_id): Path<String>,
    Json(body): Json<ReviewRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(AuthError::from)?;
    let status = body
        .status
        .parse::<VerificationStatus>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state
        .auth_service
        .review_professional(&caller, &user_id, status)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRequestBody {
    status: String,
}
