use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::models::LoginOutcome;
use crate::identity::models::User;
use crate::identity::models::VerificationStatus;
use crate::identity::policy;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Pending accounts get a 200 with an empty token and `pending_verification`
/// set; the client shows `details` instead of signing in.
pub async fn login<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // a malformed email cannot match an account
    let email =
        EmailAddress::new(body.email).map_err(|_| ApiError::from(AuthError::InvalidCredentials))?;

    let outcome = state.auth_service.login(&email, &body.password).await?;

    let data = match outcome {
        LoginOutcome::Authenticated { user, token } => LoginResponseData {
            message: "Login successful".to_string(),
            token,
            pending_verification: false,
            details: None,
            user: (&user).into(),
        },
        LoginOutcome::PendingVerification { user } => LoginResponseData {
            message: "Account verification is pending".to_string(),
            token: String::new(),
            pending_verification: true,
            details: Some(pending_details(&user).to_string()),
            user: (&user).into(),
        },
    };

    Ok(ApiSuccess::new(StatusCode::OK, data))
}

fn pending_details(user: &User) -> &'static str {
    if user.verification_status == VerificationStatus::Rejected {
        "Your professional verification was rejected. Please contact support for details."
    } else if user.is_verified || policy::requires_review(user.role) {
        "Please verify your email and wait for an admin to approve your license and details."
    } else {
        "Please verify your email via the link we sent."
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub token: String,
    pub pending_verification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub user: UserData,
}
